//! CLI argument definitions for nblog.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nblog")]
#[command(version)]
#[command(about = "Move blog content between Markdown, Notion and R2", long_about = None)]
#[command(
    after_help = "CONFIGURATION:\n    Credentials are read from the environment (a .env file in the working\n    directory is loaded first).\n\n    Notion:   NOTION_API_SECRET, DATABASE_ID\n    Storage:  R2_ACCOUNT_ID, R2_ACCESS_KEY_ID, R2_SECRET_ACCESS_KEY\n              R2_BUCKET_NAME, R2_PUBLIC_URL (optional)\n    Migrate:  MIGRATION_SOURCE_DIR, MIGRATION_PUBLIC_DIR (optional)"
)]
pub struct Cli {
    /// Suppress all non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a draft page from a Markdown file (defaults to the bundled article)
    CreatePost {
        /// Markdown file with frontmatter (title, slug, excerpt, tags)
        file: Option<PathBuf>,
    },
    /// Migrate Markdown posts from <SOURCE>/blog and <SOURCE>/stories
    Migrate {
        /// Content directory (overrides MIGRATION_SOURCE_DIR)
        source: Option<PathBuf>,
        /// Parse and print every post without calling Notion or R2
        #[arg(long)]
        dry_run: bool,
    },
    /// Upload a file to R2 and print its public URL
    Upload {
        /// Local file to upload
        file: PathBuf,
        /// Object key (default: <name>-<timestamp>-<hash>.<ext>)
        destination: Option<String>,
    },
    /// Delete an object from R2
    Delete {
        /// Object key, e.g. thumbnails/old-image.png
        key: String,
    },
    /// Set the database cover image
    UpdateCover {
        /// Image URL (default: <R2_PUBLIC_URL>/assets/header-main.png)
        url: Option<String>,
    },
    /// Verify Notion credentials and database access
    Check {
        /// Also create a test page in the database
        #[arg(long)]
        create_page: bool,
    },
    /// Show version information
    Version {
        /// Show build details
        #[arg(long, short)]
        verbose: bool,
    },
    /// Generate shell completion script
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Generate a man page
    Man {
        /// Output directory (default: current directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}
