//! CLI entry point for nblog.

mod cli;
mod cmd;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if cli.quiet {
        std::env::set_var("NBLOG_QUIET", "1");
    }

    if let Err(err) = run(cli.command) {
        cmd::report::report_failure(&err);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::CreatePost { file } => cmd::post::cmd_create_post(file.as_deref()),
        Commands::Migrate { source, dry_run } => {
            cmd::migrate::cmd_migrate(source.as_deref(), dry_run)
        }
        Commands::Upload { file, destination } => {
            cmd::object::cmd_upload(&file, destination.as_deref())
        }
        Commands::Delete { key } => cmd::object::cmd_delete(&key),
        Commands::UpdateCover { url } => cmd::cover::cmd_update_cover(url.as_deref()),
        Commands::Check { create_page } => cmd::check::cmd_check(create_page),
        Commands::Version { verbose } => cmd::util::cmd_version(verbose),
        Commands::Completion { shell } => cmd::util::cmd_completion(shell),
        Commands::Man { out_dir } => cmd::util::cmd_man(out_dir.as_deref()),
    }
}
