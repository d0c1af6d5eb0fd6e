//! Version, man page and completion commands.

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

const BIN_NAME: &str = "nblog";

pub fn cmd_version(verbose: bool) -> Result<()> {
    println!("{} {}", BIN_NAME, env!("CARGO_PKG_VERSION"));

    if verbose {
        println!("commit: {}", env!("NBLOG_GIT_SHA"));
        println!("built: {}", env!("NBLOG_BUILD_DATE"));
        println!("notion api: {}", notion_blog::config::DEFAULT_NOTION_VERSION);
    }

    Ok(())
}

/// Write `nblog.1` into `out_dir` (default: current directory).
pub fn cmd_man(out_dir: Option<&Path>) -> Result<()> {
    let man_path = write_man(out_dir.unwrap_or_else(|| Path::new(".")))?;
    println!("Man page written to: {}", man_path.display());
    Ok(())
}

pub fn write_man(out_dir: &Path) -> Result<PathBuf> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(Cli::command()).render(&mut buffer)?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let man_path = out_dir.join(format!("{}.1", BIN_NAME));
    std::fs::write(&man_path, buffer)
        .with_context(|| format!("Failed to write {}", man_path.display()))?;
    Ok(man_path)
}

pub fn cmd_completion(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());
    Ok(())
}
