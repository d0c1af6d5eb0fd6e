//! `migrate`: move Markdown posts into the Notion database.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use notion_blog::config::MigrationConfig;
use notion_blog::migrate::{
    list_posts, plan_all, ImageResolver, MigrationObserver, MigrationReport, Migrator, PostKind,
    PostPlan,
};
use notion_blog::notion::{page_url, CreatedPage, NotionApi};
use notion_blog::storage::ObjectStore;
use notion_blog::today_utc;

use super::report::log_failure;
use crate::ui;

pub fn cmd_migrate(source: Option<&Path>, dry_run: bool) -> Result<()> {
    let config = MigrationConfig::from_env(source).context("No source directory given")?;
    if !config.source_dir.is_dir() {
        bail!(
            "Source directory not found: {}",
            config.source_dir.display()
        );
    }
    let today = today_utc();

    if dry_run {
        return print_plans(&config.source_dir, &today);
    }

    let (notion_config, client) = super::notion_client()?;
    let (_, store) = super::r2_store()?;
    let report = run(
        &client,
        &store,
        &notion_config.database_id,
        &config,
        &today,
    )?;
    finish(&report)
}

/// Print every post as it would be migrated; fails when any file could not
/// be planned.
pub fn print_plans(source_dir: &Path, today: &str) -> Result<()> {
    let dry_run = plan_all(source_dir, today)?;
    println!(
        "{} Dry run: {} post(s) in {}\n",
        ui::arrow(),
        dry_run.plans.len() + dry_run.failures.len(),
        source_dir.display()
    );
    for plan in &dry_run.plans {
        print_plan(plan);
    }
    for failure in &dry_run.failures {
        log_failure(
            &format!("Failed to read {}", failure.path.display()),
            &failure.error,
        );
    }
    if !dry_run.failures.is_empty() {
        bail!("{} post(s) could not be read", dry_run.failures.len());
    }
    Ok(())
}

fn print_plan(plan: &PostPlan) {
    println!("{} {} ({})", "•".cyan(), plan.path.display(), plan.kind);
    ui::field("Title", &plan.title);
    ui::field("Slug", &plan.slug);
    ui::field("Date", &plan.date);
    ui::field("Tags", &ui::format::list(&plan.tags));
    ui::field("Description", &plan.excerpt_preview());
    ui::field("Image", plan.cover_src.as_deref().unwrap_or("None"));
    ui::field("Body length", &plan.body_chars.to_string());
    println!();
}

pub fn run(
    notion: &dyn NotionApi,
    store: &dyn ObjectStore,
    database_id: &str,
    config: &MigrationConfig,
    today: &str,
) -> Result<MigrationReport> {
    let total: usize = PostKind::ALL
        .iter()
        .map(|kind| list_posts(&config.source_dir, *kind).map(|p| p.len()))
        .sum::<Result<usize>>()?;

    ui::info(&format!(
        "{} Migrating {} post(s) from {}",
        ui::arrow(),
        total,
        config.source_dir.display()
    ));

    let images = ImageResolver::new(store, &config.public_dir);
    let migrator = Migrator::new(notion, images, database_id);
    let mut progress = ProgressObserver::new(total);
    let report = migrator.run(&config.source_dir, today, &mut progress)?;
    progress.bar.finish_and_clear();
    Ok(report)
}

/// Print the summary; fails when any post could not be migrated.
pub fn finish(report: &MigrationReport) -> Result<()> {
    println!();
    ui::success(&format!("Created {} page(s)", report.created.len()));
    if report.is_success() {
        return Ok(());
    }

    println!(
        "{} {} post(s) failed:",
        ui::failure_icon(),
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  - {} ({})", failure.title, failure.path.display());
    }
    bail!("{} post(s) failed to migrate", report.failures.len())
}

struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new(total: usize) -> Self {
        let bar = if ui::is_quiet() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total as u64)
        };
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        Self { bar }
    }
}

impl MigrationObserver for ProgressObserver {
    fn planned(&mut self, plan: &PostPlan) {
        self.bar.set_message(plan.title.clone());
    }

    fn created(&mut self, plan: &PostPlan, page: &CreatedPage) {
        if !ui::is_quiet() {
            self.bar.println(format!(
                "{} {} {} {}",
                ui::success_icon(),
                plan.title,
                ui::arrow(),
                page_url(&page.id)
            ));
        }
        self.bar.inc(1);
    }

    fn failed(&mut self, path: &Path, title: &str, error: &anyhow::Error) {
        self.bar.suspend(|| {
            log_failure(&format!("Failed to migrate {} ({})", title, path.display()), error);
        });
        self.bar.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notion_blog::notion::InMemoryNotion;
    use notion_blog::storage::InMemoryStore;
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> MigrationConfig {
        MigrationConfig {
            source_dir: dir.path().join("content"),
            public_dir: dir.path().join("public"),
        }
    }

    #[test]
    fn test_run_and_finish_with_failure() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        fs::create_dir_all(cfg.source_dir.join("blog")).unwrap();
        fs::write(
            cfg.source_dir.join("blog/a.md"),
            "---\ntitle: Good\n---\nBody\n",
        )
        .unwrap();
        fs::write(
            cfg.source_dir.join("blog/b.md"),
            "---\ntitle: Broken\n---\nBody\n",
        )
        .unwrap();

        let notion = InMemoryNotion::new().fail_on_title("Broken");
        let store = InMemoryStore::new("https://images.example.com");
        let report = run(&notion, &store, "db-1", &cfg, "2026-01-01").unwrap();

        assert_eq!(report.created.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(finish(&report).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_print_plans_reports_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        fs::create_dir_all(cfg.source_dir.join("blog")).unwrap();
        fs::write(cfg.source_dir.join("blog/a.md"), "Body\n").unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("missing.md"),
            cfg.source_dir.join("blog/b.md"),
        )
        .unwrap();

        let err = print_plans(&cfg.source_dir, "2026-01-01").unwrap_err();
        assert_eq!(err.to_string(), "1 post(s) could not be read");
    }

    #[test]
    fn test_print_plans_on_empty_source() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        fs::create_dir_all(&cfg.source_dir).unwrap();
        print_plans(&cfg.source_dir, "2026-01-01").unwrap();
    }
}
