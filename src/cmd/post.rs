//! `create-post`: create a draft page and fill it with blocks.

use anyhow::{Context, Result};
use std::path::Path;

use notion_blog::chunk::{append_in_chunks, DEFAULT_CHUNK_SIZE};
use notion_blog::notion::{page_url, NotionApi};
use notion_blog::post::Draft;
use notion_blog::today_utc;

use crate::ui;

pub fn cmd_create_post(file: Option<&Path>) -> Result<()> {
    let draft = match file {
        Some(path) => Draft::load(path)?,
        None => Draft::bundled(),
    };
    let (config, client) = super::notion_client()?;
    create_post(&client, &config.database_id, &draft, &today_utc())
}

pub fn create_post(
    api: &dyn NotionApi,
    database_id: &str,
    draft: &Draft,
    today: &str,
) -> Result<()> {
    let page = draft.properties(today).into_page(database_id);
    let created = api
        .create_page(&page)
        .with_context(|| format!("Failed to create page '{}'", draft.title()))?;
    ui::success(&format!("Page created: {}", created.id));

    let blocks = draft.blocks();
    let count = blocks.len();
    append_in_chunks(api, &created.id, blocks, DEFAULT_CHUNK_SIZE)
        .context("Failed to append article body")?;
    ui::success(&format!("Article body added ({} blocks)", count));

    ui::info(&format!("\n{} Page URL: {}", ui::arrow(), page_url(&created.id)));
    ui::info("Check the page in Notion and tick Published to make it public.");
    Ok(())
}
