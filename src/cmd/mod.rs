//! Command module structure for the nblog CLI

pub mod check;
pub mod cover;
pub mod migrate;
pub mod object;
pub mod post;
pub mod report;
pub mod util;

use anyhow::{Context, Result};

use notion_blog::config::{NotionConfig, StorageConfig};
use notion_blog::notion::NotionClient;
use notion_blog::storage::R2Store;

/// Load Notion settings and build the client.
pub fn notion_client() -> Result<(NotionConfig, NotionClient)> {
    let config = NotionConfig::from_env().context("Notion is not configured")?;
    let client = NotionClient::new(&config);
    Ok((config, client))
}

/// Load R2 settings and build the store.
pub fn r2_store() -> Result<(StorageConfig, R2Store)> {
    let config = StorageConfig::from_env().context("R2 storage is not configured")?;
    let store = R2Store::new(&config)?;
    Ok((config, store))
}
