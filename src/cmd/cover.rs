//! `update-cover`: patch the database cover image.

use anyhow::{Context, Result};
use url::Url;

use notion_blog::config::{env_lookup, public_base_url};
use notion_blog::notion::NotionApi;

use crate::ui;

/// Path of the site header image under the public bucket URL.
pub const DEFAULT_COVER_PATH: &str = "assets/header-main.png";

/// Cover URL used when none is given. Only `R2_PUBLIC_URL` is consulted, so
/// storage credentials are not required.
pub fn default_cover_url<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let base = public_base_url(&lookup).context("Cannot build the default cover URL")?;
    Ok(format!("{}/{}", base, DEFAULT_COVER_PATH))
}

pub fn cmd_update_cover(url: Option<&str>) -> Result<()> {
    let url = match url {
        Some(u) => u.to_string(),
        None => default_cover_url(env_lookup)?,
    };
    let (config, client) = super::notion_client()?;
    update_cover(&client, &config.database_id, &url)
}

pub fn update_cover(api: &dyn NotionApi, database_id: &str, url: &str) -> Result<()> {
    Url::parse(url).with_context(|| format!("Invalid cover URL: {}", url))?;

    api.update_database_cover(database_id, url)
        .context("Failed to update database cover")?;
    ui::success("Database cover updated.");
    ui::field("Cover", url);
    Ok(())
}
