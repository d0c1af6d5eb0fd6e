//! `check`: verify Notion credentials and database access.

use anyhow::{Context, Result};

use notion_blog::config::{env_lookup, mask_id};
use notion_blog::notion::{page_url, BlogPostProperties, CreatedPage, NotionApi};
use notion_blog::today_utc;

use crate::ui;

pub fn cmd_check(create_page: bool) -> Result<()> {
    ui::info("Environment:");
    for (var, state) in environment_report(env_lookup) {
        ui::field(var, &state);
    }

    let (config, client) = super::notion_client()?;

    check(&client, &config.database_id)?;
    if create_page {
        create_test_page(&client, &config.database_id, &today_utc())?;
    }
    Ok(())
}

/// State of the Notion variables, read before the config is validated so a
/// missing value is shown rather than only reported as an error.
pub fn environment_report<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    let present = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    let database_id = match present("DATABASE_ID") {
        Some(id) => mask_id(&id),
        None => "MISSING".to_string(),
    };
    let secret = match present("NOTION_API_SECRET") {
        Some(_) => "SET".to_string(),
        None => "MISSING".to_string(),
    };

    vec![("DATABASE_ID", database_id), ("NOTION_API_SECRET", secret)]
}

/// Retrieve the database and print its title.
pub fn check(api: &dyn NotionApi, database_id: &str) -> Result<()> {
    let info = api
        .retrieve_database(database_id)
        .context("Failed to retrieve database")?;
    ui::success("Database reachable");
    ui::field("ID", &info.id);
    let title = if info.title.is_empty() {
        "(untitled)"
    } else {
        info.title.as_str()
    };
    ui::field("Title", title);
    Ok(())
}

pub fn test_page_properties(today: &str) -> BlogPostProperties {
    BlogPostProperties {
        title: "Test Migration Article".to_string(),
        slug: "test-migration-article".to_string(),
        excerpt: "This is a test article.".to_string(),
        date: today.to_string(),
        published: true,
        tags: vec!["Test".to_string()],
        cover_url: None,
    }
}

pub fn create_test_page(api: &dyn NotionApi, database_id: &str, today: &str) -> Result<CreatedPage> {
    let page = test_page_properties(today).into_page(database_id);
    let created = api
        .create_page(&page)
        .context("Failed to create test page")?;
    ui::success(&format!("Test page created: {}", page_url(&created.id)));
    Ok(created)
}
