//! HTTPS client for the Notion API.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use ureq::Agent;

use super::block::Block;
use super::error::NotionError;
use super::property::NewPage;
use super::{CreatedPage, DatabaseInfo, NotionApi, MAX_CHILDREN_PER_APPEND};
use crate::config::NotionConfig;

const TIMEOUT: Duration = Duration::from_secs(30);

pub struct NotionClient {
    agent: Agent,
    api_base: String,
    token: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DatabaseResponse {
    id: String,
    #[serde(default)]
    title: Vec<TitleRun>,
}

#[derive(Debug, Deserialize)]
struct TitleRun {
    #[serde(default)]
    plain_text: String,
}

impl NotionClient {
    pub fn new(config: &NotionConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(TIMEOUT).build();
        Self {
            agent,
            api_base: config.api_base.clone(),
            token: config.api_secret.clone(),
            version: config.version.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    fn send(&self, method: &str, path: &str, body: Option<&Value>) -> Result<Value, NotionError> {
        let request = self
            .agent
            .request(method, &self.url(path))
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Notion-Version", &self.version)
            .set("Content-Type", "application/json");

        tracing::debug!(method, path, "notion request");

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match result {
            Ok(response) => response
                .into_json::<Value>()
                .map_err(|e| NotionError::InvalidResponse(e.to_string())),
            Err(ureq::Error::Status(status, response)) => {
                let raw = response.into_string().unwrap_or_default();
                Err(NotionError::from_response(status, &raw))
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(NotionError::Transport(transport.to_string()))
            }
        }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(value: Value) -> Result<T, NotionError> {
    serde_json::from_value(value).map_err(|e| NotionError::InvalidResponse(e.to_string()))
}

impl NotionApi for NotionClient {
    fn create_page(&self, page: &NewPage) -> Result<CreatedPage, NotionError> {
        let response = self.send("POST", "pages", Some(&page.to_json()))?;
        let page: PageResponse = decode(response)?;
        tracing::info!(page_id = %page.id, "page created");

        let url = page.url.unwrap_or_else(|| super::page_url(&page.id));
        Ok(CreatedPage { id: page.id, url })
    }

    fn append_children(&self, block_id: &str, children: &[Block]) -> Result<(), NotionError> {
        if children.len() > MAX_CHILDREN_PER_APPEND {
            return Err(NotionError::TooManyChildren {
                count: children.len(),
                limit: MAX_CHILDREN_PER_APPEND,
            });
        }

        let body = json!({ "children": children });
        self.send("PATCH", &format!("blocks/{}/children", block_id), Some(&body))?;
        tracing::info!(block_id, blocks = children.len(), "children appended");
        Ok(())
    }

    fn update_database_cover(&self, database_id: &str, url: &str) -> Result<(), NotionError> {
        let body = json!({
            "cover": {
                "type": "external",
                "external": { "url": url },
            }
        });
        self.send("PATCH", &format!("databases/{}", database_id), Some(&body))?;
        Ok(())
    }

    fn retrieve_database(&self, database_id: &str) -> Result<DatabaseInfo, NotionError> {
        let response = self.send("GET", &format!("databases/{}", database_id), None)?;
        let database: DatabaseResponse = decode(response)?;
        let title = database
            .title
            .into_iter()
            .map(|run| run.plain_text)
            .collect::<String>();
        Ok(DatabaseInfo {
            id: database.id,
            title,
        })
    }
}
