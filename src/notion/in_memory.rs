use std::sync::Mutex;

use super::block::Block;
use super::error::NotionError;
use super::property::NewPage;
use super::{page_url, CreatedPage, DatabaseInfo, NotionApi, MAX_CHILDREN_PER_APPEND};

/// Records every call; used by tests in place of the HTTP client.
#[derive(Default)]
pub struct InMemoryNotion {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    pages: Vec<NewPage>,
    appends: Vec<(String, Vec<Block>)>,
    covers: Vec<(String, String)>,
    fail_titles: Vec<String>,
}

impl InMemoryNotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_page` fail for pages whose `Page` title equals `title`.
    pub fn fail_on_title(self, title: &str) -> Self {
        self.lock().fail_titles.push(title.to_string());
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn pages(&self) -> Vec<NewPage> {
        self.lock().pages.clone()
    }

    /// Each append call as `(block_id, children)`, in call order.
    pub fn appends(&self) -> Vec<(String, Vec<Block>)> {
        self.lock().appends.clone()
    }

    /// All blocks appended to `page_id`, flattened across calls.
    pub fn blocks_for(&self, page_id: &str) -> Vec<Block> {
        self.lock()
            .appends
            .iter()
            .filter(|(id, _)| id == page_id)
            .flat_map(|(_, blocks)| blocks.iter().cloned())
            .collect()
    }

    pub fn covers(&self) -> Vec<(String, String)> {
        self.lock().covers.clone()
    }
}

fn title_of(page: &NewPage) -> Option<&str> {
    match page.get("Page") {
        Some(super::PropertyValue::Title(t)) => Some(t.as_str()),
        _ => None,
    }
}

impl NotionApi for InMemoryNotion {
    fn create_page(&self, page: &NewPage) -> Result<CreatedPage, NotionError> {
        let mut state = self.lock();

        if let Some(title) = title_of(page) {
            if state.fail_titles.iter().any(|t| t == title) {
                return Err(NotionError::from_response(
                    400,
                    r#"{"object":"error","status":400,"code":"validation_error","message":"rejected by test"}"#,
                ));
            }
        }

        state.pages.push(page.clone());
        let id = format!("00000000-0000-0000-0000-{:012}", state.pages.len());
        Ok(CreatedPage {
            url: page_url(&id),
            id,
        })
    }

    fn append_children(&self, block_id: &str, children: &[Block]) -> Result<(), NotionError> {
        if children.len() > MAX_CHILDREN_PER_APPEND {
            return Err(NotionError::TooManyChildren {
                count: children.len(),
                limit: MAX_CHILDREN_PER_APPEND,
            });
        }
        self.lock()
            .appends
            .push((block_id.to_string(), children.to_vec()));
        Ok(())
    }

    fn update_database_cover(&self, database_id: &str, url: &str) -> Result<(), NotionError> {
        self.lock()
            .covers
            .push((database_id.to_string(), url.to_string()));
        Ok(())
    }

    fn retrieve_database(&self, database_id: &str) -> Result<DatabaseInfo, NotionError> {
        Ok(DatabaseInfo {
            id: database_id.to_string(),
            title: "In-memory database".to_string(),
        })
    }
}
