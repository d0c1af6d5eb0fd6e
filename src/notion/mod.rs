//! Notion pages, blocks and the API surface used by the commands.
//!
//! Commands talk to [`NotionApi`] rather than the HTTP client directly so the
//! migration flow can run against [`InMemoryNotion`] in tests.

pub mod block;
pub mod client;
pub mod error;
pub mod in_memory;
pub mod property;

pub use block::{Block, CalloutColor};
pub use client::NotionClient;
pub use error::NotionError;
pub use in_memory::InMemoryNotion;
pub use property::{BlogPostProperties, NewPage, PropertyValue};

/// The API accepts at most this many children per append request.
pub const MAX_CHILDREN_PER_APPEND: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPage {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub id: String,
    pub title: String,
}

pub trait NotionApi {
    fn create_page(&self, page: &NewPage) -> Result<CreatedPage, NotionError>;

    /// Append blocks to a page. Batches over [`MAX_CHILDREN_PER_APPEND`] are
    /// rejected before any request is made.
    fn append_children(&self, block_id: &str, children: &[Block]) -> Result<(), NotionError>;

    fn update_database_cover(&self, database_id: &str, url: &str) -> Result<(), NotionError>;

    fn retrieve_database(&self, database_id: &str) -> Result<DatabaseInfo, NotionError>;
}

/// Browser URL for a page id.
pub fn page_url(id: &str) -> String {
    format!("https://www.notion.so/{}", id.replace('-', ""))
}
