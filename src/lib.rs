//! # notion-blog
//!
//! Tools for moving blog content between a local Markdown tree, a Notion
//! database and an R2 bucket used for image hosting.
//!
//! ## Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`frontmatter`] - Frontmatter splitting and metadata parsing
//! - [`markdown`] - Markdown to block conversion
//! - [`notion`] - Block/property model and the Notion API client
//! - [`chunk`] - Batching of block appends under the per-request limit
//! - [`storage`] - Object storage (R2) and upload helpers
//! - [`migrate`] - Markdown directory migration
//! - [`post`] - Draft posts for `create-post`
//!
//! ## Example
//!
//! ```
//! use notion_blog::markdown::{to_blocks, ParsedBlock};
//!
//! let blocks = to_blocks("## Intro\n- first point\n![chart](/images/chart.png)");
//! assert_eq!(blocks.len(), 3);
//! assert!(matches!(blocks[2], ParsedBlock::Image { .. }));
//! ```

pub mod chunk;
pub mod config;
pub mod frontmatter;
pub mod markdown;
pub mod migrate;
pub mod notion;
pub mod post;
pub mod storage;

/// Today's UTC date as `YYYY-MM-DD`.
pub fn today_utc() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
