//! Draft posts created by `create-post`.
//!
//! The bundled article is embedded at compile time with `include_str!`; any
//! other Markdown file with the same frontmatter keys can be used instead.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::frontmatter::{self, Document};
use crate::markdown::{self, ParsedBlock};
use crate::notion::{Block, BlogPostProperties};

/// The article created when no file is given.
pub const BUNDLED_ARTICLE: &str = include_str!("../templates/nasdaq-nisa-guide.md");

#[derive(Debug, Clone)]
pub struct Draft {
    document: Document,
}

impl Draft {
    pub fn bundled() -> Self {
        Self::from_markdown(BUNDLED_ARTICLE)
    }

    pub fn from_markdown(content: &str) -> Self {
        Self {
            document: frontmatter::parse(content),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read post from {}", path.display()))?;
        Ok(Self::from_markdown(&content))
    }

    pub fn title(&self) -> &str {
        self.document.text("title").unwrap_or("Untitled")
    }

    /// Page properties; drafts stay unpublished unless the file says otherwise.
    pub fn properties(&self, today: &str) -> BlogPostProperties {
        let doc = &self.document;
        let title = self.title().to_string();

        BlogPostProperties {
            slug: doc
                .text("slug")
                .map(str::to_string)
                .unwrap_or_else(|| slugify(&title)),
            excerpt: doc
                .text("excerpt")
                .or_else(|| doc.text("description"))
                .unwrap_or_default()
                .to_string(),
            date: doc.text("date").unwrap_or(today).to_string(),
            published: doc
                .text("published")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            tags: doc.list("tags").map(<[String]>::to_vec).unwrap_or_default(),
            cover_url: doc
                .text("image")
                .filter(|url| url.starts_with("http"))
                .map(str::to_string),
            title,
        }
    }

    /// Body blocks. Images must already be absolute URLs; anything else is
    /// kept as literal Markdown text.
    pub fn blocks(&self) -> Vec<Block> {
        markdown::to_blocks(&self.document.body)
            .into_iter()
            .map(|parsed| match parsed {
                ParsedBlock::Ready(block) => block,
                ParsedBlock::Image { alt, src } if src.starts_with("http") => Block::Image {
                    url: src,
                    caption: Some(alt),
                },
                ParsedBlock::Image { alt, src } => ParsedBlock::image_fallback(&alt, &src),
            })
            .collect()
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes.
fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
