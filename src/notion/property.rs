//! Page property values and the page-creation payload.

use serde_json::{json, Map, Value};

use super::block::rich_text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Title(String),
    RichText(String),
    /// ISO date, `YYYY-MM-DD`.
    Date(String),
    Checkbox(bool),
    MultiSelect(Vec<String>),
    ExternalFiles { name: String, url: String },
}

impl PropertyValue {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Title(text) => json!({ "title": rich_text(text) }),
            Self::RichText(text) => json!({ "rich_text": rich_text(text) }),
            Self::Date(start) => json!({ "date": { "start": start } }),
            Self::Checkbox(checked) => json!({ "checkbox": checked }),
            Self::MultiSelect(names) => {
                let options: Vec<Value> = names.iter().map(|n| json!({ "name": n })).collect();
                json!({ "multi_select": options })
            }
            Self::ExternalFiles { name, url } => json!({
                "files": [{
                    "type": "external",
                    "name": name,
                    "external": { "url": url },
                }]
            }),
        }
    }
}

/// Payload for creating a page inside a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
    pub database_id: String,
    pub properties: Vec<(String, PropertyValue)>,
}

impl NewPage {
    pub fn new(database_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            properties: Vec::new(),
        }
    }

    pub fn property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.push((name.into(), value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for (name, value) in &self.properties {
            properties.insert(name.clone(), value.to_json());
        }
        json!({
            "parent": { "database_id": self.database_id },
            "properties": properties,
        })
    }
}

/// A blog post as the target database models it.
///
/// Property names are fixed by the database: `Page` is the title column and
/// `FeaturedImage` is only sent when a cover exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPostProperties {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub date: String,
    pub published: bool,
    pub tags: Vec<String>,
    pub cover_url: Option<String>,
}

impl BlogPostProperties {
    pub fn into_page(self, database_id: &str) -> NewPage {
        let mut page = NewPage::new(database_id)
            .property("Page", PropertyValue::Title(self.title))
            .property("Slug", PropertyValue::RichText(self.slug))
            .property("Excerpt", PropertyValue::RichText(self.excerpt))
            .property("Date", PropertyValue::Date(self.date))
            .property("Published", PropertyValue::Checkbox(self.published))
            .property("Tags", PropertyValue::MultiSelect(self.tags));

        if let Some(url) = self.cover_url {
            page = page.property(
                "FeaturedImage",
                PropertyValue::ExternalFiles {
                    name: "cover".to_string(),
                    url,
                },
            );
        }

        page
    }
}
