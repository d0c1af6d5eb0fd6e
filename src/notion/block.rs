//! Content blocks appended to a page.

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

/// The API rejects text objects longer than this many characters.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Rich text array with a single plain style, split at the per-object limit.
pub fn rich_text(content: &str) -> Value {
    let runs: Vec<Value> = split_text(content)
        .into_iter()
        .map(|run| json!({ "type": "text", "text": { "content": run } }))
        .collect();
    Value::Array(runs)
}

/// Split into runs of at most `MAX_TEXT_CHARS` characters.
pub fn split_text(content: &str) -> Vec<String> {
    if content.is_empty() {
        return vec![String::new()];
    }

    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(MAX_TEXT_CHARS)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Background colors accepted for callouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutColor {
    Default,
    Gray,
    Green,
    Yellow,
    Red,
    Purple,
    Blue,
}

impl CalloutColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Gray => "gray_background",
            Self::Green => "green_background",
            Self::Yellow => "yellow_background",
            Self::Red => "red_background",
            Self::Purple => "purple_background",
            Self::Blue => "blue_background",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Level is clamped to 1..=3 on serialization.
    Heading {
        level: u8,
        text: String,
    },
    Paragraph(String),
    BulletedListItem(String),
    NumberedListItem(String),
    Code {
        language: String,
        content: String,
    },
    Image {
        url: String,
        caption: Option<String>,
    },
    Callout {
        text: String,
        emoji: String,
        color: CalloutColor,
    },
    Quote(String),
}

impl Block {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level: level.clamp(1, 3),
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph(text.into())
    }

    /// The API's `type` discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading { level, .. } => match (*level).clamp(1, 3) {
                1 => "heading_1",
                2 => "heading_2",
                _ => "heading_3",
            },
            Self::Paragraph(_) => "paragraph",
            Self::BulletedListItem(_) => "bulleted_list_item",
            Self::NumberedListItem(_) => "numbered_list_item",
            Self::Code { .. } => "code",
            Self::Image { .. } => "image",
            Self::Callout { .. } => "callout",
            Self::Quote(_) => "quote",
        }
    }

    /// JSON payload in the API's block object shape.
    pub fn to_json(&self) -> Value {
        let body = match self {
            Self::Heading { text, .. }
            | Self::Paragraph(text)
            | Self::BulletedListItem(text)
            | Self::NumberedListItem(text)
            | Self::Quote(text) => json!({ "rich_text": rich_text(text) }),
            Self::Code { language, content } => json!({
                "rich_text": rich_text(content),
                "language": language,
            }),
            Self::Image { url, caption } => json!({
                "type": "external",
                "external": { "url": url },
                "caption": match caption.as_deref() {
                    Some(c) if !c.is_empty() => rich_text(c),
                    _ => Value::Array(vec![]),
                },
            }),
            Self::Callout { text, emoji, color } => json!({
                "rich_text": rich_text(text),
                "icon": { "type": "emoji", "emoji": emoji },
                "color": color.as_str(),
            }),
        };

        let kind = self.kind();
        let mut object = serde_json::Map::new();
        object.insert("object".to_string(), json!("block"));
        object.insert("type".to_string(), json!(kind));
        object.insert(kind.to_string(), body);
        Value::Object(object)
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_json_shape() {
        let block = Block::heading(2, "はじめに");
        assert_eq!(
            block.to_json(),
            json!({
                "object": "block",
                "type": "heading_2",
                "heading_2": {
                    "rich_text": [{ "type": "text", "text": { "content": "はじめに" } }]
                }
            })
        );
    }

    #[test]
    fn test_heading_level_clamped() {
        assert_eq!(Block::heading(0, "x").kind(), "heading_1");
        assert_eq!(Block::heading(6, "x").kind(), "heading_3");
    }

    #[test]
    fn test_code_block_language() {
        let block = Block::Code {
            language: "rust".to_string(),
            content: "fn main() {}\n".to_string(),
        };
        let json = block.to_json();
        assert_eq!(json["type"], "code");
        assert_eq!(json["code"]["language"], "rust");
        assert_eq!(
            json["code"]["rich_text"][0]["text"]["content"],
            "fn main() {}\n"
        );
    }

    #[test]
    fn test_image_caption_empty_when_missing() {
        let block = Block::Image {
            url: "https://images.example.com/a.png".to_string(),
            caption: Some(String::new()),
        };
        let json = block.to_json();
        assert_eq!(json["image"]["type"], "external");
        assert_eq!(
            json["image"]["external"]["url"],
            "https://images.example.com/a.png"
        );
        assert_eq!(json["image"]["caption"], json!([]));
    }

    #[test]
    fn test_image_caption_from_alt() {
        let block = Block::Image {
            url: "https://images.example.com/a.png".to_string(),
            caption: Some("diagram".to_string()),
        };
        assert_eq!(
            block.to_json()["image"]["caption"][0]["text"]["content"],
            "diagram"
        );
    }

    #[test]
    fn test_callout_icon_and_color() {
        let block = Block::Callout {
            text: "Not financial advice.".to_string(),
            emoji: "⚠️".to_string(),
            color: CalloutColor::Yellow,
        };
        let json = block.to_json();
        assert_eq!(json["callout"]["icon"]["emoji"], "⚠️");
        assert_eq!(json["callout"]["color"], "yellow_background");
    }

    #[test]
    fn test_split_text_counts_characters() {
        let long: String = "あ".repeat(MAX_TEXT_CHARS * 2 + 5);
        let runs = split_text(&long);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].chars().count(), MAX_TEXT_CHARS);
        assert_eq!(runs[2].chars().count(), 5);
    }

    #[test]
    fn test_rich_text_for_empty_string() {
        assert_eq!(
            rich_text(""),
            json!([{ "type": "text", "text": { "content": "" } }])
        );
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let block = Block::BulletedListItem("item".to_string());
        let serialized = serde_json::to_value(&block).unwrap();
        assert_eq!(serialized, block.to_json());
    }
}
