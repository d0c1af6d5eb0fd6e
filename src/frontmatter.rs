//! Frontmatter handling for Markdown posts.
//!
//! A post may start with a `---` delimited metadata header. The header is
//! read as YAML when possible; hand-written headers that are not valid YAML
//! (unquoted colons in titles are common) go through a lenient line scanner
//! instead.

use std::collections::BTreeMap;

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    List(Vec<String>),
}

/// A Markdown document split into metadata and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub metadata: BTreeMap<String, Value>,
    pub body: String,
}

impl Document {
    /// Text value for `key`. Empty strings count as absent.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(Value::Text(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// List value for `key`. A scalar value is not treated as a list.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.metadata.get(key) {
            Some(Value::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }
}

/// Split content into raw frontmatter and body.
///
/// Line endings are normalized to LF. Frontmatter is only recognized when the
/// content opens with `---\n` and a closing `\n---\n` follows; otherwise the
/// whole (normalized) content is the body.
pub fn split(content: &str) -> (Option<String>, String) {
    let normalized = content.replace("\r\n", "\n");

    let Some(rest) = normalized.strip_prefix("---\n") else {
        return (None, normalized);
    };

    // An empty header closes immediately on the next line.
    if let Some(body) = rest.strip_prefix("---\n") {
        return (Some(String::new()), body.to_string());
    }

    match rest.find("\n---\n") {
        Some(end) => {
            let raw = rest[..end].to_string();
            let body = rest[end + "\n---\n".len()..].to_string();
            (Some(raw), body)
        }
        None => (None, normalized),
    }
}

/// Parse a Markdown document with optional frontmatter.
pub fn parse(content: &str) -> Document {
    let (raw, body) = split(content);

    let metadata = match raw {
        Some(raw) => parse_yaml(&raw).unwrap_or_else(|| parse_lines(&raw)),
        None => BTreeMap::new(),
    };

    Document { metadata, body }
}

fn parse_yaml(raw: &str) -> Option<BTreeMap<String, Value>> {
    let value: serde_yaml::Value = serde_yaml::from_str(raw).ok()?;
    let mapping = match value {
        serde_yaml::Value::Mapping(m) => m,
        serde_yaml::Value::Null => return Some(BTreeMap::new()),
        _ => return None,
    };

    let mut metadata = BTreeMap::new();
    for (key, value) in mapping {
        let Some(key) = scalar_to_string(&key) else {
            continue;
        };
        let value = match value {
            serde_yaml::Value::Sequence(items) => {
                Value::List(items.iter().filter_map(scalar_to_string).collect())
            }
            other => Value::Text(scalar_to_string(&other).unwrap_or_default()),
        };
        metadata.insert(key, value);
    }
    Some(metadata)
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        _ => None,
    }
}

/// `key: value` per line; `[a, b]` values become lists.
fn parse_lines(raw: &str) -> BTreeMap<String, Value> {
    let mut metadata = BTreeMap::new();

    for line in raw.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_string();
        let value = value.trim();

        let value = if value.len() >= 2 && value.starts_with('[') && value.ends_with(']') {
            Value::List(
                value[1..value.len() - 1]
                    .split(',')
                    .map(|item| strip_quotes(item.trim()).to_string())
                    .collect(),
            )
        } else {
            Value::Text(strip_quotes(value).to_string())
        };
        metadata.insert(key, value);
    }

    metadata
}

/// Remove one leading and one trailing quote character, independently.
fn strip_quotes(value: &str) -> &str {
    let value = value
        .strip_prefix('"')
        .or_else(|| value.strip_prefix('\''))
        .unwrap_or(value);
    value
        .strip_suffix('"')
        .or_else(|| value.strip_suffix('\''))
        .unwrap_or(value)
}
