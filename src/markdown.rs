//! Markdown to block conversion.
//!
//! A single pass over the lines of a post body. Each line maps to at most one
//! block; there is no nesting and no inline formatting. Images are returned
//! unresolved because their sources usually need uploading first.

use std::sync::OnceLock;

use regex::Regex;

use crate::notion::{Block, CalloutColor};

pub const DEFAULT_CODE_LANGUAGE: &str = "plain text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedBlock {
    Ready(Block),
    /// `![alt](src)` whose source still has to be resolved to a URL.
    Image { alt: String, src: String },
}

impl ParsedBlock {
    /// The literal Markdown used when an image cannot be resolved.
    pub fn image_fallback(alt: &str, src: &str) -> Block {
        Block::paragraph(format!("![{}]({})", alt, src))
    }
}

fn image_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("valid image regex"))
}

fn numbered_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.\s+(.*)$").expect("valid list regex"))
}

struct Fence {
    language: String,
    content: String,
}

impl Fence {
    fn into_block(self) -> Block {
        let language = if self.language.is_empty() {
            DEFAULT_CODE_LANGUAGE.to_string()
        } else {
            self.language
        };
        Block::Code {
            language,
            content: self.content,
        }
    }
}

/// GitHub alert markers and how they render as callouts.
fn alert_style(marker: &str) -> Option<(&'static str, CalloutColor)> {
    match marker {
        "[!NOTE]" => Some(("💡", CalloutColor::Gray)),
        "[!TIP]" => Some(("✅", CalloutColor::Green)),
        "[!IMPORTANT]" => Some(("❗", CalloutColor::Purple)),
        "[!WARNING]" => Some(("⚠️", CalloutColor::Yellow)),
        "[!CAUTION]" => Some(("🚫", CalloutColor::Red)),
        _ => None,
    }
}

fn quote_group_to_block(lines: Vec<String>) -> Block {
    if let Some(first) = lines.first() {
        if let Some((emoji, color)) = alert_style(first.trim()) {
            return Block::Callout {
                text: lines[1..].join("\n"),
                emoji: emoji.to_string(),
                color,
            };
        }
    }
    Block::Quote(lines.join("\n"))
}

/// Convert a Markdown body into a flat list of blocks.
pub fn to_blocks(markdown: &str) -> Vec<ParsedBlock> {
    let mut blocks = Vec::new();
    let mut fence: Option<Fence> = None;
    let mut quote: Vec<String> = Vec::new();

    for line in markdown.split('\n') {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("```") {
            if !quote.is_empty() {
                blocks.push(ParsedBlock::Ready(quote_group_to_block(std::mem::take(
                    &mut quote,
                ))));
            }
            match fence.take() {
                Some(open) => blocks.push(ParsedBlock::Ready(open.into_block())),
                None => {
                    fence = Some(Fence {
                        language: rest.trim().to_string(),
                        content: String::new(),
                    })
                }
            }
            continue;
        }

        if let Some(open) = fence.as_mut() {
            open.content.push_str(line);
            open.content.push('\n');
            continue;
        }

        if let Some(rest) = line.strip_prefix('>') {
            quote.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
            continue;
        }
        if !quote.is_empty() {
            blocks.push(ParsedBlock::Ready(quote_group_to_block(std::mem::take(
                &mut quote,
            ))));
        }

        if let Some(text) = line.strip_prefix("# ") {
            blocks.push(ParsedBlock::Ready(Block::heading(1, text)));
        } else if let Some(text) = line.strip_prefix("## ") {
            blocks.push(ParsedBlock::Ready(Block::heading(2, text)));
        } else if let Some(text) = line.strip_prefix("### ") {
            blocks.push(ParsedBlock::Ready(Block::heading(3, text)));
        } else if let Some(caps) = image_pattern().captures(line) {
            blocks.push(ParsedBlock::Image {
                alt: caps[1].to_string(),
                src: caps[2].to_string(),
            });
        } else if let Some(text) = trimmed.strip_prefix("- ") {
            blocks.push(ParsedBlock::Ready(Block::BulletedListItem(text.to_string())));
        } else if let Some(caps) = numbered_pattern().captures(trimmed) {
            blocks.push(ParsedBlock::Ready(Block::NumberedListItem(
                caps[1].to_string(),
            )));
        } else if !trimmed.is_empty() {
            blocks.push(ParsedBlock::Ready(Block::paragraph(line)));
        }
    }

    if !quote.is_empty() {
        blocks.push(ParsedBlock::Ready(quote_group_to_block(quote)));
    }
    // Unterminated fence: keep what was collected.
    if let Some(open) = fence {
        blocks.push(ParsedBlock::Ready(open.into_block()));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(block: Block) -> ParsedBlock {
        ParsedBlock::Ready(block)
    }

    #[test]
    fn test_heading_levels() {
        let blocks = to_blocks("# One\n## Two\n### Three\n#### Four");
        assert_eq!(
            blocks,
            vec![
                ready(Block::heading(1, "One")),
                ready(Block::heading(2, "Two")),
                ready(Block::heading(3, "Three")),
                ready(Block::paragraph("#### Four")),
            ]
        );
    }

    #[test]
    fn test_heading_requires_space() {
        assert_eq!(
            to_blocks("#hashtag"),
            vec![ready(Block::paragraph("#hashtag"))]
        );
    }

    #[test]
    fn test_bulleted_list_trims_indent() {
        assert_eq!(
            to_blocks("  - nested item  "),
            vec![ready(Block::BulletedListItem("nested item".to_string()))]
        );
    }

    #[test]
    fn test_numbered_list() {
        assert_eq!(
            to_blocks("1. first\n12. twelfth"),
            vec![
                ready(Block::NumberedListItem("first".to_string())),
                ready(Block::NumberedListItem("twelfth".to_string())),
            ]
        );
    }

    #[test]
    fn test_image_anywhere_in_line() {
        let blocks = to_blocks("See ![Architecture](/images/arch.png) below");
        assert_eq!(
            blocks,
            vec![ParsedBlock::Image {
                alt: "Architecture".to_string(),
                src: "/images/arch.png".to_string(),
            }]
        );
    }

    #[test]
    fn test_image_with_empty_alt() {
        let blocks = to_blocks("![](https://example.com/a.png)");
        assert_eq!(
            blocks,
            vec![ParsedBlock::Image {
                alt: String::new(),
                src: "https://example.com/a.png".to_string(),
            }]
        );
    }

    #[test]
    fn test_paragraph_keeps_line_and_skips_blank() {
        let blocks = to_blocks("First line\n\n   \n  indented text");
        assert_eq!(
            blocks,
            vec![
                ready(Block::paragraph("First line")),
                ready(Block::paragraph("  indented text")),
            ]
        );
    }

    #[test]
    fn test_fenced_code_block() {
        let blocks = to_blocks("```rust\nfn main() {\n    # not a heading\n}\n```\nafter");
        assert_eq!(
            blocks,
            vec![
                ready(Block::Code {
                    language: "rust".to_string(),
                    content: "fn main() {\n    # not a heading\n}\n".to_string(),
                }),
                ready(Block::paragraph("after")),
            ]
        );
    }

    #[test]
    fn test_fenced_code_without_language() {
        let blocks = to_blocks("```\nplain\n```");
        assert_eq!(
            blocks,
            vec![ready(Block::Code {
                language: DEFAULT_CODE_LANGUAGE.to_string(),
                content: "plain\n".to_string(),
            })]
        );
    }

    #[test]
    fn test_unterminated_fence_is_flushed() {
        let blocks = to_blocks("```sh\necho hi");
        assert_eq!(
            blocks,
            vec![ready(Block::Code {
                language: "sh".to_string(),
                content: "echo hi\n".to_string(),
            })]
        );
    }

    #[test]
    fn test_quote_group() {
        let blocks = to_blocks("> first\n> second\nafter");
        assert_eq!(
            blocks,
            vec![
                ready(Block::Quote("first\nsecond".to_string())),
                ready(Block::paragraph("after")),
            ]
        );
    }

    #[test]
    fn test_alert_becomes_callout() {
        let blocks = to_blocks("> [!WARNING]\n> Invest at your own risk.");
        assert_eq!(
            blocks,
            vec![ready(Block::Callout {
                text: "Invest at your own risk.".to_string(),
                emoji: "⚠️".to_string(),
                color: CalloutColor::Yellow,
            })]
        );
    }

    #[test]
    fn test_mixed_document_order() {
        let markdown = "## Intro\nText\n- a\n- b\n![x](/images/x.png)\n### End";
        let kinds: Vec<&str> = to_blocks(markdown)
            .iter()
            .map(|b| match b {
                ParsedBlock::Ready(block) => block.kind(),
                ParsedBlock::Image { .. } => "image",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "heading_2",
                "paragraph",
                "bulleted_list_item",
                "bulleted_list_item",
                "image",
                "heading_3"
            ]
        );
    }

    #[test]
    fn test_image_fallback_text() {
        assert_eq!(
            ParsedBlock::image_fallback("alt", "/images/missing.png"),
            Block::paragraph("![alt](/images/missing.png)")
        );
    }
}
