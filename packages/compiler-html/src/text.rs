use outreach_model::{BlockType, Document};
use regex::Regex;
use std::sync::OnceLock;

/// Options for the plain-text projection
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    /// Emit `label -> url` for button blocks, as the delivery text part does
    pub include_button_links: bool,
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>?").expect("tag pattern is valid"))
}

/// Remove all markup tags from `html`
pub fn strip_tags(html: &str) -> String {
    tag_pattern().replace_all(html, "").into_owned()
}

/// Plain-text view: text and signature content with tags stripped, one
/// blank line between blocks, in document order
pub fn compile_to_text(document: &Document, options: &TextOptions) -> String {
    let mut parts: Vec<String> = Vec::new();

    for block in &document.blocks {
        match block.block_type() {
            BlockType::Text | BlockType::Signature => parts.push(strip_tags(block.text())),
            BlockType::Button if options.include_button_links => {
                let props = block.props();
                parts.push(format!(
                    "{} -> {}",
                    strip_tags(props.str_or("text", "Action")),
                    props.str_or("url", "#")
                ));
            }
            _ => {}
        }
    }

    parts.join("\n\n")
}
