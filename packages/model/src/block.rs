//! # Blocks
//!
//! The closed set of block types and their property schemas.
//!
//! Props are a loose name → JSON value mapping. Which keys a block carries
//! is decided by its type at creation; keys foreign to the type are kept
//! as-is and ignored by rendering.

use crate::error::ModelError;
use crate::id_generator::IDGenerator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a block within a document
pub type BlockId = String;

/// Signature footer used by new signature blocks and the starter document
pub const DEFAULT_SIGNATURE_HTML: &str = "<p style='margin:0 0 6px 0;'>You are receiving this because you opted in to updates.</p><p style='margin:0;'>Unsubscribe: {{unsubscribe_url}}</p>";

/// Block type (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Text,
    Image,
    Button,
    Divider,
    Spacer,
    Signature,
}

impl BlockType {
    /// Every block type, in block-menu order
    pub const ALL: [BlockType; 6] = [
        BlockType::Text,
        BlockType::Image,
        BlockType::Button,
        BlockType::Divider,
        BlockType::Spacer,
        BlockType::Signature,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Button => "button",
            BlockType::Divider => "divider",
            BlockType::Spacer => "spacer",
            BlockType::Signature => "signature",
        }
    }

    /// Block menu label
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Text => "Text",
            BlockType::Image => "Image",
            BlockType::Button => "Button",
            BlockType::Divider => "Divider",
            BlockType::Spacer => "Spacer",
            BlockType::Signature => "Signature",
        }
    }

    /// Block menu description
    pub fn description(&self) -> &'static str {
        match self {
            BlockType::Text => "Paragraph or headline with personalization",
            BlockType::Image => "Upload and display an inline image",
            BlockType::Button => "High-contrast call-to-action",
            BlockType::Divider => "Thin rule to separate sections",
            BlockType::Spacer => "Add breathing room",
            BlockType::Signature => "Compliance footer with unsubscribe",
        }
    }

    /// Whether the block carries editable HTML in its `text` prop
    pub fn is_text_capable(&self) -> bool {
        matches!(self, BlockType::Text | BlockType::Signature)
    }

    /// Whether blocks of this type are created locked
    pub fn is_locked(&self) -> bool {
        matches!(self, BlockType::Signature)
    }

    /// Default props for a freshly created block
    pub fn default_props(&self) -> Props {
        match self {
            BlockType::Text => Props::new()
                .with("text", "<p>New text</p>")
                .with("size", 16)
                .with("color", "#111827")
                .with("align", "left")
                .with("padding", 16),
            BlockType::Image => Props::new()
                .with("src", "")
                .with("alt", "")
                .with("align", "center")
                .with("width", 520)
                .with("padding", 16),
            BlockType::Button => Props::new()
                .with("text", "Call to action")
                .with("url", "https://")
                .with("style", "primary")
                .with("align", "left")
                .with("padding", 16),
            BlockType::Divider => Props::new().with("padding", 12),
            BlockType::Spacer => Props::new().with("height", 20).with("padding", 0),
            BlockType::Signature => Props::new()
                .with("text", DEFAULT_SIGNATURE_HTML)
                .with("color", "#6B7280")
                .with("align", "left")
                .with("padding", 16),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownBlockType(s.to_string()))
    }
}

/// Visual variant of a button block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Primary,
    Secondary,
    Outline,
}

impl ButtonStyle {
    pub const ALL: [ButtonStyle; 3] = [ButtonStyle::Primary, ButtonStyle::Secondary, ButtonStyle::Outline];

    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonStyle::Primary => "primary",
            ButtonStyle::Secondary => "secondary",
            ButtonStyle::Outline => "outline",
        }
    }

    /// Read a `style` prop. Anything that is not primary or outline
    /// renders as secondary.
    pub fn from_prop(value: &str) -> Self {
        ButtonStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == value)
            .unwrap_or(ButtonStyle::Secondary)
    }
}

/// Horizontal alignment of a block's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }

    /// Read an `align` prop, falling back to `fallback` for unknown values
    pub fn from_prop(value: Option<&str>, fallback: Align) -> Self {
        match value {
            Some("left") => Align::Left,
            Some("center") => Align::Center,
            Some("right") => Align::Right,
            _ => fallback,
        }
    }
}

/// Property mapping of a block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(Map<String, Value>);

impl Props {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert, used to spread prior values into a new mapping
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// String prop, if present and a string
    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn str_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.str(key).unwrap_or(fallback)
    }

    /// Integer prop. Floats are truncated and numeric strings parsed,
    /// since form inputs hand back either.
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn int_or(&self, key: &str, fallback: i64) -> i64 {
        self.int(key).unwrap_or(fallback)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Props {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One typed unit of email content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,

    #[serde(rename = "type")]
    block_type: BlockType,

    /// Set at creation for signature blocks, never changed afterwards
    #[serde(default)]
    locked: bool,

    #[serde(default)]
    props: Props,
}

impl Block {
    /// Create a block with the type's default props
    pub fn new(id: impl Into<BlockId>, block_type: BlockType) -> Self {
        Self::with_props(id, block_type, block_type.default_props())
    }

    /// Create a block with explicit props
    pub fn with_props(id: impl Into<BlockId>, block_type: BlockType, props: Props) -> Self {
        Self {
            id: id.into(),
            block_type,
            locked: block_type.is_locked(),
            props,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// `text` prop (HTML for text/signature, label for buttons)
    pub fn text(&self) -> &str {
        self.props.str_or("text", "")
    }

    /// Replace the whole props mapping
    pub fn update_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    /// In-place form of [`Block::update_props`]
    pub fn set_props(&mut self, props: Props) {
        self.props = props;
    }

    /// Locked blocks cannot be removed
    pub fn can_remove(&self) -> bool {
        !self.locked
    }
}

/// Create a block with a fresh id from `ids`
pub fn create_block(block_type: BlockType, ids: &mut IDGenerator) -> Block {
    Block::new(ids.new_id(), block_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_block_applies_defaults() {
        let mut ids = IDGenerator::from_seed("t".to_string());
        let block = create_block(BlockType::Button, &mut ids);

        assert_eq!(block.id(), "t-1");
        assert_eq!(block.block_type(), BlockType::Button);
        assert!(!block.is_locked());
        assert_eq!(block.props().str("url"), Some("https://"));
        assert_eq!(block.props().str("style"), Some("primary"));
        assert_eq!(block.props().int("padding"), Some(16));
    }

    #[test]
    fn test_only_signature_is_locked() {
        let mut ids = IDGenerator::default();
        for block_type in BlockType::ALL {
            let block = create_block(block_type, &mut ids);
            assert_eq!(block.is_locked(), block_type == BlockType::Signature);
            assert_eq!(block.can_remove(), block_type != BlockType::Signature);
        }
    }

    #[test]
    fn test_update_props_replaces_instead_of_merging() {
        let block = Block::new("b1", BlockType::Text);
        let updated = block.update_props(Props::new().with("text", "<p>Hi</p>"));

        assert_eq!(updated.text(), "<p>Hi</p>");
        assert!(!updated.props().contains_key("size"));
        assert_eq!(updated.props().len(), 1);
    }

    #[test]
    fn test_foreign_props_linger() {
        let block = Block::new("b1", BlockType::Divider)
            .update_props(Props::new().with("padding", 4).with("height", 99));
        assert_eq!(block.props().int("height"), Some(99));
    }

    #[test]
    fn test_int_accepts_strings_and_floats() {
        let props = Props::new().with("a", "24").with("b", 12.7).with("c", true);
        assert_eq!(props.int("a"), Some(24));
        assert_eq!(props.int("b"), Some(12));
        assert_eq!(props.int("c"), None);
        assert_eq!(props.int_or("missing", 7), 7);
    }

    #[test]
    fn test_block_type_round_trips_names() {
        for block_type in BlockType::ALL {
            assert_eq!(block_type.as_str().parse::<BlockType>().unwrap(), block_type);
        }
        assert!("video".parse::<BlockType>().is_err());
    }

    #[test]
    fn test_block_wire_shape() {
        let json = r#"{"id":"x","type":"signature","props":{"text":"bye"}}"#;
        let block: Block = serde_json::from_str(json).unwrap();

        // locked comes from the wire, not the type
        assert!(!block.is_locked());
        assert_eq!(block.block_type(), BlockType::Signature);

        let out = serde_json::to_value(Block::new("y", BlockType::Signature)).unwrap();
        assert_eq!(out["type"], "signature");
        assert_eq!(out["locked"], true);
    }

    #[test]
    fn test_button_style_fallback() {
        assert_eq!(ButtonStyle::from_prop("outline"), ButtonStyle::Outline);
        assert_eq!(ButtonStyle::from_prop("ghost"), ButtonStyle::Secondary);
        for style in ButtonStyle::ALL {
            assert_eq!(ButtonStyle::from_prop(style.as_str()), style);
        }
    }
}
