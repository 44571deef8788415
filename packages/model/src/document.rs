//! # Template Document
//!
//! The full template being edited: name, ordered blocks, global styles and
//! attachments. Serializes to the same shape the save endpoint accepts:
//!
//! ```text
//! { "name": ..., "blocks": [...], "attachments": [...], "global": {...} }
//! ```

use crate::block::{Block, BlockType, Props, DEFAULT_SIGNATURE_HTML};
use crate::id_generator::IDGenerator;
use serde::{Deserialize, Serialize};

/// Styles applied uniformly to the rendered wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStyles {
    pub background: String,
    pub font: String,
    pub padding: u32,
}

impl Default for GlobalStyles {
    fn default() -> Self {
        Self {
            background: "#f7f7f7".to_string(),
            font: "Inter".to_string(),
            padding: 24,
        }
    }
}

/// Uploaded file sent along with the template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    #[serde(rename = "size", alias = "sizeBytes", default)]
    pub size_bytes: u64,
}

/// Editable email template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub name: String,

    /// Top-to-bottom render order
    #[serde(default)]
    pub blocks: Vec<Block>,

    #[serde(default)]
    pub attachments: Vec<Attachment>,

    #[serde(rename = "global", default)]
    pub global_styles: GlobalStyles,

    #[serde(skip)]
    ids: IDGenerator,
}

impl Document {
    /// Empty document (no blocks)
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            ids: IDGenerator::new(&name),
            name,
            blocks: Vec::new(),
            attachments: Vec::new(),
            global_styles: GlobalStyles::default(),
        }
    }

    /// The starter template: greeting text, call-to-action, divider and the
    /// locked compliance footer
    pub fn starter() -> Self {
        let mut doc = Self::new("New template");

        let greeting = doc.create_block(BlockType::Text).update_props(
            Props::new()
                .with(
                    "text",
                    "<p style=\"margin:0 0 8px 0; font-weight:600; color:#111827;\">Hi {{first_name | default:\"there\"}},</p><p style=\"margin:0; color:#111827;\">Thanks for being a subscriber. Here&#39;s a quick update from the team.</p>",
                )
                .with("size", 16)
                .with("color", "#111827")
                .with("align", "left")
                .with("padding", 18),
        );
        let cta = doc.create_block(BlockType::Button).update_props(
            Props::new()
                .with("text", "Open dashboard")
                .with("url", "https://example.com")
                .with("style", "primary")
                .with("align", "left")
                .with("padding", 18),
        );
        let divider = doc.create_block(BlockType::Divider);
        let footer = doc.create_block(BlockType::Signature).update_props(
            Props::new()
                .with("text", DEFAULT_SIGNATURE_HTML)
                .with("color", "#6B7280")
                .with("padding", 16)
                .with("align", "left"),
        );

        doc.blocks = vec![greeting, cta, divider, footer];
        doc
    }

    /// Create a block with a fresh id unique within this document.
    /// The block is not inserted.
    pub fn create_block(&mut self, block_type: BlockType) -> Block {
        let blocks = &self.blocks;
        let id = self
            .ids
            .new_id_avoiding(|candidate| blocks.iter().any(|b| b.id() == candidate));
        Block::new(id, block_type)
    }

    pub fn find_block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn find_block_mut(&mut self, id: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    pub fn block_ids(&self) -> Vec<&str> {
        self.blocks.iter().map(Block::id).collect()
    }

    pub fn blocks_of(&self, block_type: BlockType) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(move |b| b.block_type() == block_type)
    }

    pub fn has_block_of(&self, block_type: BlockType) -> bool {
        self.blocks_of(block_type).next().is_some()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::starter()
    }
}

impl PartialEq for Document {
    // The id generator is editor bookkeeping, not content
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.blocks == other.blocks
            && self.attachments == other.attachments
            && self.global_styles == other.global_styles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_document_layout() {
        let doc = Document::starter();
        let types: Vec<_> = doc.blocks.iter().map(Block::block_type).collect();

        assert_eq!(
            types,
            vec![BlockType::Text, BlockType::Button, BlockType::Divider, BlockType::Signature]
        );
        assert_eq!(doc.blocks_of(BlockType::Signature).count(), 1);
        assert!(doc.blocks[3].is_locked());
        assert!(doc.attachments.is_empty());
        assert_eq!(doc.global_styles, GlobalStyles::default());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut doc = Document::starter();
        for _ in 0..10 {
            let block = doc.create_block(BlockType::Spacer);
            doc.blocks.push(block);
        }

        let mut ids = doc.block_ids();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), doc.blocks.len());
    }

    #[test]
    fn test_loaded_document_does_not_reuse_ids() {
        let json = r#"{
            "name": "Loaded",
            "blocks": [
                {"id": "blk-1", "type": "text", "props": {"text": "a"}},
                {"id": "blk-2", "type": "text", "props": {"text": "b"}}
            ]
        }"#;
        let mut doc: Document = serde_json::from_str(json).unwrap();
        let block = doc.create_block(BlockType::Text);

        assert_eq!(block.id(), "blk-3");
        assert_eq!(doc.global_styles, GlobalStyles::default());
    }

    #[test]
    fn test_serializes_save_payload_shape() {
        let mut doc = Document::new("Promo");
        doc.attachments.push(Attachment {
            filename: "deck.pdf".to_string(),
            url: "/uploads/attachments/att-1.pdf".to_string(),
            size_bytes: 2048,
        });

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["name"], "Promo");
        assert_eq!(value["global"]["padding"], 24);
        assert_eq!(value["attachments"][0]["size"], 2048);
        assert!(value.get("ids").is_none());
    }

    #[test]
    fn test_attachment_accepts_size_bytes_alias() {
        let json = r#"{"filename":"a.txt","url":"/a","sizeBytes":12}"#;
        let att: Attachment = serde_json::from_str(json).unwrap();
        assert_eq!(att.size_bytes, 12);
    }
}
