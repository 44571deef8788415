//! # Document Mutations
//!
//! Every editor action is a `Mutation` value: serializable, validated
//! against the current document, then applied in place.
//!
//! ## Mutation Semantics
//!
//! ### AddBlock
//! - Appends a block of the given type with default props
//! - The id is chosen by the caller so replaying the mutation is
//!   deterministic; it must not already be in use
//!
//! ### RemoveBlock
//! - Fails for locked blocks; the document is left untouched
//!
//! ### MoveBlock
//! - Relocates by index; `from == to` is a no-op
//! - Refused under `ReorderPolicy::PinLocked` if a locked block would shift
//!
//! ### UpdateProps
//! - Full replacement of the props mapping, never a merge
//!
//! ### InsertPersonalization
//! - Appends a catalog merge token to a text or signature block
//!
//! ### AddAttachment
//! - Appends an uploaded file record; the upload itself happens first

use outreach_model::{
    append_token, move_block, reorder::move_allowed, Attachment, Block, BlockId, BlockType, Document, GlobalStyles,
    MergeVariable, Props, ReorderPolicy,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic editor operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Append a new block with default props
    AddBlock { block_id: BlockId, block_type: BlockType },

    /// Remove an unlocked block
    RemoveBlock { block_id: BlockId },

    /// Move the block at `from` to `to`
    MoveBlock { from: usize, to: usize },

    /// Replace a block's props
    UpdateProps { block_id: BlockId, props: Props },

    /// Append a merge token to a text-capable block
    InsertPersonalization { block_id: BlockId, variable: MergeVariable },

    /// Record an uploaded attachment
    AddAttachment { attachment: Attachment },

    SetGlobalStyles { styles: GlobalStyles },

    Rename { name: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Block id already in use: {0}")]
    DuplicateId(BlockId),

    #[error("Block is locked: {0}")]
    BlockLocked(BlockId),

    #[error("Index {index} out of range for {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Move from {from} to {to} would displace a locked block")]
    MoveRefused { from: usize, to: usize },

    #[error("Block does not hold text: {0}")]
    NotTextCapable(BlockId),
}

/// What an applied mutation did to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    BlockAdded(BlockId),
    BlockRemoved(BlockId),
    Changed,
    Unchanged,
}

impl MutationOutcome {
    pub fn is_change(&self) -> bool {
        !matches!(self, MutationOutcome::Unchanged)
    }
}

impl Mutation {
    /// Check the mutation against `doc` without changing it
    pub fn validate(&self, doc: &Document, policy: ReorderPolicy) -> Result<(), MutationError> {
        match self {
            Mutation::SetGlobalStyles { .. } | Mutation::Rename { .. } | Mutation::AddAttachment { .. } => Ok(()),

            Mutation::AddBlock { block_id, .. } => {
                if doc.find_block(block_id).is_some() {
                    Err(MutationError::DuplicateId(block_id.clone()))
                } else {
                    Ok(())
                }
            }

            Mutation::RemoveBlock { block_id } => {
                let block = find(doc, block_id)?;
                if block.can_remove() {
                    Ok(())
                } else {
                    Err(MutationError::BlockLocked(block_id.clone()))
                }
            }

            Mutation::MoveBlock { from, to } => {
                let len = doc.blocks.len();
                for &index in [from, to] {
                    if index >= len {
                        return Err(MutationError::IndexOutOfRange { index, len });
                    }
                }
                if move_allowed(&doc.blocks, *from, *to, policy) {
                    Ok(())
                } else {
                    Err(MutationError::MoveRefused { from: *from, to: *to })
                }
            }

            Mutation::UpdateProps { block_id, .. } => find(doc, block_id).map(|_| ()),

            Mutation::InsertPersonalization { block_id, .. } => {
                let block = find(doc, block_id)?;
                if block.block_type().is_text_capable() {
                    Ok(())
                } else {
                    Err(MutationError::NotTextCapable(block_id.clone()))
                }
            }
        }
    }

    /// Validate, then apply to `doc`. On error `doc` is unchanged.
    pub fn apply(&self, doc: &mut Document, policy: ReorderPolicy) -> Result<MutationOutcome, MutationError> {
        self.validate(doc, policy)?;

        let outcome = match self {
            Mutation::AddBlock { block_id, block_type } => {
                doc.blocks.push(Block::new(block_id.clone(), *block_type));
                MutationOutcome::BlockAdded(block_id.clone())
            }

            Mutation::RemoveBlock { block_id } => {
                doc.blocks.retain(|b| b.id() != block_id.as_str());
                MutationOutcome::BlockRemoved(block_id.clone())
            }

            Mutation::MoveBlock { from, to } => {
                if move_block(&mut doc.blocks, *from, *to, policy) {
                    MutationOutcome::Changed
                } else {
                    MutationOutcome::Unchanged
                }
            }

            Mutation::UpdateProps { block_id, props } => {
                find_mut(doc, block_id)?.set_props(props.clone());
                MutationOutcome::Changed
            }

            Mutation::InsertPersonalization { block_id, variable } => {
                append_token(find_mut(doc, block_id)?, variable.token());
                MutationOutcome::Changed
            }

            Mutation::AddAttachment { attachment } => {
                doc.attachments.push(attachment.clone());
                MutationOutcome::Changed
            }

            Mutation::SetGlobalStyles { styles } => {
                doc.global_styles = styles.clone();
                MutationOutcome::Changed
            }

            Mutation::Rename { name } => {
                doc.name = name.clone();
                MutationOutcome::Changed
            }
        };

        Ok(outcome)
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::AddBlock { .. } => "add_block",
            Mutation::RemoveBlock { .. } => "remove_block",
            Mutation::MoveBlock { .. } => "move_block",
            Mutation::UpdateProps { .. } => "update_props",
            Mutation::InsertPersonalization { .. } => "insert_personalization",
            Mutation::AddAttachment { .. } => "add_attachment",
            Mutation::SetGlobalStyles { .. } => "set_global_styles",
            Mutation::Rename { .. } => "rename",
        }
    }
}

fn find<'a>(doc: &'a Document, block_id: &str) -> Result<&'a Block, MutationError> {
    doc.find_block(block_id)
        .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))
}

fn find_mut<'a>(doc: &'a mut Document, block_id: &str) -> Result<&'a mut Block, MutationError> {
    doc.find_block_mut(block_id)
        .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))
}

/// Result of a mutation applied through an edit session
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Document version after the mutation
    pub version: u64,

    pub outcome: MutationOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature_id(doc: &Document) -> BlockId {
        doc.blocks_of(BlockType::Signature).next().unwrap().id().to_string()
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::UpdateProps {
            block_id: "b-1".to_string(),
            props: Props::new().with("text", "Hello"),
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let back: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, back);
    }

    #[test]
    fn test_add_block_appends() {
        let mut doc = Document::starter();
        let outcome = Mutation::AddBlock {
            block_id: "spacer-1".to_string(),
            block_type: BlockType::Spacer,
        }
        .apply(&mut doc, ReorderPolicy::Free)
        .unwrap();

        assert_eq!(outcome, MutationOutcome::BlockAdded("spacer-1".to_string()));
        assert_eq!(doc.blocks.len(), 5);
        assert_eq!(doc.blocks[4].id(), "spacer-1");
        assert_eq!(doc.blocks[4].props().int("height"), Some(20));
    }

    #[test]
    fn test_add_block_rejects_duplicate_id() {
        let mut doc = Document::starter();
        let taken = doc.blocks[0].id().to_string();

        let result = Mutation::AddBlock {
            block_id: taken.clone(),
            block_type: BlockType::Text,
        }
        .apply(&mut doc, ReorderPolicy::Free);

        assert_eq!(result, Err(MutationError::DuplicateId(taken)));
        assert_eq!(doc.blocks.len(), 4);
    }

    #[test]
    fn test_remove_locked_block_fails() {
        let mut doc = Document::starter();
        let id = signature_id(&doc);

        let result = Mutation::RemoveBlock { block_id: id.clone() }.apply(&mut doc, ReorderPolicy::Free);

        assert_eq!(result, Err(MutationError::BlockLocked(id)));
        assert_eq!(doc.blocks.len(), 4);
    }

    #[test]
    fn test_remove_unknown_block_fails() {
        let mut doc = Document::starter();
        let result = Mutation::RemoveBlock {
            block_id: "missing".to_string(),
        }
        .apply(&mut doc, ReorderPolicy::Free);

        assert_eq!(result, Err(MutationError::BlockNotFound("missing".to_string())));
    }

    #[test]
    fn test_move_out_of_range() {
        let mut doc = Document::starter();
        let before = doc.clone();

        let result = Mutation::MoveBlock { from: 0, to: 9 }.apply(&mut doc, ReorderPolicy::Free);

        assert_eq!(result, Err(MutationError::IndexOutOfRange { index: 9, len: 4 }));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_move_same_index_is_unchanged() {
        let mut doc = Document::starter();
        let outcome = Mutation::MoveBlock { from: 1, to: 1 }
            .apply(&mut doc, ReorderPolicy::Free)
            .unwrap();

        assert_eq!(outcome, MutationOutcome::Unchanged);
    }

    #[test]
    fn test_move_signature_depends_on_policy() {
        let mut doc = Document::starter();
        let id = signature_id(&doc);
        let mutation = Mutation::MoveBlock { from: 3, to: 0 };

        assert_eq!(
            mutation.apply(&mut doc, ReorderPolicy::PinLocked),
            Err(MutationError::MoveRefused { from: 3, to: 0 })
        );
        assert_eq!(doc.position(&id), Some(3));

        mutation.apply(&mut doc, ReorderPolicy::Free).unwrap();
        assert_eq!(doc.position(&id), Some(0));
    }

    #[test]
    fn test_update_props_replaces() {
        let mut doc = Document::starter();
        let id = doc.blocks[1].id().to_string();

        Mutation::UpdateProps {
            block_id: id.clone(),
            props: Props::new().with("text", "Only label"),
        }
        .apply(&mut doc, ReorderPolicy::Free)
        .unwrap();

        let props = doc.find_block(&id).unwrap().props();
        assert_eq!(props.len(), 1);
        assert_eq!(props.str("text"), Some("Only label"));
    }

    #[test]
    fn test_insert_personalization_requires_text_block() {
        let mut doc = Document::starter();
        let button_id = doc.blocks[1].id().to_string();

        let result = Mutation::InsertPersonalization {
            block_id: button_id.clone(),
            variable: MergeVariable::Email,
        }
        .apply(&mut doc, ReorderPolicy::Free);

        assert_eq!(result, Err(MutationError::NotTextCapable(button_id)));
    }

    #[test]
    fn test_insert_personalization_appends() {
        let mut doc = Document::starter();
        let text_id = doc.blocks[0].id().to_string();
        let before = doc.blocks[0].text().to_string();

        Mutation::InsertPersonalization {
            block_id: text_id.clone(),
            variable: MergeVariable::Email,
        }
        .apply(&mut doc, ReorderPolicy::Free)
        .unwrap();

        assert_eq!(doc.find_block(&text_id).unwrap().text(), format!("{} {{{{email}}}}", before));
    }

    #[test]
    fn test_insert_personalization_only_accepts_catalog() {
        let json = r#"{"InsertPersonalization":{"block_id":"b-1","variable":"phone"}}"#;
        assert!(serde_json::from_str::<Mutation>(json).is_err());

        let json = r#"{"InsertPersonalization":{"block_id":"b-1","variable":"first_name_or_there"}}"#;
        let mutation: Mutation = serde_json::from_str(json).unwrap();
        assert_eq!(
            mutation,
            Mutation::InsertPersonalization {
                block_id: "b-1".to_string(),
                variable: MergeVariable::FirstNameOrThere,
            }
        );
    }

    #[test]
    fn test_add_attachment_appends() {
        let mut doc = Document::starter();
        let attachment = Attachment {
            filename: "terms.pdf".to_string(),
            url: "/uploads/attachments/att-1.pdf".to_string(),
            size_bytes: 10,
        };

        let outcome = Mutation::AddAttachment {
            attachment: attachment.clone(),
        }
        .apply(&mut doc, ReorderPolicy::Free)
        .unwrap();

        assert_eq!(outcome, MutationOutcome::Changed);
        assert_eq!(doc.attachments, vec![attachment]);
    }

    #[test]
    fn test_rename_and_global_styles() {
        let mut doc = Document::starter();
        let styles = GlobalStyles {
            background: "#ffffff".to_string(),
            font: "Georgia".to_string(),
            padding: 0,
        };

        Mutation::Rename {
            name: "Launch".to_string(),
        }
        .apply(&mut doc, ReorderPolicy::Free)
        .unwrap();
        Mutation::SetGlobalStyles { styles: styles.clone() }
            .apply(&mut doc, ReorderPolicy::Free)
            .unwrap();

        assert_eq!(doc.name, "Launch");
        assert_eq!(doc.global_styles, styles);
    }
}
