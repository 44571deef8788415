//! # Outreach Model
//!
//! Data model of the template editor: typed blocks, the document that
//! orders them, merge-variable handling and reordering.
//!
//! Everything here is synchronous and side-effect free. Editing state
//! (selection, saving, previews) lives in `outreach-editor`.

pub mod block;
pub mod document;
pub mod error;
pub mod id_generator;
pub mod personalization;
pub mod reorder;

pub use block::{create_block, Align, Block, BlockId, BlockType, ButtonStyle, Props};
pub use document::{Attachment, Document, GlobalStyles};
pub use error::ModelError;
pub use id_generator::IDGenerator;
pub use personalization::{append_token, extract_variables, parse_tokens, personalize, MergeToken, MergeVariable};
pub use reorder::{move_block, move_item, ReorderPolicy};
