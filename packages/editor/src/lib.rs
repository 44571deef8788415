//! # Outreach Editor
//!
//! Editing engine for block-based email templates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: blocks, document, tokens, reorder    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession + mutations             │
//! │  - Apply mutations with validation          │
//! │  - Selection, preview mode, drag gestures   │
//! │  - Save / upload / send-test state          │
//! └─────────────────────────────────────────────┘
//!          ↓                         ↓
//! ┌───────────────────────┐ ┌───────────────────┐
//! │ compiler-html: views  │ │ linter: warnings  │
//! └───────────────────────┘ └───────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Document is source of truth**: previews and warnings are derived
//! 2. **Single writer**: mutations are synchronous; only collaborator calls suspend
//! 3. **Advisory validation**: warnings never block save or send-test
//! 4. **Failures are local**: a failed call leaves the document as it was
//!
//! ## Usage
//!
//! ```rust,ignore
//! use outreach_editor::{EditSession, MemoryApi};
//! use outreach_model::{BlockType, Props};
//!
//! let api = MemoryApi::new();
//! let mut session = EditSession::default();
//!
//! session.add_block(BlockType::Button)?;
//! session.update_selected_props(
//!     Props::new().with("text", "Buy now").with("url", "https://x.com"),
//! );
//!
//! let saved = session.save(&api).await?;
//! session.send_test(&api, "me@example.com").await?;
//! ```

mod api;
mod attachments;
mod drag;
mod errors;
mod memory_api;
mod mutations;
mod session;

pub use api::{
    ApiError, SavePayload, SendReceipt, TemplateApi, TemplateId, TemplateRef, UploadFile, UploadedImage,
};
pub use attachments::{AttachmentManager, PendingUpload, UploadKind, MAX_ATTACHMENT_BYTES, MAX_IMAGE_BYTES};
pub use drag::DragGesture;
pub use errors::EditorError;
pub use memory_api::{Delivery, MemoryApi, StoredTemplate};
pub use mutations::{Mutation, MutationError, MutationOutcome, MutationResult};
pub use session::{is_valid_address, EditSession, SessionOptions};

pub use outreach_compiler_html::{Preview, PreviewMode};
pub use outreach_model::{Document, MergeVariable};
