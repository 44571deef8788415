//! Error types for the editor

use crate::api::ApiError;
use crate::attachments::UploadKind;
use crate::mutations::MutationError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("A save is already in progress")]
    SaveInProgress,

    #[error("An upload is already in progress")]
    UploadInProgress,

    #[error("Save the template before sending a test")]
    NotSaved,

    #[error("Invalid recipient address: {0:?}")]
    InvalidAddress(String),

    #[error("{kind} '{filename}' exceeds the {} MB limit", .limit / (1024 * 1024))]
    UploadTooLarge {
        kind: UploadKind,
        filename: String,
        size: u64,
        limit: u64,
    },

    #[error("Select an image block before uploading an image")]
    NoImageSelected,
}
