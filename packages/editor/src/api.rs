//! # Collaborator API
//!
//! The narrow contract between the editor and the template service:
//! save, image upload, attachment upload and test sends. Transport and
//! authentication belong to the implementation.

use async_trait::async_trait;
use outreach_model::{Attachment, Document};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server-assigned template identifier
pub type TemplateId = u64;

/// File picked by the user for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            data,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Body of a save request: the document plus the id of an earlier save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TemplateId>,

    #[serde(flatten)]
    pub document: Document,
}

/// Response to a successful save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub id: TemplateId,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Response to an image upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Response to a test send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub status: String,
    pub to: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Template not found: {0}")]
    NotFound(TemplateId),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status: 400,
            message: message.into(),
        }
    }
}

/// Template service used by an edit session
#[async_trait]
pub trait TemplateApi: Send + Sync {
    /// Persist the template; returns the server-assigned reference
    async fn save(&self, payload: &SavePayload) -> Result<TemplateRef, ApiError>;

    /// Host an image and return its URL
    async fn upload_image(&self, file: &UploadFile) -> Result<UploadedImage, ApiError>;

    /// Host an attachment and return its metadata
    async fn upload_attachment(&self, file: &UploadFile) -> Result<Attachment, ApiError>;

    /// Deliver a saved template once to `to`
    async fn send_test(&self, id: TemplateId, to: &str) -> Result<SendReceipt, ApiError>;
}
