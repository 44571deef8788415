//! # Upload Limits
//!
//! Size checks happen before any network call. An upload is split into
//! `begin` and `finish` around the collaborator call, like a save: while
//! one is in flight a second `begin` fails with `UploadInProgress`.

use crate::api::{ApiError, UploadFile, UploadedImage};
use crate::errors::EditorError;
use outreach_model::Attachment;
use std::fmt;
use tracing::{debug, info, warn};

/// Largest attachment accepted (25 MiB)
pub const MAX_ATTACHMENT_BYTES: u64 = 25 * 1024 * 1024;

/// Largest image accepted by the upload service (5 MiB)
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Attachment,
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadKind::Image => write!(f, "Image"),
            UploadKind::Attachment => write!(f, "Attachment"),
        }
    }
}

/// The upload currently waiting on the collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub kind: UploadKind,
    pub filename: String,
}

/// Enforces upload limits and tracks the upload in flight
#[derive(Debug, Clone)]
pub struct AttachmentManager {
    max_attachment_bytes: u64,
    max_image_bytes: u64,
    pending: Option<PendingUpload>,
}

impl AttachmentManager {
    pub fn new() -> Self {
        Self::with_limits(MAX_ATTACHMENT_BYTES, MAX_IMAGE_BYTES)
    }

    pub fn with_limits(max_attachment_bytes: u64, max_image_bytes: u64) -> Self {
        Self {
            max_attachment_bytes,
            max_image_bytes,
            pending: None,
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingUpload> {
        self.pending.as_ref()
    }

    pub fn limit(&self, kind: UploadKind) -> u64 {
        match kind {
            UploadKind::Image => self.max_image_bytes,
            UploadKind::Attachment => self.max_attachment_bytes,
        }
    }

    /// Reject `file` if it is over the limit for `kind` or another upload
    /// is running
    pub fn check(&self, kind: UploadKind, file: &UploadFile) -> Result<(), EditorError> {
        if self.pending.is_some() {
            return Err(EditorError::UploadInProgress);
        }

        let limit = self.limit(kind);
        if file.size() > limit {
            warn!(
                kind = %kind,
                filename = %file.filename,
                size = file.size(),
                limit,
                "Rejected upload over size limit"
            );
            return Err(EditorError::UploadTooLarge {
                kind,
                filename: file.filename.clone(),
                size: file.size(),
                limit,
            });
        }

        Ok(())
    }

    /// Check `file` and mark it in flight
    pub fn begin(&mut self, kind: UploadKind, file: &UploadFile) -> Result<(), EditorError> {
        self.check(kind, file)?;
        debug!(kind = %kind, filename = %file.filename, size = file.size(), "Upload started");
        self.pending = Some(PendingUpload {
            kind,
            filename: file.filename.clone(),
        });
        Ok(())
    }

    /// Abandon the upload in flight without a result
    pub fn cancel(&mut self) -> Option<PendingUpload> {
        let pending = self.pending.take();
        if let Some(p) = &pending {
            debug!(kind = %p.kind, filename = %p.filename, "Upload cancelled");
        }
        pending
    }

    /// Clear the in-flight attachment with the collaborator's answer
    pub fn finish_attachment(&mut self, result: Result<Attachment, ApiError>) -> Result<Attachment, EditorError> {
        let filename = self.take_filename();
        match result {
            Ok(attachment) => {
                info!(filename = %attachment.filename, size = attachment.size_bytes, "Attachment uploaded");
                Ok(attachment)
            }
            Err(e) => {
                warn!(filename = %filename, error = %e, "Attachment upload failed");
                Err(e.into())
            }
        }
    }

    /// Clear the in-flight image with the collaborator's answer
    pub fn finish_image(&mut self, result: Result<UploadedImage, ApiError>) -> Result<UploadedImage, EditorError> {
        let filename = self.take_filename();
        match result {
            Ok(image) => {
                info!(url = %image.url, "Image uploaded");
                Ok(image)
            }
            Err(e) => {
                warn!(filename = %filename, error = %e, "Image upload failed");
                Err(e.into())
            }
        }
    }

    fn take_filename(&mut self) -> String {
        self.pending.take().map(|p| p.filename).unwrap_or_default()
    }
}

impl Default for AttachmentManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_of(size: usize) -> UploadFile {
        UploadFile::new("report.pdf", vec![0; size])
    }

    #[test]
    fn test_limits() {
        let manager = AttachmentManager::new();
        assert_eq!(manager.limit(UploadKind::Attachment), 25 * 1024 * 1024);
        assert_eq!(manager.limit(UploadKind::Image), 5 * 1024 * 1024);
    }

    #[test]
    fn test_check_boundary() {
        let manager = AttachmentManager::with_limits(10, 4);

        assert!(manager.check(UploadKind::Attachment, &file_of(10)).is_ok());
        assert!(matches!(
            manager.check(UploadKind::Attachment, &file_of(11)),
            Err(EditorError::UploadTooLarge { size: 11, limit: 10, .. })
        ));
        assert!(manager.check(UploadKind::Image, &file_of(5)).is_err());
    }

    #[test]
    fn test_begin_blocks_second_upload() {
        let mut manager = AttachmentManager::new();

        manager.begin(UploadKind::Attachment, &file_of(10)).unwrap();
        assert!(manager.is_uploading());
        assert_eq!(manager.pending().map(|p| p.kind), Some(UploadKind::Attachment));
        assert_eq!(
            manager.begin(UploadKind::Image, &file_of(10)),
            Err(EditorError::UploadInProgress)
        );

        let result = manager.finish_attachment(Err(ApiError::Transport("reset".to_string())));
        assert!(result.is_err());
        assert!(!manager.is_uploading());
        assert!(manager.begin(UploadKind::Image, &file_of(10)).is_ok());
    }

    #[test]
    fn test_oversized_begin_leaves_idle() {
        let mut manager = AttachmentManager::with_limits(10, 4);

        assert!(manager.begin(UploadKind::Attachment, &file_of(11)).is_err());
        assert!(!manager.is_uploading());
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut manager = AttachmentManager::new();
        manager.begin(UploadKind::Image, &file_of(1)).unwrap();

        let pending = manager.cancel().unwrap();
        assert_eq!(pending.filename, "report.pdf");
        assert!(!manager.is_uploading());
        assert!(manager.cancel().is_none());
    }

    #[test]
    fn test_too_large_message() {
        let manager = AttachmentManager::with_limits(2 * 1024 * 1024, MAX_IMAGE_BYTES);
        let err = manager
            .check(UploadKind::Attachment, &file_of(3 * 1024 * 1024))
            .unwrap_err();

        assert_eq!(err.to_string(), "Attachment 'report.pdf' exceeds the 2 MB limit");
    }
}
