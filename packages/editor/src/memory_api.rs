//! In-process template service.
//!
//! Applies the same acceptance policy as the hosted service: a template
//! needs a name, at least one block and an unsubscribe link in a text or
//! signature block. Uploads are size-checked again on this side.

use crate::api::{ApiError, SavePayload, SendReceipt, TemplateApi, TemplateId, TemplateRef, UploadFile, UploadedImage};
use crate::attachments::{MAX_ATTACHMENT_BYTES, MAX_IMAGE_BYTES};
use async_trait::async_trait;
use outreach_compiler_html::{compile_to_html, compile_to_text, CompileOptions, TextOptions};
use outreach_model::{Attachment, BlockType, Document};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// A saved template with its rendered bodies
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTemplate {
    pub id: TemplateId,
    pub document: Document,
    pub html: String,
    pub text: String,
}

/// A recorded test send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub template_id: TemplateId,
    pub to: String,
    pub subject: String,
    pub status: String,
}

#[derive(Debug, Default)]
struct Store {
    templates: BTreeMap<TemplateId, StoredTemplate>,
    deliveries: Vec<Delivery>,
    next_template_id: TemplateId,
    next_upload_id: u64,
    fail_next: Option<ApiError>,
}

#[derive(Debug, Default)]
pub struct MemoryApi {
    store: Mutex<Store>,
    requests: AtomicUsize,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls received, including rejected ones
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Make the next call fail with `error`
    pub async fn fail_next(&self, error: ApiError) {
        self.store.lock().await.fail_next = Some(error);
    }

    pub async fn template(&self, id: TemplateId) -> Option<StoredTemplate> {
        self.store.lock().await.templates.get(&id).cloned()
    }

    pub async fn template_count(&self) -> usize {
        self.store.lock().await.templates.len()
    }

    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.store.lock().await.deliveries.clone()
    }

    /// Count the request and take any injected failure
    async fn begin(&self) -> Result<tokio::sync::MutexGuard<'_, Store>, ApiError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let mut store = self.store.lock().await;
        match store.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(store),
        }
    }
}

fn has_unsubscribe(document: &Document) -> bool {
    document
        .blocks
        .iter()
        .filter(|b| matches!(b.block_type(), BlockType::Text | BlockType::Signature))
        .filter_map(|b| serde_json::to_string(b.props()).ok())
        .any(|json| json.contains("unsubscribe_url"))
}

fn check_template(document: &Document) -> Result<(), ApiError> {
    if document.name.is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if document.blocks.is_empty() {
        return Err(ApiError::bad_request("At least one block is required"));
    }
    if !has_unsubscribe(document) {
        return Err(ApiError::bad_request(
            "Unsubscribe footer with {{unsubscribe_url}} is required",
        ));
    }
    Ok(())
}

fn extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

#[async_trait]
impl TemplateApi for MemoryApi {
    async fn save(&self, payload: &SavePayload) -> Result<TemplateRef, ApiError> {
        let mut store = self.begin().await?;
        let document = &payload.document;
        check_template(document)?;

        let id = match payload.id {
            Some(id) if store.templates.contains_key(&id) => id,
            Some(id) => return Err(ApiError::NotFound(id)),
            None => {
                store.next_template_id += 1;
                store.next_template_id
            }
        };

        let html = compile_to_html(document, CompileOptions::default());
        let text = compile_to_text(
            document,
            &TextOptions {
                include_button_links: true,
            },
        );

        store.templates.insert(
            id,
            StoredTemplate {
                id,
                document: document.clone(),
                html: html.clone(),
                text: text.clone(),
            },
        );

        Ok(TemplateRef {
            id,
            html: Some(html),
            text: Some(text),
        })
    }

    async fn upload_image(&self, file: &UploadFile) -> Result<UploadedImage, ApiError> {
        let mut store = self.begin().await?;
        if file.size() > MAX_IMAGE_BYTES {
            return Err(ApiError::bad_request("Image too large (5MB max)"));
        }

        store.next_upload_id += 1;
        Ok(UploadedImage {
            url: format!("/uploads/images/img-{}{}", store.next_upload_id, extension(&file.filename)),
            filename: Some(file.filename.clone()),
            size: Some(file.size()),
        })
    }

    async fn upload_attachment(&self, file: &UploadFile) -> Result<Attachment, ApiError> {
        let mut store = self.begin().await?;
        if file.size() > MAX_ATTACHMENT_BYTES {
            return Err(ApiError::bad_request("Attachment exceeds 25MB"));
        }

        store.next_upload_id += 1;
        Ok(Attachment {
            filename: file.filename.clone(),
            url: format!(
                "/uploads/attachments/att-{}{}",
                store.next_upload_id,
                extension(&file.filename)
            ),
            size_bytes: file.size(),
        })
    }

    async fn send_test(&self, id: TemplateId, to: &str) -> Result<SendReceipt, ApiError> {
        let mut store = self.begin().await?;
        let subject = match store.templates.get(&id) {
            Some(template) => format!("Test: {}", template.document.name),
            None => return Err(ApiError::NotFound(id)),
        };

        store.deliveries.push(Delivery {
            template_id: id,
            to: to.to_string(),
            subject,
            status: "sent".to_string(),
        });

        Ok(SendReceipt {
            status: "sent".to_string(),
            to: to.to_string(),
        })
    }
}
