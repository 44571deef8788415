//! # Edit Session
//!
//! One open template: the document, the selected block, the active
//! preview and the save/upload state. Every change goes through
//! [`EditSession::apply`], which bumps the version and recomputes the
//! preview and the advisory diagnostics.
//!
//! The surface methods (`add_block`, `remove_block`, ...) follow the
//! editor's forgiving behavior: actions that make no sense for the current
//! state are silent no-ops reported as `false`.

use crate::api::{ApiError, SavePayload, SendReceipt, TemplateApi, TemplateId, TemplateRef, UploadFile, UploadedImage};
use crate::attachments::{AttachmentManager, UploadKind};
use crate::drag::DragGesture;
use crate::errors::EditorError;
use crate::mutations::{Mutation, MutationResult};
use outreach_compiler_html::{Preview, PreviewMode, Renderer};
use outreach_linter::{lint_with, warning_messages, Diagnostic, RuleRegistry};
use outreach_model::{
    Attachment, Block, BlockId, BlockType, Document, GlobalStyles, MergeVariable, Props, ReorderPolicy,
};
use tracing::{debug, info, warn};

/// Behavior knobs for a session
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub reorder_policy: ReorderPolicy,
    pub renderer: Renderer,
}

pub struct EditSession {
    document: Document,
    selected: Option<BlockId>,
    preview_mode: PreviewMode,

    /// Increments on every mutation that changed the document
    version: u64,

    saving: bool,
    template_id: Option<TemplateId>,
    last_save_ok: bool,

    uploads: AttachmentManager,
    /// Image block that receives the `src` of the image upload in flight
    image_target: Option<BlockId>,
    drag: Option<DragGesture>,

    options: SessionOptions,
    rules: RuleRegistry,

    diagnostics: Vec<Diagnostic>,
    preview: Preview,
}

impl EditSession {
    pub fn new(document: Document) -> Self {
        Self::with_options(document, SessionOptions::default())
    }

    pub fn with_options(document: Document, options: SessionOptions) -> Self {
        let selected = document.blocks.first().map(|b| b.id().to_string());
        let mut session = Self {
            document,
            selected,
            preview_mode: PreviewMode::default(),
            version: 0,
            saving: false,
            template_id: None,
            last_save_ok: false,
            uploads: AttachmentManager::new(),
            image_target: None,
            drag: None,
            options,
            rules: RuleRegistry::new(),
            diagnostics: Vec::new(),
            preview: Preview::Html(String::new()),
        };
        session.refresh();
        session
    }

    /// Replace the lint rules used for diagnostics
    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self.refresh();
        self
    }

    /// Replace the upload limits
    pub fn with_uploads(mut self, uploads: AttachmentManager) -> Self {
        self.uploads = uploads;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selected.as_deref().and_then(|id| self.document.find_block(id))
    }

    pub fn preview_mode(&self) -> PreviewMode {
        self.preview_mode
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_uploading(&self) -> bool {
        self.uploads.is_uploading()
    }

    /// Id of the last successful save
    pub fn template_id(&self) -> Option<TemplateId> {
        self.template_id
    }

    pub fn dragging(&self) -> Option<&DragGesture> {
        self.drag.as_ref()
    }

    /// Apply a mutation, then recompute preview and diagnostics.
    /// On error the document is unchanged.
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let outcome = match mutation.apply(&mut self.document, self.options.reorder_policy) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(mutation = mutation.kind(), error = %e, "Mutation rejected");
                return Err(e.into());
            }
        };

        if outcome.is_change() {
            self.version += 1;
            self.refresh();
        }
        debug!(mutation = mutation.kind(), version = self.version, "Applied mutation");

        Ok(MutationResult {
            version: self.version,
            outcome,
        })
    }

    fn refresh(&mut self) {
        self.diagnostics = lint_with(&self.document, &self.rules);
        self.preview = self.options.renderer.render(&self.document, self.preview_mode);
    }

    /// Apply, reporting only whether the document changed
    fn apply_quietly(&mut self, mutation: Mutation) -> bool {
        self.apply(mutation)
            .map(|result| result.outcome.is_change())
            .unwrap_or(false)
    }

    // Editing surface

    /// Append a block of `block_type` and select it
    pub fn add_block(&mut self, block_type: BlockType) -> Result<BlockId, EditorError> {
        let block_id = self.document.create_block(block_type).id().to_string();
        self.apply(Mutation::AddBlock {
            block_id: block_id.clone(),
            block_type,
        })?;
        self.selected = Some(block_id.clone());
        Ok(block_id)
    }

    /// Remove an unlocked block. Locked or unknown blocks are left alone.
    pub fn remove_block(&mut self, block_id: &str) -> bool {
        let removed = self.apply_quietly(Mutation::RemoveBlock {
            block_id: block_id.to_string(),
        });
        if removed {
            self.selected = None;
        }
        removed
    }

    /// Move the block at `from` to `to`. Out-of-range indices are a no-op.
    pub fn move_block(&mut self, from: usize, to: usize) -> bool {
        self.apply_quietly(Mutation::MoveBlock { from, to })
    }

    /// Replace the selected block's props. No-op without a selection.
    pub fn update_selected_props(&mut self, props: Props) -> bool {
        match self.selected.clone() {
            Some(block_id) => self.apply_quietly(Mutation::UpdateProps { block_id, props }),
            None => false,
        }
    }

    /// Append a merge token to the selected block if it holds text
    pub fn insert_personalization(&mut self, variable: MergeVariable) -> bool {
        match self.selected.clone() {
            Some(block_id) => self.apply_quietly(Mutation::InsertPersonalization { block_id, variable }),
            None => false,
        }
    }

    /// Like `insert_personalization`, from a catalog token or key such as
    /// `{{email}}` or `email`. Anything outside the catalog is ignored.
    pub fn insert_personalization_token(&mut self, token: &str) -> bool {
        match token.parse::<MergeVariable>() {
            Ok(variable) => self.insert_personalization(variable),
            Err(e) => {
                debug!(error = %e, "Personalization token rejected");
                false
            }
        }
    }

    /// Select a block by id. Unknown ids leave the selection unchanged.
    pub fn select(&mut self, block_id: &str) -> bool {
        if self.document.find_block(block_id).is_none() {
            return false;
        }
        self.selected = Some(block_id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.apply_quietly(Mutation::Rename { name: name.into() });
    }

    pub fn set_global_styles(&mut self, styles: GlobalStyles) {
        self.apply_quietly(Mutation::SetGlobalStyles { styles });
    }

    pub fn set_preview_mode(&mut self, mode: PreviewMode) {
        if self.preview_mode != mode {
            self.preview_mode = mode;
            self.preview = self.options.renderer.render(&self.document, mode);
        }
    }

    /// The active preview
    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    /// Render any mode without switching the active one
    pub fn render(&self, mode: PreviewMode) -> Preview {
        self.options.renderer.render(&self.document, mode)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Advisory warning messages; empty means all checks passed
    pub fn warnings(&self) -> Vec<String> {
        warning_messages(&self.diagnostics)
    }

    // Save and send

    /// Enter the saving state and snapshot the payload.
    ///
    /// Fails with `SaveInProgress` while a save is running.
    pub fn begin_save(&mut self) -> Result<SavePayload, EditorError> {
        if self.saving {
            return Err(EditorError::SaveInProgress);
        }
        self.saving = true;
        Ok(SavePayload {
            id: self.template_id,
            document: self.document.clone(),
        })
    }

    /// Leave the saving state with the collaborator's answer
    pub fn finish_save(&mut self, result: Result<TemplateRef, ApiError>) -> Result<TemplateRef, EditorError> {
        self.saving = false;
        match result {
            Ok(reference) => {
                info!(template_id = reference.id, name = %self.document.name, "Template saved");
                self.template_id = Some(reference.id);
                self.last_save_ok = true;
                Ok(reference)
            }
            Err(e) => {
                warn!(error = %e, "Template save failed");
                self.last_save_ok = false;
                Err(e.into())
            }
        }
    }

    /// Save through `api`. Later saves carry the returned id.
    pub async fn save(&mut self, api: &dyn TemplateApi) -> Result<TemplateRef, EditorError> {
        let payload = self.begin_save()?;
        let result = api.save(&payload).await;
        self.finish_save(result)
    }

    /// Send the saved template once to `address`.
    ///
    /// Requires a successful save and a plausible address; both are checked
    /// before any network call.
    pub async fn send_test(&mut self, api: &dyn TemplateApi, address: &str) -> Result<SendReceipt, EditorError> {
        let id = match self.template_id {
            Some(id) if self.last_save_ok => id,
            _ => return Err(EditorError::NotSaved),
        };

        let address = address.trim();
        if !is_valid_address(address) {
            return Err(EditorError::InvalidAddress(address.to_string()));
        }

        match api.send_test(id, address).await {
            Ok(receipt) => {
                info!(template_id = id, to = %receipt.to, "Test email sent");
                Ok(receipt)
            }
            Err(e) => {
                warn!(template_id = id, error = %e, "Test send failed");
                Err(e.into())
            }
        }
    }

    // Uploads

    /// Check an attachment and mark it in flight
    pub fn begin_attachment_upload(&mut self, file: &UploadFile) -> Result<(), EditorError> {
        self.uploads.begin(UploadKind::Attachment, file)
    }

    /// Leave the uploading state; a stored file is appended to the
    /// document once
    pub fn finish_attachment_upload(&mut self, result: Result<Attachment, ApiError>) -> Result<Attachment, EditorError> {
        let attachment = self.uploads.finish_attachment(result)?;
        self.apply(Mutation::AddAttachment {
            attachment: attachment.clone(),
        })?;
        Ok(attachment)
    }

    /// Upload an attachment and append it to the document once
    pub async fn upload_attachment(
        &mut self,
        api: &dyn TemplateApi,
        file: &UploadFile,
    ) -> Result<Attachment, EditorError> {
        self.begin_attachment_upload(file)?;
        let result = api.upload_attachment(file).await;
        self.finish_attachment_upload(result)
    }

    /// Check an image against the selected image block and mark it in
    /// flight. Returns the block that will receive the image.
    pub fn begin_image_upload(&mut self, file: &UploadFile) -> Result<BlockId, EditorError> {
        let block_id = match self.selected_block() {
            Some(block) if block.block_type() == BlockType::Image => block.id().to_string(),
            _ => return Err(EditorError::NoImageSelected),
        };

        self.uploads.begin(UploadKind::Image, file)?;
        self.image_target = Some(block_id.clone());
        Ok(block_id)
    }

    /// Leave the uploading state and set the stored image as the target
    /// block's `src`, keeping its other props
    pub fn finish_image_upload(&mut self, result: Result<UploadedImage, ApiError>) -> Result<String, EditorError> {
        let target = self.image_target.take();
        let image = self.uploads.finish_image(result)?;
        let block_id = target.ok_or(EditorError::NoImageSelected)?;

        let props = self
            .document
            .find_block(&block_id)
            .map(|b| b.props().clone())
            .unwrap_or_default()
            .with("src", image.url.clone());
        self.apply(Mutation::UpdateProps { block_id, props })?;

        Ok(image.url)
    }

    /// Upload an image and make it the selected image block's `src`
    pub async fn upload_image(&mut self, api: &dyn TemplateApi, file: &UploadFile) -> Result<String, EditorError> {
        self.begin_image_upload(file)?;
        let result = api.upload_image(file).await;
        self.finish_image_upload(result)
    }

    /// Abandon the upload in flight, e.g. after dropping its future
    pub fn cancel_upload(&mut self) -> bool {
        self.image_target = None;
        self.uploads.cancel().is_some()
    }

    // Drag gestures

    /// Pick up a block. Replaces any unfinished gesture.
    pub fn begin_drag(&mut self, block_id: &str) -> bool {
        if self.document.find_block(block_id).is_none() {
            return false;
        }
        self.drag = Some(DragGesture::new(block_id));
        true
    }

    /// Hover over a block. Does not change the document.
    pub fn drag_over(&mut self, block_id: &str) {
        if let Some(drag) = self.drag.as_mut() {
            drag.over = Some(block_id.to_string());
        }
    }

    /// Drop: moves the dragged block to the hovered block's index
    pub fn end_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        let Some(target) = drag.target() else {
            return false;
        };

        match (self.document.position(&drag.active), self.document.position(target)) {
            (Some(from), Some(to)) => self.move_block(from, to),
            _ => false,
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(Document::starter())
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("name", &self.document.name)
            .field("blocks", &self.document.blocks.len())
            .field("version", &self.version)
            .field("selected", &self.selected)
            .field("saving", &self.saving)
            .field("template_id", &self.template_id)
            .finish()
    }
}

/// Minimal recipient check: one `@` with text on both sides, no whitespace
pub fn is_valid_address(address: &str) -> bool {
    if address.is_empty() || address.chars().any(char::is_whitespace) {
        return false;
    }
    match address.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
