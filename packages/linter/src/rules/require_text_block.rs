use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use outreach_model::{BlockType, Document};

pub const TEXT_BLOCK_MESSAGE: &str = "Include at least one text block to avoid image-only emails.";

/// Lint rule that flags documents without any text block
pub struct RequireTextBlockRule;

impl LintRule for RequireTextBlockRule {
    fn name(&self) -> &'static str {
        "require-text-block"
    }

    fn description(&self) -> &'static str {
        "Require at least one text block"
    }

    fn check_document(&self, document: &Document) -> Vec<Diagnostic> {
        if document.has_block_of(BlockType::Text) {
            Vec::new()
        } else {
            vec![Diagnostic::warning(self.name(), TEXT_BLOCK_MESSAGE)
                .with_suggestion("Image-only emails are often filtered as spam; add a text block")]
        }
    }
}
