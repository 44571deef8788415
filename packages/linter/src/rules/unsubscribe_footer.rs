use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use outreach_model::{BlockType, Document, MergeVariable};

pub const UNSUBSCRIBE_MESSAGE: &str = "Unsubscribe footer with {{unsubscribe_url}} is required.";

/// Lint rule requiring a signature footer that carries the unsubscribe link
pub struct UnsubscribeFooterRule;

impl LintRule for UnsubscribeFooterRule {
    fn name(&self) -> &'static str {
        "unsubscribe-footer"
    }

    fn description(&self) -> &'static str {
        "Require a signature block containing {{unsubscribe_url}}"
    }

    fn check_document(&self, document: &Document) -> Vec<Diagnostic> {
        let token = MergeVariable::UnsubscribeUrl.token();
        let has_footer = document
            .blocks_of(BlockType::Signature)
            .any(|block| block.text().contains(token));

        if has_footer {
            return Vec::new();
        }

        let mut diagnostic = Diagnostic::warning(self.name(), UNSUBSCRIBE_MESSAGE)
            .with_suggestion("Insert {{unsubscribe_url}} into the signature block");
        if let Some(signature) = document.blocks_of(BlockType::Signature).next() {
            diagnostic = diagnostic.at_block(signature.id());
        }
        vec![diagnostic]
    }
}
