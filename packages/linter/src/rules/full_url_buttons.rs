use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use outreach_model::{BlockType, Document};

pub const FULL_URL_MESSAGE: &str = "Buttons should use full URLs (https://).";

/// Lint rule that flags buttons whose link is not an absolute http(s) URL
pub struct FullUrlButtonsRule;

impl LintRule for FullUrlButtonsRule {
    fn name(&self) -> &'static str {
        "full-url-buttons"
    }

    fn description(&self) -> &'static str {
        "Require button URLs to start with http"
    }

    fn check_document(&self, document: &Document) -> Vec<Diagnostic> {
        // One finding for the whole document, pointing at the first offender
        document
            .blocks_of(BlockType::Button)
            .find(|block| !block.props().str_or("url", "").starts_with("http"))
            .map(|block| {
                vec![Diagnostic::warning(self.name(), FULL_URL_MESSAGE)
                    .at_block(block.id())
                    .with_suggestion(format!(
                        "Replace '{}' with an absolute URL",
                        block.props().str_or("url", "")
                    ))]
            })
            .unwrap_or_default()
    }
}
