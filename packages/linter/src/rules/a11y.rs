use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use outreach_model::{Block, BlockType, Document};

/// Accessibility hints. Reported at `Info` level so they never join the
/// advisory warning list.
pub struct A11yRule;

impl LintRule for A11yRule {
    fn name(&self) -> &'static str {
        "a11y"
    }

    fn description(&self) -> &'static str {
        "Images need alt text and buttons need a label"
    }

    fn check_document(&self, document: &Document) -> Vec<Diagnostic> {
        document.blocks.iter().filter_map(check_block).collect()
    }
}

fn check_block(block: &Block) -> Option<Diagnostic> {
    let props = block.props();

    match block.block_type() {
        // Empty src renders nothing, so there is nothing to describe yet
        BlockType::Image if !props.str_or("src", "").is_empty() && props.str_or("alt", "").trim().is_empty() => Some(
            Diagnostic::info("a11y-img-alt", "Images should have alternative text for screen readers")
                .at_block(block.id())
                .with_suggestion("Describe the image content in the 'Alt text' field"),
        ),
        BlockType::Button if props.str_or("text", "").trim().is_empty() => Some(
            Diagnostic::info("a11y-button-text", "Buttons should have a visible label")
                .at_block(block.id())
                .with_suggestion("Add a label describing where the button leads"),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticLevel;
    use outreach_model::Props;

    #[test]
    fn test_image_without_alt() {
        let mut document = Document::new("t");
        document.blocks = vec![
            Block::new("empty", BlockType::Image),
            Block::new("img", BlockType::Image).update_props(Props::new().with("src", "/a.png")),
        ];

        let diagnostics = A11yRule.check_document(&document);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, "a11y-img-alt");
        assert_eq!(diagnostics[0].level, DiagnosticLevel::Info);
        assert_eq!(diagnostics[0].block_id.as_deref(), Some("img"));
    }

    #[test]
    fn test_unlabelled_button() {
        let mut document = Document::new("t");
        document.blocks = vec![Block::new("b", BlockType::Button).update_props(Props::new().with("text", "  "))];

        let diagnostics = A11yRule.check_document(&document);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, "a11y-button-text");
    }
}
