use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use outreach_model::Document;
use std::collections::HashSet;

/// Lint rule that flags block ids used more than once. Hand-edited
/// template files can carry them; selection and moves by id then hit the
/// first match only.
pub struct UniqueBlockIdsRule;

impl LintRule for UniqueBlockIdsRule {
    fn name(&self) -> &'static str {
        "unique-block-ids"
    }

    fn description(&self) -> &'static str {
        "Block ids must be unique"
    }

    fn check_document(&self, document: &Document) -> Vec<Diagnostic> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();

        document
            .blocks
            .iter()
            .filter(|b| !seen.insert(b.id()) && reported.insert(b.id()))
            .map(|b| {
                Diagnostic::error(self.name(), format!("Duplicate block id: {}", b.id()))
                    .at_block(b.id())
                    .with_suggestion("Give each block its own id")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticLevel;
    use outreach_model::{Block, BlockType};

    #[test]
    fn test_duplicate_reported_once() {
        let mut document = Document::new("Dupes");
        document.blocks.push(Block::new("a", BlockType::Text));
        document.blocks.push(Block::new("a", BlockType::Divider));
        document.blocks.push(Block::new("a", BlockType::Spacer));
        document.blocks.push(Block::new("b", BlockType::Spacer));

        let diagnostics = UniqueBlockIdsRule.check_document(&document);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].level, DiagnosticLevel::Error);
        assert_eq!(diagnostics[0].block_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_starter_is_clean() {
        assert!(UniqueBlockIdsRule.check_document(&Document::starter()).is_empty());
    }
}
