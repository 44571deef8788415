mod a11y;
mod full_url_buttons;
mod require_text_block;
mod unique_block_ids;
mod unsubscribe_footer;

pub use a11y::A11yRule;
pub use full_url_buttons::{FullUrlButtonsRule, FULL_URL_MESSAGE};
pub use require_text_block::{RequireTextBlockRule, TEXT_BLOCK_MESSAGE};
pub use unique_block_ids::UniqueBlockIdsRule;
pub use unsubscribe_footer::{UnsubscribeFooterRule, UNSUBSCRIBE_MESSAGE};

use crate::diagnostic::Diagnostic;
use outreach_model::Document;

/// A check over a whole template
pub trait LintRule: Send + Sync {
    /// Stable id reported in `Diagnostic::rule`
    fn name(&self) -> &'static str;

    /// One-line summary for listings
    fn description(&self) -> &'static str;

    fn check_document(&self, document: &Document) -> Vec<Diagnostic>;
}

/// Ordered set of rules. Diagnostics come out in registration order.
pub struct RuleRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl RuleRegistry {
    /// The built-in template checks: structural errors, the three advisory
    /// warnings, then the informational accessibility hints
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.add_rule(Box::new(UniqueBlockIdsRule));
        registry.add_rule(Box::new(UnsubscribeFooterRule));
        registry.add_rule(Box::new(RequireTextBlockRule));
        registry.add_rule(Box::new(FullUrlButtonsRule));
        registry.add_rule(Box::new(A11yRule));
        registry
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }

    /// Drop the rule named `name`. Returns whether one was registered.
    pub fn remove_rule(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.name() != name);
        self.rules.len() != before
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rule_names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rule_order() {
        assert_eq!(
            RuleRegistry::new().rule_names(),
            vec![
                "unique-block-ids",
                "unsubscribe-footer",
                "require-text-block",
                "full-url-buttons",
                "a11y"
            ]
        );
    }

    #[test]
    fn test_remove_rule() {
        let mut registry = RuleRegistry::new();

        assert!(registry.remove_rule("a11y"));
        assert!(!registry.remove_rule("a11y"));
        assert_eq!(registry.rules().len(), 4);
    }
}
