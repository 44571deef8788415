mod diagnostic;
mod linter;
mod rules;

pub use diagnostic::{Diagnostic, DiagnosticLevel};
pub use linter::{lint_document, lint_with, warning_messages, warnings, LintOptions};
pub use rules::{
    A11yRule, FullUrlButtonsRule, LintRule, RequireTextBlockRule, RuleRegistry, UniqueBlockIdsRule, UnsubscribeFooterRule,
    FULL_URL_MESSAGE, TEXT_BLOCK_MESSAGE, UNSUBSCRIBE_MESSAGE,
};

