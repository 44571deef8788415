use crate::diagnostic::{Diagnostic, DiagnosticLevel};
use crate::rules::RuleRegistry;
use outreach_model::Document;

/// Options for configuring the linter
#[derive(Debug, Default)]
pub struct LintOptions {
    /// Custom rule registry (uses default if None)
    pub registry: Option<RuleRegistry>,
}

/// Lint a template document and return diagnostics in rule order
pub fn lint_document(document: &Document, options: LintOptions) -> Vec<Diagnostic> {
    let registry = options.registry.unwrap_or_default();
    lint_with(document, &registry)
}

/// Lint with a borrowed registry, for callers that lint repeatedly
pub fn lint_with(document: &Document, registry: &RuleRegistry) -> Vec<Diagnostic> {
    registry
        .rules()
        .iter()
        .flat_map(|rule| rule.check_document(document))
        .collect()
}

/// Advisory warning messages for `document`. Empty means every check
/// passed.
pub fn warnings(document: &Document) -> Vec<String> {
    warning_messages(&lint_document(document, LintOptions::default()))
}

/// Messages of the `Warning`-level entries of `diagnostics`
pub fn warning_messages(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics
        .iter()
        .filter(|d| d.level == DiagnosticLevel::Warning)
        .map(|d| d.message.clone())
        .collect()
}
