use outreach_model::BlockId;
use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

/// A finding from the template linter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level
    pub level: DiagnosticLevel,

    /// The rule that generated this diagnostic
    pub rule: String,

    /// Human-readable message
    pub message: String,

    /// Block the finding points at, when it concerns a single block
    pub block_id: Option<BlockId>,

    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn error(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, rule, message)
    }

    pub fn warning(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, rule, message)
    }

    pub fn info(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, rule, message)
    }

    fn new(level: DiagnosticLevel, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            rule: rule.into(),
            message: message.into(),
            block_id: None,
            suggestion: None,
        }
    }

    pub fn at_block(mut self, block_id: impl Into<BlockId>) -> Self {
        self.block_id = Some(block_id.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}
