//! # Personalization
//!
//! Merge variables of the form `{{name}}` or `{{name | default:"literal"}}`
//! inside text and signature HTML. The editor only inserts tokens; values
//! are substituted per recipient at send time by [`personalize`].

use crate::block::{Block, Props};
use crate::error::ModelError;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

/// Insertable merge variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeVariable {
    FirstName,
    /// `first_name`, falling back to "there"
    FirstNameOrThere,
    Email,
    UnsubscribeUrl,
}

impl MergeVariable {
    pub const CATALOG: [MergeVariable; 4] = [
        MergeVariable::FirstName,
        MergeVariable::FirstNameOrThere,
        MergeVariable::Email,
        MergeVariable::UnsubscribeUrl,
    ];

    /// Literal token inserted into block content
    pub fn token(&self) -> &'static str {
        match self {
            MergeVariable::FirstName => "{{first_name}}",
            MergeVariable::FirstNameOrThere => "{{first_name | default:\"there\"}}",
            MergeVariable::Email => "{{email}}",
            MergeVariable::UnsubscribeUrl => "{{unsubscribe_url}}",
        }
    }

    /// Catalog key, as serialized
    pub fn key(&self) -> &'static str {
        match self {
            MergeVariable::FirstName => "first_name",
            MergeVariable::FirstNameOrThere => "first_name_or_there",
            MergeVariable::Email => "email",
            MergeVariable::UnsubscribeUrl => "unsubscribe_url",
        }
    }

    /// Variable name resolved at send time
    pub fn name(&self) -> &'static str {
        match self {
            MergeVariable::FirstName | MergeVariable::FirstNameOrThere => "first_name",
            MergeVariable::Email => "email",
            MergeVariable::UnsubscribeUrl => "unsubscribe_url",
        }
    }
}

impl FromStr for MergeVariable {
    type Err = ModelError;

    /// Parses either the literal token or its snake_case name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MergeVariable::CATALOG
            .into_iter()
            .find(|v| v.token() == s || v.key() == s)
            .ok_or_else(|| ModelError::UnknownMergeVariable(s.to_string()))
    }
}

/// A merge token found in content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeToken {
    pub name: String,
    pub default: Option<String>,
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?:\|\s*default\s*:\s*"([^"]*)"\s*)?\}\}"#)
            .expect("merge token pattern is valid")
    })
}

/// Parse every merge token in `content`, in order of appearance
pub fn parse_tokens(content: &str) -> Vec<MergeToken> {
    token_pattern()
        .captures_iter(content)
        .map(|caps| MergeToken {
            name: caps[1].to_string(),
            default: caps.get(2).map(|m| m.as_str().to_string()),
        })
        .collect()
}

/// Distinct variable names referenced by `content`, in first-use order
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in parse_tokens(content) {
        if !names.contains(&token.name) {
            names.push(token.name);
        }
    }
    names
}

/// Substitute recipient values into `content`.
///
/// A present, non-empty variable wins; otherwise the token's default is
/// used. Tokens with neither are left verbatim.
pub fn personalize(content: &str, variables: &HashMap<String, String>) -> String {
    token_pattern()
        .replace_all(content, |caps: &Captures| {
            let value = variables.get(&caps[1]).filter(|v| !v.is_empty());
            match (value, caps.get(2)) {
                (Some(value), _) => value.clone(),
                (None, Some(default)) => default.as_str().to_string(),
                (None, None) => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Append `token` to a text-capable block's content, separated by a space.
///
/// Returns `false` and leaves the block untouched for other block types.
pub fn append_token(block: &mut Block, token: &str) -> bool {
    if !block.block_type().is_text_capable() {
        return false;
    }

    let text = format!("{} {}", block.text(), token);
    let mut props: Props = block.props().clone();
    props.set("text", text);
    block.set_props(props);
    true
}
