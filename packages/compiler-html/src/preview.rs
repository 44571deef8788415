use crate::compiler::{compile_to_html, CompileOptions, Viewport};
use crate::text::{compile_to_text, TextOptions};
use outreach_model::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which projection of the document the editor shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    #[default]
    Desktop,
    Mobile,
    Text,
}

impl PreviewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewMode::Desktop => "desktop",
            PreviewMode::Mobile => "mobile",
            PreviewMode::Text => "text",
        }
    }
}

impl fmt::Display for PreviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(PreviewMode::Desktop),
            "mobile" => Ok(PreviewMode::Mobile),
            "text" => Ok(PreviewMode::Text),
            other => Err(format!("Invalid preview mode: {}. Use: desktop, mobile, or text", other)),
        }
    }
}

/// A rendered projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Html(String),
    Text(String),
}

impl Preview {
    pub fn as_str(&self) -> &str {
        match self {
            Preview::Html(s) | Preview::Text(s) => s,
        }
    }

    pub fn is_html(&self) -> bool {
        matches!(self, Preview::Html(_))
    }
}

/// Renders any preview mode with fixed formatting options
#[derive(Debug, Clone)]
pub struct Renderer {
    pub compile: CompileOptions,
    pub text: TextOptions,
}

impl Renderer {
    pub fn new(compile: CompileOptions, text: TextOptions) -> Self {
        Self { compile, text }
    }

    pub fn render(&self, document: &Document, mode: PreviewMode) -> Preview {
        let viewport = match mode {
            PreviewMode::Desktop => Viewport::Desktop,
            PreviewMode::Mobile => Viewport::Mobile,
            PreviewMode::Text => return Preview::Text(compile_to_text(document, &self.text)),
        };
        let options = CompileOptions {
            viewport,
            ..self.compile.clone()
        };
        Preview::Html(compile_to_html(document, options))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(CompileOptions::default(), TextOptions::default())
    }
}

/// Render `mode` with default options
pub fn render_preview(document: &Document, mode: PreviewMode) -> Preview {
    Renderer::default().render(document, mode)
}
