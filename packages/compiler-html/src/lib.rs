//! # Outreach HTML Compiler
//!
//! Projects a template document into its three views: desktop HTML,
//! mobile HTML and plain text. Block rows are identical across viewports;
//! only the canvas width changes.

mod compiler;
mod preview;
mod text;


pub use compiler::{compile_blocks, compile_to_html, CompileOptions, Viewport};
pub use preview::{render_preview, Preview, PreviewMode, Renderer};
pub use text::{compile_to_text, strip_tags, TextOptions};
