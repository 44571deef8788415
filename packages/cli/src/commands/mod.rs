pub mod lint;
pub mod new;
pub mod render;

pub use lint::{lint, LintArgs};
pub use new::{new_template, NewArgs};
pub use render::{render, RenderArgs};
