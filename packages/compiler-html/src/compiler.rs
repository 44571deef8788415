use outreach_model::{Align, Block, BlockType, ButtonStyle, Document, GlobalStyles};
use serde::{Deserialize, Serialize};

const FONT_STACK: &str = "-apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif";
const DEFAULT_SIGNATURE_TEXT: &str =
    "You are receiving this email because you opted in. If you'd like to stop, click {{unsubscribe_url}}.";

/// Canvas width the email is laid out for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Mobile,
}

impl Viewport {
    /// Container width in pixels
    pub fn width(&self) -> u32 {
        match self {
            Viewport::Desktop => 600,
            Viewport::Mobile => 360,
        }
    }
}

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Outer container width
    pub viewport: Viewport,
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport::Desktop,
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context {
    options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        let indent = self.options.indent.clone();
        for _ in 0..self.depth {
            self.add(&indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile a template to an email-safe HTML document.
///
/// Never mutates the document; compiling twice yields identical output.
pub fn compile_to_html(document: &Document, options: CompileOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    compile_head(document, &mut ctx);
    compile_body(document, &mut ctx);

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.get_output()
}

/// Compile only the block rows (`<tr>` fragments), as they appear inside
/// the canvas table. Identical for every viewport.
pub fn compile_blocks(blocks: &[Block], options: CompileOptions) -> String {
    let mut ctx = Context::new(options);
    for block in blocks {
        compile_block(block, &mut ctx);
    }
    ctx.get_output()
}

fn compile_head(document: &Document, ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!("<title>{}</title>", escape_html(&document.name)));

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_body(document: &Document, ctx: &mut Context) {
    let GlobalStyles { background, font, padding } = &document.global_styles;
    let width = ctx.options.viewport.width();

    ctx.add_line(&format!(
        "<body style=\"margin:0; padding:0; background:{}; font-family:{}, {};\">",
        escape_html(background),
        escape_html(font),
        FONT_STACK
    ));
    ctx.indent();
    ctx.add_line("<table role=\"presentation\" cellspacing=\"0\" cellpadding=\"0\" border=\"0\" width=\"100%\">");
    ctx.indent();
    ctx.add_line("<tr>");
    ctx.indent();
    ctx.add_line(&format!("<td align=\"center\" style=\"padding:{}px 0;\">", padding));
    ctx.indent();
    ctx.add_line(&format!(
        "<table role=\"presentation\" cellspacing=\"0\" cellpadding=\"0\" border=\"0\" width=\"{}\" style=\"background:#ffffff; border:1px solid #e5e7eb; border-radius:12px;\">",
        width
    ));
    ctx.indent();

    for block in &document.blocks {
        compile_block(block, ctx);
    }

    ctx.dedent();
    ctx.add_line("</table>");
    ctx.dedent();
    ctx.add_line("</td>");
    ctx.dedent();
    ctx.add_line("</tr>");
    ctx.dedent();
    ctx.add_line("</table>");
    ctx.dedent();
    ctx.add_line("</body>");
}

fn compile_block(block: &Block, ctx: &mut Context) {
    let props = block.props();
    let padding = props.int_or("padding", 12);
    let align = Align::from_prop(props.str("align"), Align::Left).as_str();

    match block.block_type() {
        BlockType::Text => {
            let style = format!(
                "padding:{}px; text-align:{}; color:{}; font-size:{}px; line-height:1.5;",
                padding,
                align,
                escape_html(props.str_or("color", "#111827")),
                props.int_or("size", 16)
            );
            compile_cell(&style, props.str_or("text", ""), ctx);
        }

        BlockType::Image => {
            let style = format!("padding:{}px; text-align:{};", padding, align);
            let img = format!(
                "<img src=\"{}\" alt=\"{}\" width=\"{}\" style=\"max-width:100%; height:auto; display:inline-block;\" />",
                escape_html(props.str_or("src", "")),
                escape_html(props.str_or("alt", "")),
                props.int_or("width", 560)
            );
            compile_cell(&style, &img, ctx);
        }

        BlockType::Button => {
            let (background, color, border) = button_colors(ButtonStyle::from_prop(props.str_or("style", "primary")));
            let style = format!("padding:{}px; text-align:{};", padding, align);
            let link = format!(
                "<a href=\"{}\" style=\"background:{}; color:{}; text-decoration:none; padding:12px 20px; border-radius:8px; border:{}; display:inline-block; font-weight:600;\">{}</a>",
                escape_html(props.str_or("url", "#")),
                background,
                color,
                border,
                props.str_or("text", "Action")
            );
            compile_cell(&style, &link, ctx);
        }

        BlockType::Divider => {
            let style = format!("padding:{}px;", padding);
            compile_cell(&style, "<div style=\"border-bottom:1px solid #e5e7eb; width:100%;\"></div>", ctx);
        }

        BlockType::Spacer => {
            ctx.add_line(&format!(
                "<tr><td style=\"padding:{}px 0; height:{}px;\"></td></tr>",
                padding,
                props.int_or("height", 24)
            ));
        }

        BlockType::Signature => {
            let style = format!(
                "padding:{}px; font-size:13px; color:{}; text-align:{}; line-height:1.6;",
                padding,
                escape_html(props.str_or("color", "#6B7280")),
                align
            );
            compile_cell(&style, props.str_or("text", DEFAULT_SIGNATURE_TEXT), ctx);
        }
    }
}

fn compile_cell(style: &str, content: &str, ctx: &mut Context) {
    ctx.add_line("<tr>");
    ctx.indent();
    ctx.add_line(&format!("<td style=\"{}\">", style));
    ctx.indent();
    ctx.add_line(content);
    ctx.dedent();
    ctx.add_line("</td>");
    ctx.dedent();
    ctx.add_line("</tr>");
}

/// Background, text color and border of a call-to-action
fn button_colors(style: ButtonStyle) -> (&'static str, &'static str, &'static str) {
    match style {
        ButtonStyle::Primary => ("#6366F1", "#ffffff", "none"),
        ButtonStyle::Secondary => ("#374151", "#ffffff", "none"),
        ButtonStyle::Outline => ("#111827", "#e5e7eb", "1px solid #6366F1"),
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
