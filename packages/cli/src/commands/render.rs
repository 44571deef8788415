use crate::commands::new::read_document;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use outreach_compiler_html::{CompileOptions, PreviewMode, Renderer, TextOptions};
use outreach_model::{extract_variables, personalize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Template file (.json)
    pub file: PathBuf,

    /// View to render (desktop, mobile, text)
    #[arg(short, long, default_value = "desktop")]
    pub mode: String,

    /// Merge variable as key=value (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Output file (overrides config outDir)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mode: PreviewMode = args.mode.parse().map_err(|e: String| anyhow!(e))?;
    let variables = parse_vars(&args.vars)?;

    let input = Path::new(cwd).join(&args.file);
    let output = render_file(&input, mode, &variables, &config)?;

    let target = match (&args.out, config.get_out_dir(cwd)) {
        (Some(out), _) => Some(Path::new(cwd).join(out)),
        (None, Some(dir)) => Some(dir.join(output_name(&args.file, mode))),
        (None, None) => None,
    };

    match target {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &output)?;
            println!("  {} {} → {}", "✓".green(), args.file.display(), path.display());

            let unresolved = extract_variables(&output);
            if !unresolved.is_empty() {
                println!("  {} Unresolved variables: {}", "ℹ".blue(), unresolved.join(", "));
            }
        }
        None => println!("{}", output),
    }

    Ok(())
}

/// Render one template file in `mode`, substituting `variables` if any
pub fn render_file(path: &Path, mode: PreviewMode, variables: &HashMap<String, String>, config: &Config) -> Result<String> {
    let document = read_document(path)?;
    let renderer = Renderer::new(
        CompileOptions {
            pretty: config.pretty,
            ..CompileOptions::default()
        },
        TextOptions {
            include_button_links: config.include_button_links,
        },
    );

    let output = renderer.render(&document, mode);
    if variables.is_empty() {
        Ok(output.as_str().to_string())
    } else {
        Ok(personalize(output.as_str(), variables))
    }
}

/// Parse repeated `key=value` arguments
pub fn parse_vars(vars: &[String]) -> Result<HashMap<String, String>> {
    vars.iter()
        .map(|var| {
            let (key, value) = var
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid variable: {}. Use key=value", var))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(anyhow!("Invalid variable: {}. Key is empty", var));
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

fn output_name(file: &Path, mode: PreviewMode) -> String {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());
    match mode {
        PreviewMode::Desktop => format!("{}.html", stem),
        PreviewMode::Mobile => format!("{}.mobile.html", stem),
        PreviewMode::Text => format!("{}.txt", stem),
    }
}
