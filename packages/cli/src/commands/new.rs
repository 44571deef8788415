use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use outreach_model::Document;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Template file to create (.json)
    pub file: PathBuf,

    /// Template name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Force overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

pub fn new_template(args: NewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = Path::new(cwd).join(&args.file);

    if path.exists() && !args.force {
        println!("{} {} already exists", "⚠️".yellow(), args.file.display().to_string().bright_white());
        println!("Use --force to overwrite");
        return Ok(());
    }

    let document = starter_document(&config, args.name.as_deref());
    write_document(&path, &document)?;

    println!("{}", "📝 Created template".bright_blue().bold());
    println!("  {} {} ({} blocks)", "✓".green(), args.file.display(), document.blocks.len());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", args.file.display());
    println!("  2. Run: outreach render {}", args.file.display());
    println!("  3. Run: outreach lint {}", args.file.display());

    Ok(())
}

/// Default document with the configured global styles
pub fn starter_document(config: &Config, name: Option<&str>) -> Document {
    let mut document = Document::starter();
    if let Some(name) = name {
        document.name = name.to_string();
    }
    document.global_styles = config.global.clone();
    document
}

pub fn write_document(path: &Path, document: &Document) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "Wrote template");
    Ok(())
}

pub fn read_document(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).map_err(|e| anyhow!("Cannot read {}: {}", path.display(), e))?;
    let document: Document =
        serde_json::from_str(&content).map_err(|e| anyhow!("Invalid template {}: {}", path.display(), e))?;
    debug!(path = %path.display(), blocks = document.blocks.len(), "Loaded template");
    Ok(document)
}
