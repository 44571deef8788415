use crate::commands::new::read_document;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use outreach_linter::{lint_document, Diagnostic, DiagnosticLevel, LintOptions};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Template file (.json)
    pub input: PathBuf,

    /// Show all diagnostics including info level
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

/// Diagnostic counts for one file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LintSummary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl LintSummary {
    fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let count = |level: DiagnosticLevel| diagnostics.iter().filter(|d| d.level == level).count();
        Self {
            errors: count(DiagnosticLevel::Error),
            warnings: count(DiagnosticLevel::Warning),
            infos: count(DiagnosticLevel::Info),
        }
    }

    pub fn has_issues(&self) -> bool {
        self.errors > 0 || self.warnings > 0
    }
}

pub fn lint(args: LintArgs, cwd: &str) -> Result<()> {
    if args.format != "text" && args.format != "json" {
        return Err(anyhow!("Invalid format: {}. Use: text or json", args.format));
    }

    let input = Path::new(cwd).join(&args.input);
    if !input.is_file() {
        return Err(anyhow!("Input file does not exist: {}", args.input.display()));
    }

    let text = args.format == "text";
    if text {
        println!("🔍 {} Outreach Linter", "Starting".green().bold());
        println!("   Input: {}", args.input.display());
        println!();
    }

    let summary = lint_file(&input, args.verbose, &args.format)?;

    if text {
        println!(
            "✨ {} Linting complete!",
            if summary.has_issues() {
                "Done".yellow().bold()
            } else {
                "Done".green().bold()
            }
        );
        if summary.errors > 0 {
            println!("   {} {}", "Errors:".red(), summary.errors);
        }
        if summary.warnings > 0 {
            println!("   {} {}", "Warnings:".yellow(), summary.warnings);
        }
        if !summary.has_issues() {
            println!("   {} All checks passed!", "✓".green());
        }
    }

    // Any warning fails the command
    if summary.has_issues() {
        std::process::exit(1);
    }

    Ok(())
}

/// Lint one template file and print its diagnostics
pub fn lint_file(file_path: &Path, verbose: bool, format: &str) -> Result<LintSummary> {
    let document = read_document(file_path)?;
    let diagnostics = lint_document(&document, LintOptions::default());
    let summary = LintSummary::from_diagnostics(&diagnostics);

    if format == "json" {
        let shown: Vec<&Diagnostic> = diagnostics
            .iter()
            .filter(|d| verbose || d.level != DiagnosticLevel::Info)
            .collect();
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(summary);
    }

    println!("{}", file_path.display());
    for diagnostic in &diagnostics {
        if !verbose && diagnostic.level == DiagnosticLevel::Info {
            continue;
        }

        let level_str = match diagnostic.level {
            DiagnosticLevel::Error => "error".red().bold(),
            DiagnosticLevel::Warning => "warning".yellow().bold(),
            DiagnosticLevel::Info => "info".blue().bold(),
        };
        let location = diagnostic
            .block_id
            .as_deref()
            .map(|id| format!(" ({})", id))
            .unwrap_or_default();

        println!("  {} [{}]{} {}", level_str, diagnostic.rule, location, diagnostic.message);

        if let Some(suggestion) = &diagnostic.suggestion {
            println!("    {} {}", "💡".dimmed(), suggestion.dimmed());
        }
    }
    println!();

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::new::write_document;
    use outreach_model::{BlockType, Document, Props};

    #[test]
    fn test_lint_starter_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        write_document(&path, &Document::starter()).unwrap();

        let summary = lint_file(&path, false, "text").unwrap();
        assert_eq!(summary, LintSummary::default());
        assert!(!summary.has_issues());
    }

    #[test]
    fn test_lint_counts_levels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");

        let mut document = Document::new("Image only");
        let image = document
            .create_block(BlockType::Image)
            .update_props(Props::new().with("src", "https://cdn.example.com/a.png"));
        document.blocks.push(image);
        write_document(&path, &document).unwrap();

        let summary = lint_file(&path, true, "json").unwrap();
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.warnings, 2);
        assert_eq!(summary.infos, 1);
        assert!(summary.has_issues());
    }

    #[test]
    fn test_lint_rejects_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let result = lint(
            LintArgs {
                input: PathBuf::from("t.json"),
                verbose: false,
                format: "xml".to_string(),
            },
            &dir.path().display().to_string(),
        );

        assert!(result.is_err());
    }
}
