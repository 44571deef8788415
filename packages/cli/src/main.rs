mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{lint, new_template, render, LintArgs, NewArgs, RenderArgs};

/// Outreach CLI - Build, preview and check email templates
#[derive(Parser, Debug)]
#[command(name = "outreach")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a template file from the starter document
    New(NewArgs),

    /// Render a template as desktop HTML, mobile HTML or plain text
    Render(RenderArgs),

    /// Run the template checks
    Lint(LintArgs),
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();

    match cli.command {
        Command::New(args) => new_template(args, &cwd),
        Command::Render(args) => render(args, &cwd),
        Command::Lint(args) => lint(args, &cwd),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
