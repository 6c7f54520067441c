//! phpcq: pre-commit quality gate for PHP projects.
//!
//! # Usage
//!
//! ```text
//! phpcq check-staged-files
//! phpcq indent-with-tabs [--dry-run] <paths>...
//! ```
//!
//! Logging goes to stderr and is controlled by `PHPCQ_LOG` (default `warn`).

mod commands;
mod report;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use commands::{check::CheckArgs, indent::IndentArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "phpcq",
    version,
    about = "Check staged PHP files for lockfile sync, syntax and coding style",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check files that are staged for a commit in VCS (Git, Mercurial).
    CheckStagedFiles(CheckArgs),

    /// Re-indent PHP files with tabs.
    IndentWithTabs(IndentArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<ExitCode> = match cli.command {
        Commands::CheckStagedFiles(args) => args.run(),
        Commands::IndentWithTabs(args) => args.run(),
    };
    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_env("PHPCQ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
