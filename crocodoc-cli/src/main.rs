// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Crocodoc CLI - document conversion and viewing from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Upload a file and wait for conversion
//! crocodoc upload report.docx
//! crocodoc wait 8e5b0721-26c4-11df-b354-002170de47d3
//!
//! # Status of several documents in one request
//! crocodoc status <ID> <ID> --format json --pretty
//!
//! # Annotated PDF with everyone's annotations
//! crocodoc download <ID> out.pdf --pdf --annotations all
//!
//! # Viewing session for a user
//! crocodoc session <ID> --user-id 1000 --user-name "Ken Keiter" --editable
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{delete, download, session, status, text, thumbnail, upload, wait};

// ============================================================================
// CLI Definition
// ============================================================================

/// Crocodoc CLI - document conversion and viewing.
#[derive(Parser)]
#[command(name = "crocodoc")]
#[command(about = "Command-line client for the Crocodoc document conversion API")]
#[command(long_about = r#"
Upload documents to Crocodoc, track their conversion, download renditions
and create viewing sessions.

The API token is read from the config file or CROCODOC_API_TOKEN.

Examples:
  crocodoc upload report.docx          # Upload a local file
  crocodoc upload --url https://...    # Convert a document by URL
  crocodoc status <ID> <ID>            # Batched status
  crocodoc session <ID> --user-id 1 --user-name Ann
"#)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Config file (defaults to the user config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Upload a file or URL for conversion.
    #[command(visible_alias = "u")]
    Upload(upload::UploadArgs),

    /// Show conversion status.
    #[command(visible_alias = "s")]
    Status(status::StatusArgs),

    /// Wait until a document finishes converting.
    #[command(visible_alias = "w")]
    Wait(wait::WaitArgs),

    /// Delete a document.
    Delete(delete::DeleteArgs),

    /// Download the original file or a PDF.
    #[command(visible_alias = "d")]
    Download(download::DownloadArgs),

    /// Download a thumbnail.
    Thumbnail(thumbnail::ThumbnailArgs),

    /// Print extracted text.
    Text(text::TextArgs),

    /// Create a viewing session.
    Session(session::SessionArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// Any failure.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("crocodoc=debug")
    } else {
        EnvFilter::new("crocodoc=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Upload(args) => upload::run(args, &cli).await,
        Commands::Status(args) => status::run(args, &cli).await,
        Commands::Wait(args) => wait::run(args, &cli).await,
        Commands::Delete(args) => delete::run(args, &cli).await,
        Commands::Download(args) => download::run(args, &cli).await,
        Commands::Thumbnail(args) => thumbnail::run(args, &cli).await,
        Commands::Text(args) => text::run(args, &cli).await,
        Commands::Session(args) => session::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    std::process::exit(ExitCode::Success as i32);
}

// ============================================================================
// Tests
// ============================================================================
