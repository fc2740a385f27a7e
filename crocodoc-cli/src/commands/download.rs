//! Download command - fetch the original file or a PDF rendition.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use crocodoc_client::AnnotationFilter;

use super::build_client;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the download command.
#[derive(Args)]
pub struct DownloadArgs {
    /// Document id.
    pub id: String,

    /// Destination file.
    pub dest: PathBuf,

    /// Download a PDF rendition instead of the original.
    #[arg(long)]
    pub pdf: bool,

    /// Annotations to embed in the PDF: all, none, or comma-separated user ids.
    #[arg(long, requires = "pdf")]
    pub annotations: Option<AnnotationFilter>,
}

/// Runs the download command.
pub async fn run(args: &DownloadArgs, cli: &Cli) -> Result<()> {
    let client = build_client(cli)?;
    let document = client.document(args.id.as_str())?;

    if args.pdf {
        let filter = args.annotations.clone().unwrap_or_default();
        document.download_pdf(&args.dest, &filter).await?;
    } else {
        document.download_original(&args.dest).await?;
    }

    let kind = if args.pdf { "pdf" } else { "original" };
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!(
                "{}",
                formatter.format_done(&format!("Saved {kind} to {}", args.dest.display()))
            );
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "uuid": args.id,
                "kind": kind,
                "path": args.dest.display().to_string(),
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}
