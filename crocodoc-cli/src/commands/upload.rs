//! Upload command - send a file or URL for conversion.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args};
use tracing::info;

use super::build_client;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the upload command.
#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["path", "url"])))]
pub struct UploadArgs {
    /// Local file to upload.
    pub path: Option<PathBuf>,

    /// Publicly reachable URL to convert instead of a local file.
    #[arg(long)]
    pub url: Option<String>,
}

/// Runs the upload command.
pub async fn run(args: &UploadArgs, cli: &Cli) -> Result<()> {
    let client = build_client(cli)?;

    let document = match (&args.path, &args.url) {
        (Some(path), _) => client.upload_file(path).await?,
        (None, Some(url)) => client.upload_url(url).await?,
        (None, None) => anyhow::bail!("Either a path or --url is required"),
    };
    info!(uuid = %document.id(), "Uploaded");

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_done(&format!("Uploaded {}", document.id())));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&serde_json::json!({ "uuid": document.id() }))?);
        }
    }

    Ok(())
}
