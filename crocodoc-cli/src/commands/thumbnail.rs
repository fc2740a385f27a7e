//! Thumbnail command - fetch a PNG preview of the first page.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use crocodoc_client::document::DEFAULT_THUMBNAIL_SIZE;

use super::build_client;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the thumbnail command.
#[derive(Args)]
pub struct ThumbnailArgs {
    /// Document id.
    pub id: String,

    /// Destination PNG file.
    pub dest: PathBuf,

    /// Maximum size as WIDTHxHEIGHT (each 1-300).
    #[arg(long, value_parser = parse_size)]
    pub size: Option<(u32, u32)>,
}

/// Runs the thumbnail command.
pub async fn run(args: &ThumbnailArgs, cli: &Cli) -> Result<()> {
    let client = build_client(cli)?;
    let document = client.document(args.id.as_str())?;
    let (width, height) = args
        .size
        .unwrap_or((DEFAULT_THUMBNAIL_SIZE, DEFAULT_THUMBNAIL_SIZE));

    document.download_thumbnail(&args.dest, width, height).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!(
                "{}",
                formatter.format_done(&format!(
                    "Saved {width}x{height} thumbnail to {}",
                    args.dest.display()
                ))
            );
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "uuid": args.id,
                "width": width,
                "height": height,
                "path": args.dest.display().to_string(),
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}

/// Parses `WIDTHxHEIGHT`.
pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|_| format!("'{part}' is not a valid pixel count"))
    };
    Ok((parse(width)?, parse(height)?))
}
