//! Text command - print the text extracted from a document.

use anyhow::Result;
use clap::Args;

use super::build_client;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the text command.
#[derive(Args)]
pub struct TextArgs {
    /// Document id.
    pub id: String,
}

/// Runs the text command.
pub async fn run(args: &TextArgs, cli: &Cli) -> Result<()> {
    let client = build_client(cli)?;
    let pages = client.document(args.id.as_str())?.extracted_text().await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_pages(&pages));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&pages)?);
        }
    }

    Ok(())
}
