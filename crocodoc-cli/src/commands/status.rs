//! Status command - show conversion status of one or more documents.

use anyhow::Result;
use clap::Args;

use super::build_client;
use crate::output::{DocumentOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Document ids; all are fetched with a single request.
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// Runs the status command.
pub async fn run(args: &StatusArgs, cli: &Cli) -> Result<()> {
    let client = build_client(cli)?;

    let mut set = client.document_set();
    for id in &args.ids {
        set.add_by_id(id.as_str())?;
    }
    set.refresh_all().await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            for document in &set {
                println!("{}", formatter.format_status(document.id(), document.cached_status()));
            }
        }
        OutputFormat::Json => {
            let outputs: Vec<DocumentOutput> = set
                .iter()
                .map(|document| DocumentOutput::new(document.id(), document.cached_status()))
                .collect();
            println!("{}", JsonFormatter::new(cli.pretty).format_documents(&outputs)?);
        }
    }

    Ok(())
}
