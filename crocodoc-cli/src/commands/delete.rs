//! Delete command - remove a document from the service.

use anyhow::Result;
use clap::Args;

use super::build_client;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Document id.
    pub id: String,
}

/// Runs the delete command.
pub async fn run(args: &DeleteArgs, cli: &Cli) -> Result<()> {
    let client = build_client(cli)?;
    let deleted = client.document(args.id.as_str())?.delete().await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            if deleted {
                println!("{}", formatter.format_done(&format!("Deleted {}", args.id)));
            } else {
                println!("{}", formatter.format_failed(&format!("{} was not deleted", args.id)));
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({ "uuid": args.id, "deleted": deleted });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    if !deleted {
        anyhow::bail!("The service did not confirm deleting {}", args.id);
    }
    Ok(())
}
