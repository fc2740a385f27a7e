//! Wait command - poll until a document finishes converting.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use crocodoc_client::ConversionStatus;
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::build_client;
use crate::output::{DocumentOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the wait command.
#[derive(Args)]
pub struct WaitArgs {
    /// Document id.
    pub id: String,

    /// Give up after this many seconds.
    #[arg(long, default_value = "300")]
    pub timeout: u64,
}

/// Runs the wait command.
pub async fn run(args: &WaitArgs, cli: &Cli) -> Result<()> {
    let client = build_client(cli)?;
    let mut document = client.document(args.id.as_str())?;

    let interval = client
        .status_refresh_threshold()
        .to_std()
        .unwrap_or(Duration::from_secs(4))
        .max(Duration::from_millis(500));
    let deadline = Instant::now() + Duration::from_secs(args.timeout);

    let snapshot = loop {
        let snapshot = document.status(false).await?;
        if snapshot.status.is_terminal() {
            break snapshot;
        }
        if Instant::now() + interval > deadline {
            anyhow::bail!(
                "Timed out after {}s; {} is still {}",
                args.timeout,
                args.id,
                snapshot.status
            );
        }
        debug!(status = %snapshot.status, "Not converted yet");
        sleep(interval).await;
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_status(document.id(), &snapshot));
        }
        OutputFormat::Json => {
            let output = DocumentOutput::new(document.id(), &snapshot);
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    if snapshot.status == ConversionStatus::Error {
        anyhow::bail!(
            "Conversion failed: {}",
            snapshot.error.as_deref().unwrap_or("no detail given")
        );
    }

    Ok(())
}
