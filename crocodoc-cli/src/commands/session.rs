//! Session command - create a viewing session for a user.

use anyhow::Result;
use clap::Args;
use crocodoc_client::{AnnotationFilter, SessionOptions, SidebarMode};
use tracing::info;

use super::build_client;
use crate::output::{JsonFormatter, SessionOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    /// Document id.
    pub id: String,

    /// Numeric id of the viewing user.
    #[arg(long)]
    pub user_id: u64,

    /// Display name of the viewing user.
    #[arg(long)]
    pub user_name: String,

    /// Allow annotating and commenting.
    #[arg(long)]
    pub editable: bool,

    /// Allow managing other users' annotations.
    #[arg(long)]
    pub admin: bool,

    /// Allow downloading the document.
    #[arg(long)]
    pub downloadable: bool,

    /// Allow selecting and copying text.
    #[arg(long)]
    pub no_copy_protect: bool,

    /// Discard changes when the session ends.
    #[arg(long)]
    pub demo: bool,

    /// Sidebar: auto, visible, hidden or collapsed.
    #[arg(long, default_value = "auto")]
    pub sidebar: SidebarMode,

    /// Visible annotations: all, none, or comma-separated user ids.
    #[arg(long)]
    pub annotations: Option<AnnotationFilter>,
}

impl SessionArgs {
    /// Builds session options from the flags.
    pub fn options(&self) -> SessionOptions {
        SessionOptions::new()
            .editable(self.editable)
            .admin(self.admin)
            .downloadable(self.downloadable)
            .copy_protect(!self.no_copy_protect)
            .demo(self.demo)
            .sidebar(self.sidebar)
            .filter(self.annotations.clone().unwrap_or_default())
    }
}

/// Runs the session command.
pub async fn run(args: &SessionArgs, cli: &Cli) -> Result<()> {
    let client = build_client(cli)?;
    let document = client.document(args.id.as_str())?;

    let mut session = document.create_viewing_session(args.options());
    session.activate_for_user(args.user_id, &args.user_name).await?;
    info!(uuid = %document.id(), user_id = args.user_id, "Session created");

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_session(&session)?);
        }
        OutputFormat::Json => {
            let output = SessionOutput::from_session(&session)?;
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}
