//! Text output formatting with colors.

use chrono::{DateTime, Local, Utc};
use crocodoc_client::{ConversionStatus, StatusSnapshot, ViewingSession};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the status of one document on a single line.
    pub fn format_status(&self, uuid: &str, snapshot: &StatusSnapshot) -> String {
        let mut line = format!(
            "{}  {}",
            self.bold(uuid),
            self.color_for_status(snapshot.status)
        );

        if snapshot.viewable {
            line.push_str(&format!("  {}", self.green("viewable")));
        }
        if let Some(error) = &snapshot.error {
            line.push_str(&format!("  {}", self.red(error)));
        }
        if snapshot.is_unfetched() {
            line.push_str(&format!("  {}", self.dim("(no status returned)")));
        }

        line
    }

    /// Formats an activated session.
    pub fn format_session(&self, session: &ViewingSession) -> anyhow::Result<String> {
        let created = self.format_time(session.created_at()?);
        let remaining = session.seconds_remaining()?;

        Ok([
            format!("Session for {}", self.bold(session.document_id())),
            format!("Key:     {}", session.key()?),
            format!("URL:     {}", self.cyan(&session.viewing_url()?)),
            format!("Created: {created}"),
            format!("Remains: {}", format_remaining(remaining)),
        ]
        .join("\n"))
    }

    /// Formats extracted text, one header per page.
    pub fn format_pages(&self, pages: &[String]) -> String {
        pages
            .iter()
            .enumerate()
            .map(|(i, page)| format!("{}\n{}", self.dim(&format!("--- page {} ---", i + 1)), page))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats a confirmation line.
    pub fn format_done(&self, message: &str) -> String {
        format!("{} {}", self.green("✓"), message)
    }

    /// Formats a failure line.
    pub fn format_failed(&self, message: &str) -> String {
        format!("{} {}", self.red("✗"), message)
    }

    fn format_time(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_status(&self, status: ConversionStatus) -> String {
        let label = status.label();
        match status {
            ConversionStatus::Done => self.green(label),
            ConversionStatus::Queued => self.yellow(label),
            ConversionStatus::Error => self.red(label),
            ConversionStatus::Unknown => self.dim(label),
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Renders seconds as `Xm Ys`, or `expired`.
pub fn format_remaining(seconds: i64) -> String {
    if seconds <= 0 {
        return "expired".to_string();
    }
    let minutes = seconds / 60;
    let rest = seconds % 60;
    if minutes > 0 {
        format!("{minutes}m {rest}s")
    } else {
        format!("{rest}s")
    }
}
