//! Output formatting for CLI.

mod json;
mod text;

pub use json::{DocumentOutput, JsonFormatter, SessionOutput};
pub use text::TextFormatter;
