//! Domain models for Crocodoc.
//!
//! ## Submodules
//!
//! - [`status`] - Document conversion status and its TTL cache
//! - [`session`] - Viewing session options and persisted sessions

mod session;
mod status;

// Re-export everything at the models level
pub use session::{
    AnnotationFilter, SessionActivation, SessionOptions, SessionRecord, SidebarMode,
    SESSION_LIFETIME_SECS,
};
pub use status::{ConversionStatus, StatusCache, StatusSnapshot, DEFAULT_REFRESH_THRESHOLD_SECS};
