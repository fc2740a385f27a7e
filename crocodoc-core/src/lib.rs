// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Crocodoc Core
//!
//! Core types and models for the Crocodoc API client.
//!
//! This crate holds the parts of the client that never touch the network:
//!
//! - Document status snapshots and the TTL cache that memoizes them
//! - Viewing session options (permissions, sidebar, annotation filter)
//! - The persisted form of an activated viewing session
//! - Error types for local precondition failures
//!
//! ## Key Types
//!
//! ### Status
//! - [`ConversionStatus`] - Conversion state reported by the service
//! - [`StatusSnapshot`] - Last known status of a document
//! - [`StatusCache`] - Snapshot plus freshness window
//!
//! ### Sessions
//! - [`SessionOptions`] - Viewing session configuration
//! - [`SidebarMode`] - Viewer sidebar behavior
//! - [`AnnotationFilter`] - Which users' annotations are shown
//! - [`SessionActivation`] - Key and creation time of an activated session
//! - [`SessionRecord`] - Serializable form of an activated session

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Status types
    ConversionStatus,
    StatusCache,
    StatusSnapshot,
    DEFAULT_REFRESH_THRESHOLD_SECS,
    // Session types
    AnnotationFilter,
    SessionActivation,
    SessionOptions,
    SessionRecord,
    SidebarMode,
    SESSION_LIFETIME_SECS,
};
