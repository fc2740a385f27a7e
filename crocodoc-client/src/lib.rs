// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Crocodoc Client
//!
//! Async client for the Crocodoc document conversion API.
//!
//! ## Entities
//!
//! - [`Document`] - One uploaded document with a memoized status
//! - [`ViewingSession`] - A time-boxed, per-user view grant on a document
//! - [`DocumentSet`] - A group of documents refreshed with a single request
//!
//! ## Plumbing
//!
//! - [`ClientConfig`] / [`ClientBuilder`] - Token, endpoints, TLS, cache window
//! - [`Transport`] - Pluggable request executor; [`HttpTransport`] is the
//!   reqwest-backed default
//! - [`classify`] - Maps every raw response to a body or an [`ApiError`]
//!
//! ## Example
//!
//! ```ignore
//! use crocodoc_client::{CrocodocClient, ClientConfig};
//!
//! let client = CrocodocClient::new(ClientConfig::new("your-api-token"))?;
//! let mut document = client.upload_file("/path/to/document.docx").await?;
//!
//! while !document.viewable().await? {
//!     tokio::time::sleep(std::time::Duration::from_secs(4)).await;
//! }
//!
//! let mut session = document.viewing_session();
//! session.activate_for_user(1000, "Ken Keiter").await?;
//! println!("{}", session.viewing_url()?);
//! ```

// Core modules
pub mod api;
pub mod client;
pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod http;
pub mod response;
pub mod session;
pub mod transport;

// Re-export key types at crate root

// Errors
pub use error::ApiError;

// Configuration & client
pub use client::{ClientBuilder, CrocodocClient};
pub use config::ClientConfig;

// Entities
pub use collection::DocumentSet;
pub use document::Document;
pub use session::ViewingSession;

// Transport
pub use http::HttpTransport;
pub use response::{classify, ResponseBody};
pub use transport::{ApiRequest, FilePart, HttpMethod, RawResponse, Transport};

// Core types callers need alongside the client
pub use crocodoc_core::{
    AnnotationFilter, ConversionStatus, CoreError, SessionOptions, SidebarMode, StatusSnapshot,
};
