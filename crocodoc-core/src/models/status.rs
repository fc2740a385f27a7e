//! Document status types.
//!
//! This module contains the memoized status of a document:
//! - [`ConversionStatus`] - Conversion state levels
//! - [`StatusSnapshot`] - Last fetched status plus fetch time
//! - [`StatusCache`] - Snapshot with a freshness window

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default number of seconds a fetched status stays trustworthy.
pub const DEFAULT_REFRESH_THRESHOLD_SECS: u64 = 4;

// ============================================================================
// Conversion Status
// ============================================================================

/// Conversion state of a document as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    /// Never fetched, or the service reported something unrecognized.
    #[default]
    Unknown,
    /// Waiting for or undergoing conversion.
    Queued,
    /// Conversion finished successfully.
    Done,
    /// Conversion failed.
    Error,
}

impl ConversionStatus {
    /// Maps the service's status string onto a status level.
    ///
    /// `PROCESSING` is treated as still queued. Absent or unrecognized
    /// values map to [`ConversionStatus::Unknown`].
    pub fn from_api(value: Option<&str>) -> Self {
        match value {
            Some("QUEUED" | "PROCESSING") => Self::Queued,
            Some("DONE") => Self::Done,
            Some("ERROR") => Self::Error,
            _ => Self::Unknown,
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Queued => "Queued",
            Self::Done => "Done",
            Self::Error => "Error",
        }
    }

    /// Returns true once conversion can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl std::fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Status Snapshot
// ============================================================================

/// Last known conversion state of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Conversion state.
    pub status: ConversionStatus,
    /// Whether the document can already be opened in the viewer.
    pub viewable: bool,
    /// Error detail reported by the service, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When this snapshot was fetched. `None` until the first fetch.
    #[serde(default)]
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl StatusSnapshot {
    /// Creates a snapshot fetched at `refreshed_at`.
    pub fn new(
        status: ConversionStatus,
        viewable: bool,
        error: Option<String>,
        refreshed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status,
            viewable,
            error,
            refreshed_at: Some(refreshed_at),
        }
    }

    /// Returns true if the snapshot has never been fetched.
    pub fn is_unfetched(&self) -> bool {
        self.refreshed_at.is_none()
    }

    /// Returns the age of the snapshot at `now`.
    pub fn age_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.refreshed_at.map(|at| now - at)
    }

    /// Returns true if the snapshot is younger than `threshold` at `now`.
    pub fn is_fresh_at(&self, threshold: Duration, now: DateTime<Utc>) -> bool {
        self.age_at(now).is_some_and(|age| age < threshold)
    }

    /// Returns true if conversion finished successfully.
    pub fn is_converted(&self) -> bool {
        self.status == ConversionStatus::Done
    }
}

// ============================================================================
// Status Cache
// ============================================================================

/// A status snapshot together with the window during which it is trusted.
///
/// The cache never refreshes itself. Callers ask [`StatusCache::needs_refresh`]
/// before reading and [`StatusCache::store`] the result of a remote query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCache {
    snapshot: StatusSnapshot,
    threshold: Duration,
}

impl StatusCache {
    /// Creates an empty cache with the given freshness window.
    pub fn new(threshold: Duration) -> Self {
        Self {
            snapshot: StatusSnapshot::default(),
            threshold,
        }
    }

    /// Returns the freshness window.
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Returns the cached snapshot, fresh or not.
    pub fn snapshot(&self) -> &StatusSnapshot {
        &self.snapshot
    }

    /// Returns true if a read right now should go to the service.
    pub fn needs_refresh(&self, force: bool) -> bool {
        self.needs_refresh_at(force, Utc::now())
    }

    /// Returns true if a read at `now` should go to the service.
    pub fn needs_refresh_at(&self, force: bool, now: DateTime<Utc>) -> bool {
        force || !self.snapshot.is_fresh_at(self.threshold, now)
    }

    /// Replaces the cached snapshot.
    pub fn store(&mut self, snapshot: StatusSnapshot) -> &StatusSnapshot {
        self.snapshot = snapshot;
        &self.snapshot
    }
}

impl Default for StatusCache {
    fn default() -> Self {
        #[allow(clippy::cast_possible_wrap)]
        Self::new(Duration::seconds(DEFAULT_REFRESH_THRESHOLD_SECS as i64))
    }
}

// ============================================================================
// Tests
// ============================================================================
