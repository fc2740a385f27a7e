//! Viewing session configuration types.
//!
//! - [`SessionOptions`] - Permissions and viewer layout for one session
//! - [`SidebarMode`] - Sidebar behavior in the viewer
//! - [`AnnotationFilter`] - Which users' annotations are shown
//! - [`SessionActivation`] - What the service hands back on activation
//! - [`SessionRecord`] - Serializable form of an activated session

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Lifetime of a viewing session, fixed by the service.
pub const SESSION_LIFETIME_SECS: i64 = 3600;

// ============================================================================
// Sidebar Mode
// ============================================================================

/// Sidebar behavior in the document viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SidebarMode {
    /// Let the viewer decide.
    #[default]
    Auto,
    /// Always shown.
    Visible,
    /// Never shown.
    Hidden,
    /// Shown collapsed.
    #[serde(alias = "collapse")]
    Collapsed,
}

impl SidebarMode {
    /// Returns the value the service expects for the `sidebar` parameter.
    pub fn api_value(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Visible => "visible",
            Self::Hidden => "none",
            Self::Collapsed => "collapse",
        }
    }

    /// Returns all modes.
    pub fn all() -> &'static [SidebarMode] {
        &[Self::Auto, Self::Visible, Self::Hidden, Self::Collapsed]
    }
}

impl FromStr for SidebarMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "visible" => Ok(Self::Visible),
            "hidden" | "none" => Ok(Self::Hidden),
            "collapsed" | "collapse" => Ok(Self::Collapsed),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown sidebar mode '{other}' (expected auto, visible, hidden or collapsed)"
            ))),
        }
    }
}

impl std::fmt::Display for SidebarMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Collapsed => "collapsed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Annotation Filter
// ============================================================================

/// Selects whose annotations and comments are visible (or exported).
///
/// An empty user set hides everything, same as [`AnnotationFilter::None`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationFilter {
    /// No annotations.
    None,
    /// Annotations from every user.
    All,
    /// Annotations from the listed user ids only.
    Users(BTreeSet<u64>),
}

impl AnnotationFilter {
    /// Builds a filter from a list of user ids.
    pub fn users(ids: impl IntoIterator<Item = u64>) -> Self {
        Self::Users(ids.into_iter().collect())
    }

    /// Returns true if at least some annotations are visible.
    pub fn is_visible(&self) -> bool {
        match self {
            Self::None => false,
            Self::All => true,
            Self::Users(ids) => !ids.is_empty(),
        }
    }

    /// Returns the value the service expects for the `filter` parameter.
    pub fn api_value(&self) -> String {
        match self {
            Self::All => "all".to_string(),
            Self::Users(ids) if !ids.is_empty() => ids
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(","),
            Self::None | Self::Users(_) => "none".to_string(),
        }
    }
}

impl Default for AnnotationFilter {
    fn default() -> Self {
        Self::Users(BTreeSet::new())
    }
}

impl FromStr for AnnotationFilter {
    type Err = CoreError;

    /// Parses `all`, `none`, or a comma-separated list of user ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "all" => return Ok(Self::All),
            "none" => return Ok(Self::None),
            _ => {}
        }

        let ids = trimmed
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u64>().map_err(|_| {
                    CoreError::InvalidArgument(format!("'{part}' is not a valid user id"))
                })
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self::Users(ids))
    }
}

impl std::fmt::Display for AnnotationFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.api_value())
    }
}

/// Persisted shape: the keywords as strings, user sets as arrays.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FilterRepr {
    Keyword(String),
    Users(Vec<u64>),
}

impl Serialize for AnnotationFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            Self::None => FilterRepr::Keyword("none".to_string()),
            Self::All => FilterRepr::Keyword("all".to_string()),
            Self::Users(ids) => FilterRepr::Users(ids.iter().copied().collect()),
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AnnotationFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match FilterRepr::deserialize(deserializer)? {
            FilterRepr::Keyword(word) => match word.as_str() {
                "all" => Ok(Self::All),
                "none" => Ok(Self::None),
                other => Err(serde::de::Error::custom(format!(
                    "unknown annotation filter '{other}'"
                ))),
            },
            FilterRepr::Users(ids) => Ok(Self::users(ids)),
        }
    }
}

// ============================================================================
// Session Options
// ============================================================================

/// Configuration of a viewing session.
///
/// Defaults are the restrictive ones: read-only, no admin, no download,
/// copy protection on, no annotations visible, automatic sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// User may annotate and comment.
    pub allow_editing: bool,
    /// Whose annotations are visible.
    pub filter: AnnotationFilter,
    /// User may delete and edit other users' annotations.
    pub allow_admin: bool,
    /// User may download the original document.
    pub allow_download: bool,
    /// Text selection is disabled in the viewer.
    pub copy_protect: bool,
    /// Changes made in the session are discarded when it ends.
    pub demo: bool,
    /// Sidebar behavior.
    pub sidebar: SidebarMode,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            allow_editing: false,
            filter: AnnotationFilter::default(),
            allow_admin: false,
            allow_download: false,
            copy_protect: true,
            demo: false,
            sidebar: SidebarMode::Auto,
        }
    }
}

impl SessionOptions {
    /// Creates options with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the user may annotate.
    pub fn editable(mut self, allow: bool) -> Self {
        self.allow_editing = allow;
        self
    }

    /// Sets whether the user has admin rights over annotations.
    pub fn admin(mut self, allow: bool) -> Self {
        self.allow_admin = allow;
        self
    }

    /// Sets whether the user may download the document.
    pub fn downloadable(mut self, allow: bool) -> Self {
        self.allow_download = allow;
        self
    }

    /// Sets copy protection.
    pub fn copy_protect(mut self, enabled: bool) -> Self {
        self.copy_protect = enabled;
        self
    }

    /// Sets demo mode.
    pub fn demo(mut self, enabled: bool) -> Self {
        self.demo = enabled;
        self
    }

    /// Sets the sidebar mode.
    pub fn sidebar(mut self, mode: SidebarMode) -> Self {
        self.sidebar = mode;
        self
    }

    /// Sets the annotation filter.
    pub fn filter(mut self, filter: AnnotationFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Returns the request parameters describing these options.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("editable", self.allow_editing.to_string()),
            ("admin", self.allow_admin.to_string()),
            ("downloadable", self.allow_download.to_string()),
            ("copyprotected", self.copy_protect.to_string()),
            ("demo", self.demo.to_string()),
            ("sidebar", self.sidebar.api_value().to_string()),
            ("filter", self.filter.api_value()),
        ]
    }
}

// ============================================================================
// Session Activation
// ============================================================================

/// State handed back by the service when a session is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionActivation {
    /// Opaque session key.
    pub key: String,
    /// When activation was requested (local clock).
    pub created_at: DateTime<Utc>,
    /// The `"<id>,<name>"` user field the session was created for.
    pub user: Option<String>,
}

impl SessionActivation {
    /// Returns the whole seconds left at `now`, negative once expired.
    ///
    /// This is a local estimate; the service decides actual expiry.
    pub fn seconds_remaining_at(&self, now: DateTime<Utc>) -> i64 {
        SESSION_LIFETIME_SECS - (now - self.created_at).num_seconds()
    }

    /// Returns true once no time remains at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::seconds(SESSION_LIFETIME_SECS)
    }
}

// ============================================================================
// Session Record
// ============================================================================

/// Serializable form of an activated viewing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Id of the document the session views.
    pub uuid: String,
    /// Opaque session key.
    pub key: String,
    /// When the session was activated.
    pub creation_time: DateTime<Utc>,
    /// User field sent on activation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Session configuration.
    #[serde(default)]
    pub options: SessionOptions,
}

impl SessionRecord {
    /// Builds a record from a document id, options and activation.
    pub fn new(
        uuid: impl Into<String>,
        options: SessionOptions,
        activation: &SessionActivation,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            key: activation.key.clone(),
            creation_time: activation.created_at,
            user: activation.user.clone(),
            options,
        }
    }

    /// Returns the activation part of the record.
    pub fn activation(&self) -> SessionActivation {
        SessionActivation {
            key: self.key.clone(),
            created_at: self.creation_time,
            user: self.user.clone(),
        }
    }

    /// Serializes the record to JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a record from JSON.
    pub fn from_json(data: &str) -> Result<Self, CoreError> {
        let record: Self = serde_json::from_str(data)?;
        if record.key.is_empty() {
            return Err(CoreError::InvalidData("session record has an empty key".to_string()));
        }
        Ok(record)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = SessionOptions::default();
        assert!(!options.allow_editing);
        assert!(!options.allow_admin);
        assert!(!options.allow_download);
        assert!(options.copy_protect);
        assert!(!options.demo);
        assert_eq!(options.sidebar, SidebarMode::Auto);
        assert_eq!(options.filter, AnnotationFilter::Users(BTreeSet::new()));
    }

    #[test]
    fn test_filter_visibility() {
        assert!(!AnnotationFilter::None.is_visible());
        assert!(!AnnotationFilter::default().is_visible());
        assert!(AnnotationFilter::All.is_visible());
        assert!(AnnotationFilter::users([1000]).is_visible());
    }

    #[test]
    fn test_filter_api_value() {
        assert_eq!(AnnotationFilter::All.api_value(), "all");
        assert_eq!(AnnotationFilter::None.api_value(), "none");
        assert_eq!(AnnotationFilter::default().api_value(), "none");
        assert_eq!(AnnotationFilter::users([42, 7, 1000]).api_value(), "7,42,1000");
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("all".parse::<AnnotationFilter>().unwrap(), AnnotationFilter::All);
        assert_eq!("NONE".parse::<AnnotationFilter>().unwrap(), AnnotationFilter::None);
        assert_eq!(
            "1, 2,3".parse::<AnnotationFilter>().unwrap(),
            AnnotationFilter::users([1, 2, 3])
        );
        assert_eq!("".parse::<AnnotationFilter>().unwrap(), AnnotationFilter::default());
        assert!("1,bob".parse::<AnnotationFilter>().is_err());
    }

    #[test]
    fn test_sidebar_from_str() {
        assert_eq!("auto".parse::<SidebarMode>().unwrap(), SidebarMode::Auto);
        assert_eq!("none".parse::<SidebarMode>().unwrap(), SidebarMode::Hidden);
        assert_eq!("collapse".parse::<SidebarMode>().unwrap(), SidebarMode::Collapsed);
        assert!("sideways".parse::<SidebarMode>().is_err());
    }

    #[test]
    fn test_sidebar_api_value() {
        assert_eq!(SidebarMode::Auto.api_value(), "auto");
        assert_eq!(SidebarMode::Visible.api_value(), "visible");
        assert_eq!(SidebarMode::Hidden.api_value(), "none");
        assert_eq!(SidebarMode::Collapsed.api_value(), "collapse");
    }

    #[test]
    fn test_options_to_params() {
        let options = SessionOptions::new()
            .editable(true)
            .sidebar(SidebarMode::Collapsed)
            .filter(AnnotationFilter::All);
        let params = options.to_params();

        assert!(params.contains(&("editable", "true".to_string())));
        assert!(params.contains(&("admin", "false".to_string())));
        assert!(params.contains(&("copyprotected", "true".to_string())));
        assert!(params.contains(&("sidebar", "collapse".to_string())));
        assert!(params.contains(&("filter", "all".to_string())));
    }

    #[test]
    fn test_activation_remaining_and_expiry() {
        let created_at = Utc::now();
        let activation = SessionActivation {
            key: "k".to_string(),
            created_at,
            user: None,
        };

        assert_eq!(activation.seconds_remaining_at(created_at), 3600);
        assert_eq!(activation.seconds_remaining_at(created_at + Duration::seconds(600)), 3000);
        assert!(!activation.is_expired_at(created_at + Duration::seconds(3599)));
        assert!(activation.is_expired_at(created_at + Duration::seconds(3600)));
        assert!(activation.seconds_remaining_at(created_at + Duration::seconds(4000)) < 0);
    }

    #[test]
    fn test_record_rejects_empty_key() {
        let json = r#"{"uuid":"abc","key":"","creation_time":"2024-01-01T00:00:00Z"}"#;
        assert!(matches!(
            SessionRecord::from_json(json),
            Err(CoreError::InvalidData(_))
        ));
    }
}
