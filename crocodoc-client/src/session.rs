//! Viewing sessions.
//!
//! A [`ViewingSession`] starts out unactivated, holding only its options.
//! [`ViewingSession::activate_for_user`] asks the service for a session key,
//! which is valid for one hour. Activating again replaces the key.

use chrono::{DateTime, Utc};
use crocodoc_core::{
    AnnotationFilter, CoreError, SessionActivation, SessionOptions, SessionRecord, SidebarMode,
};
use tracing::{info, instrument, warn};

use crate::api::{self, SessionCreateResponse};
use crate::client::CrocodocClient;
use crate::document::Document;
use crate::error::ApiError;
use crate::transport::ApiRequest;

// ============================================================================
// Viewing Session
// ============================================================================

/// A viewing session for one document.
#[derive(Debug, Clone)]
pub struct ViewingSession {
    client: CrocodocClient,
    document_id: String,
    options: SessionOptions,
    activation: Option<SessionActivation>,
}

impl ViewingSession {
    /// Creates an unactivated session for `document`.
    pub fn new(document: &Document, options: SessionOptions) -> Self {
        Self {
            client: document.client().clone(),
            document_id: document.id().to_string(),
            options,
            activation: None,
        }
    }

    /// Returns the id of the viewed document.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Returns the session options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Returns the options for modification.
    ///
    /// Changes take effect at the next activation.
    pub fn options_mut(&mut self) -> &mut SessionOptions {
        &mut self.options
    }

    // ------------------------------------------------------------------------
    // Option queries
    // ------------------------------------------------------------------------

    /// User may annotate.
    pub fn is_editable(&self) -> bool {
        self.options.allow_editing
    }

    /// User may download the document.
    pub fn is_downloadable(&self) -> bool {
        self.options.allow_download
    }

    /// User may manage other users' annotations.
    pub fn is_admin(&self) -> bool {
        self.options.allow_admin
    }

    /// Text selection is disabled.
    pub fn is_copy_protected(&self) -> bool {
        self.options.copy_protect
    }

    /// Changes are discarded when the session ends.
    pub fn is_demo(&self) -> bool {
        self.options.demo
    }

    /// Some annotations are visible.
    pub fn annotations_visible(&self) -> bool {
        self.options.filter.is_visible()
    }

    /// Comments follow the annotation filter.
    pub fn comments_visible(&self) -> bool {
        self.annotations_visible()
    }

    /// Returns the filter selecting whose annotations are shown.
    pub fn users(&self) -> &AnnotationFilter {
        &self.options.filter
    }

    /// Sidebar mode is automatic.
    pub fn sidebar_auto(&self) -> bool {
        self.options.sidebar == SidebarMode::Auto
    }

    /// Sidebar is always shown.
    pub fn sidebar_visible(&self) -> bool {
        self.options.sidebar == SidebarMode::Visible
    }

    /// Sidebar is never shown.
    pub fn sidebar_hidden(&self) -> bool {
        self.options.sidebar == SidebarMode::Hidden
    }

    /// Sidebar starts collapsed.
    pub fn sidebar_collapsed(&self) -> bool {
        self.options.sidebar == SidebarMode::Collapsed
    }

    // ------------------------------------------------------------------------
    // Activation
    // ------------------------------------------------------------------------

    /// Requests a session key for the given user.
    ///
    /// On failure the previous activation, if any, is left untouched.
    #[instrument(skip(self, display_name), fields(uuid = %self.document_id))]
    pub async fn activate_for_user(
        &mut self,
        user_id: u64,
        display_name: &str,
    ) -> Result<&mut Self, ApiError> {
        let created_at = Utc::now();
        let user = format!("{user_id},{display_name}");

        let mut request = ApiRequest::post(api::SESSION_CREATE_ENDPOINT);
        for (key, value) in self.options.to_params() {
            request = request.param(key, value);
        }
        let request = request
            .param("user", &user)
            .param("uuid", &self.document_id);

        let reply: SessionCreateResponse = self.client.execute(request).await?.json()?;
        let key = reply.into_key().inspect_err(|e| {
            warn!(error = %e, "Session refused");
        })?;

        if self.activation.is_some() {
            info!("Replacing previous session key");
        }
        info!(user_id, "Session activated");
        self.activation = Some(SessionActivation {
            key,
            created_at,
            user: Some(user),
        });
        Ok(self)
    }

    /// Returns true once a key has been obtained.
    ///
    /// Says nothing about expiry; see [`Self::is_expired`].
    pub fn is_valid(&self) -> bool {
        self.activation.is_some()
    }

    fn activation(&self) -> Result<&SessionActivation, CoreError> {
        self.activation.as_ref().ok_or(CoreError::SessionNotActivated)
    }

    /// Returns the session key.
    pub fn key(&self) -> Result<&str, CoreError> {
        Ok(&self.activation()?.key)
    }

    /// Returns when the session was activated.
    pub fn created_at(&self) -> Result<DateTime<Utc>, CoreError> {
        Ok(self.activation()?.created_at)
    }

    /// Returns the estimated whole seconds left; negative once expired.
    pub fn seconds_remaining(&self) -> Result<i64, CoreError> {
        Ok(self.activation()?.seconds_remaining_at(Utc::now()))
    }

    /// Returns true once the hour has passed.
    pub fn is_expired(&self) -> Result<bool, CoreError> {
        Ok(self.activation()?.is_expired_at(Utc::now()))
    }

    /// Returns the viewer URL for this session.
    pub fn viewing_url(&self) -> Result<String, CoreError> {
        Ok(self.client.viewing_url(self.key()?))
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Returns the serializable form of an activated session.
    pub fn to_record(&self) -> Result<SessionRecord, CoreError> {
        Ok(SessionRecord::new(
            self.document_id.clone(),
            self.options.clone(),
            self.activation()?,
        ))
    }

    /// Serializes an activated session to JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        self.to_record()?.to_json()
    }

    /// Restores a session from its record.
    pub fn from_record(client: &CrocodocClient, record: SessionRecord) -> Self {
        let activation = record.activation();
        Self {
            client: client.clone(),
            document_id: record.uuid,
            options: record.options,
            activation: Some(activation),
        }
    }

    /// Restores a session from JSON produced by [`Self::to_json`].
    pub fn from_json(client: &CrocodocClient, data: &str) -> Result<Self, CoreError> {
        Ok(Self::from_record(client, SessionRecord::from_json(data)?))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;

    fn session(options: SessionOptions) -> ViewingSession {
        let client = CrocodocClient::new(ClientConfig::new("123456")).unwrap();
        let document = client.document("8e5b0721-26c4-11df-b354-002170de47d3").unwrap();
        document.create_viewing_session(options)
    }

    #[test]
    fn test_unactivated_accessors_fail() {
        let session = session(SessionOptions::default());
        assert!(!session.is_valid());
        assert!(matches!(session.key(), Err(CoreError::SessionNotActivated)));
        assert!(matches!(session.created_at(), Err(CoreError::SessionNotActivated)));
        assert!(matches!(session.seconds_remaining(), Err(CoreError::SessionNotActivated)));
        assert!(matches!(session.is_expired(), Err(CoreError::SessionNotActivated)));
        assert!(session.viewing_url().is_err());
        assert!(session.to_json().is_err());
    }

    #[test]
    fn test_option_queries() {
        let session = session(
            SessionOptions::new()
                .editable(true)
                .downloadable(true)
                .sidebar(SidebarMode::Collapsed)
                .filter(AnnotationFilter::users([3, 1])),
        );
        assert!(session.is_editable());
        assert!(session.is_downloadable());
        assert!(!session.is_admin());
        assert!(session.is_copy_protected());
        assert!(session.sidebar_collapsed());
        assert!(!session.sidebar_auto());
        assert!(session.annotations_visible());
        assert!(session.comments_visible());
        assert_eq!(session.users(), &AnnotationFilter::users([1, 3]));
    }

    #[test]
    fn test_default_session_hides_annotations() {
        let session = session(SessionOptions::default());
        assert!(!session.annotations_visible());
        assert!(!session.users().is_visible());
        assert!(session.sidebar_auto());
    }

    #[test]
    fn test_restored_session_is_activated() {
        let client = CrocodocClient::new(ClientConfig::new("123456")).unwrap();
        let json = format!(
            r#"{{"uuid":"abc","key":"session-key","creation_time":"{}"}}"#,
            Utc::now().to_rfc3339()
        );
        let restored = ViewingSession::from_json(&client, &json).unwrap();

        assert_eq!(restored.document_id(), "abc");
        assert_eq!(restored.key().unwrap(), "session-key");
        assert!(restored.is_valid());
        assert!(!restored.is_expired().unwrap());
        assert!(restored.seconds_remaining().unwrap() > 3590);
        assert_eq!(
            restored.viewing_url().unwrap(),
            "https://crocodoc.com/view/session-key"
        );
    }
}
