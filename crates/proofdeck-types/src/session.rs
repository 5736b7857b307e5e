//! The signed-in user's identity snapshot.

use chrono::{DateTime, Utc};

/// Identity snapshot for the current sign-in.
///
/// Rebuilt on every sign-in event and never persisted beyond the process
/// lifetime. The token itself stays with the identity provider; only the
/// cached expiry instant lives here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Account email
    pub email: String,

    /// Display name from the identity profile
    pub display_name: String,

    /// Whether the email appears in the backend's admin list
    pub is_admin: bool,

    /// Cached expiry instant of the current bearer token
    pub token_expiry: DateTime<Utc>,
}

impl Session {
    /// Whether the cached token is stale at `now`.
    ///
    /// No clock-skew correction is applied.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.token_expiry
    }
}
