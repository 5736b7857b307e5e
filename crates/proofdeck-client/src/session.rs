//! Session state and the token guard.
//!
//! The token guard wraps the injected identity provider and owns the
//! [`Session`] snapshot for the current sign-in. Callers check
//! `is_expired` before every privileged call and refresh exactly once if
//! stale; there is no periodic refresh.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use proofdeck_error::{AuthError, AuthResult};
use proofdeck_types::{AdminList, Session};

use crate::traits::IdentityProvider;

/// Guard over the identity session and its token lifecycle
pub struct TokenGuard {
    /// The identity provider adapter
    provider: Arc<dyn IdentityProvider>,

    /// Snapshot for the current sign-in; rebuilt on every sign-in event
    session: Mutex<Option<Session>>,
}

impl TokenGuard {
    /// Create a guard over an identity provider
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            session: Mutex::new(None),
        }
    }

    /// Rebuild the session snapshot from the provider's current state.
    ///
    /// Called on every sign-in event. Admin standing comes from the
    /// backend's admin list, not from the provider.
    pub fn establish(&self, admins: &AdminList) -> AuthResult<Session> {
        let profile = self.provider.profile().ok_or(AuthError::NoSession)?;
        let token = self.provider.cached_token().ok_or(AuthError::NoSession)?;

        let session = Session {
            is_admin: admins.contains(&profile.email),
            email: profile.email,
            display_name: profile.display_name,
            token_expiry: token.expires_at,
        };

        *self.session.lock().expect("session lock") = Some(session.clone());
        Ok(session)
    }

    /// True iff an identity session exists
    pub fn is_authenticated(&self) -> bool {
        self.provider.is_signed_in()
    }

    /// Whether the cached token is stale.
    ///
    /// Compares the current time to the cached expiry instant; no clock
    /// skew correction. With no cached expiry at all the token counts as
    /// stale.
    pub fn is_expired(&self) -> bool {
        let guard = self.session.lock().expect("session lock");
        let expiry = guard
            .as_ref()
            .map(|s| s.token_expiry)
            .or_else(|| self.provider.cached_token().map(|t| t.expires_at));

        match expiry {
            Some(expiry) => Utc::now() > expiry,
            None => true,
        }
    }

    /// The cached bearer token
    pub fn current_token(&self) -> AuthResult<String> {
        self.provider
            .cached_token()
            .map(|t| t.token)
            .ok_or(AuthError::NoSession)
    }

    /// Request a newly issued token and update the cached expiry instant
    pub async fn refresh(&self) -> AuthResult<String> {
        let token = self.provider.refresh().await?;

        let mut guard = self.session.lock().expect("session lock");
        if let Some(session) = guard.as_mut() {
            session.token_expiry = token.expires_at;
        }

        Ok(token.token)
    }

    /// The current session snapshot, if established
    pub fn session(&self) -> Option<Session> {
        self.session.lock().expect("session lock").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockIdentityProvider;
    use chrono::Duration;

    #[tokio::test]
    async fn establish_builds_session_from_profile_and_admin_list() {
        let provider = Arc::new(MockIdentityProvider::signed_in(
            "teacher@example.edu",
            "Teacher",
        ));
        let guard = TokenGuard::new(provider);

        let admins = AdminList {
            admins: vec!["teacher@example.edu".to_string()],
        };
        let session = guard.establish(&admins).unwrap();
        assert!(session.is_admin);
        assert!(guard.is_authenticated());
        assert!(!guard.is_expired());
    }

    #[tokio::test]
    async fn refresh_updates_the_cached_expiry() {
        let provider = Arc::new(MockIdentityProvider::signed_in(
            "student@example.edu",
            "Student",
        ));
        provider.expire_token();
        let guard = TokenGuard::new(provider.clone());
        guard.establish(&AdminList::default()).unwrap();

        assert!(guard.is_expired());
        let refreshed = guard.refresh().await.unwrap();
        assert_eq!(refreshed, provider.current_token_string());
        assert!(!guard.is_expired());
        assert!(guard.session().unwrap().token_expiry > Utc::now() - Duration::seconds(1));
    }

    #[tokio::test]
    async fn current_token_requires_a_session() {
        let guard = TokenGuard::new(Arc::new(MockIdentityProvider::signed_out()));
        assert!(matches!(guard.current_token(), Err(AuthError::NoSession)));
        assert!(!guard.is_authenticated());
    }
}
