// Authentication-specific error types
// These errors cover the identity session and token lifecycle

use thiserror::Error;

use crate::{DeckError, ErrorCode, ErrorDomain};

/// Auth error codes
pub mod codes {
    use crate::ErrorCode;

    // Auth error codes start with 1000
    pub const NO_SESSION: ErrorCode = ErrorCode(1001);
    pub const REFRESH_FAILED: ErrorCode = ErrorCode(1002);
}

/// Errors raised by the token guard and identity provider adapter
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    /// No identity session exists; the user is not signed in
    #[error("not signed in")]
    NoSession,

    /// The identity provider could not issue a fresh token
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
}

impl DeckError for AuthError {
    fn code(&self) -> ErrorCode {
        use codes::*;
        match self {
            AuthError::NoSession => NO_SESSION,
            AuthError::RefreshFailed(_) => REFRESH_FAILED,
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Auth
    }

    fn user_facing(&self) -> bool {
        true
    }
}

/// Convenient Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Create a refresh failure from any displayable cause
    pub fn refresh_failed(cause: impl std::fmt::Display) -> Self {
        AuthError::RefreshFailed(cause.to_string())
    }
}
