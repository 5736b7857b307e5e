// Proofdeck Error Handling Framework
// Central location for error types, traits, and handling utilities

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

// Re-export common error handling tools for convenience
pub use anyhow;
pub use thiserror;

// Module structure
mod auth;
mod catalog;
mod export;
mod transport;
mod validation;

// Public exports (Consolidated)
pub use auth::{AuthError, AuthResult};
pub use catalog::{CatalogError, CatalogResult};
pub use export::{ExportError, ExportResult};
pub use transport::{TransportError, TransportResult};
pub use validation::{FormulaRole, ValidationError, ValidationResult};

/// Error domains representing different components of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorDomain {
    Auth,
    Transport,
    Validation,
    Catalog,
    Export,
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDomain::Auth => write!(f, "auth"),
            ErrorDomain::Transport => write!(f, "transport"),
            ErrorDomain::Validation => write!(f, "validation"),
            ErrorDomain::Catalog => write!(f, "catalog"),
            ErrorDomain::Export => write!(f, "export"),
        }
    }
}

/// Error code structure for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ErrorCode(pub u32);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Base trait for all errors in the proofdeck client.
pub trait DeckError: StdError + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Returns the stable numeric code for this error.
    fn code(&self) -> ErrorCode;

    /// Returns the domain this error belongs to.
    fn domain(&self) -> ErrorDomain;

    /// Whether the error must be surfaced to the user before any mutation
    /// proceeds (authentication and validation failures are; transport
    /// failures are not).
    fn user_facing(&self) -> bool {
        false
    }

    /// Indicates if the error is temporary and retrying might succeed.
    fn is_transient(&self) -> bool {
        false
    }
}

/// Umbrella error for the whole pipeline
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl DeckError for Error {
    fn code(&self) -> ErrorCode {
        match self {
            Error::Auth(e) => e.code(),
            Error::Transport(e) => e.code(),
            Error::Validation(e) => e.code(),
            Error::Catalog(e) => e.code(),
            Error::Export(e) => e.code(),
        }
    }

    fn domain(&self) -> ErrorDomain {
        match self {
            Error::Auth(e) => e.domain(),
            Error::Transport(e) => e.domain(),
            Error::Validation(e) => e.domain(),
            Error::Catalog(e) => e.domain(),
            Error::Export(e) => e.domain(),
        }
    }

    fn user_facing(&self) -> bool {
        match self {
            Error::Auth(e) => e.user_facing(),
            Error::Transport(e) => e.user_facing(),
            Error::Validation(e) => e.user_facing(),
            Error::Catalog(e) => e.user_facing(),
            Error::Export(e) => e.user_facing(),
        }
    }

    fn is_transient(&self) -> bool {
        match self {
            Error::Auth(e) => e.is_transient(),
            Error::Transport(e) => e.is_transient(),
            Error::Validation(e) => e.is_transient(),
            Error::Catalog(e) => e.is_transient(),
            Error::Export(e) => e.is_transient(),
        }
    }
}

/// Standard Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Standard error message format for serialization
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorMessage {
    pub code: ErrorCode,
    pub domain: ErrorDomain,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorMessage {
    /// Capture an error into the serializable message format
    pub fn from_error(err: &dyn DeckError) -> Self {
        Self {
            code: err.code(),
            domain: err.domain(),
            message: err.to_string(),
            details: None,
        }
    }
}
