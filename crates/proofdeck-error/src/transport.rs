// Transport-specific error types
// These errors cover the HTTP boundary between client and backend

use thiserror::Error;

use crate::{DeckError, ErrorCode, ErrorDomain};

/// Transport error codes
pub mod codes {
    use crate::ErrorCode;

    // Transport error codes start with 2000
    pub const NETWORK: ErrorCode = ErrorCode(2001);
    pub const STATUS: ErrorCode = ErrorCode(2002);
    pub const DECODE: ErrorCode = ErrorCode(2003);
}

/// Errors raised when a backend round-trip fails.
///
/// Response bodies are logged at the dispatch boundary, not carried here;
/// callers only see the status class and must treat the absence of a value
/// as failure.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The request never produced an HTTP response
    #[error("network failure: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status
    #[error("backend returned status {status}")]
    Status { status: u16 },

    /// The response body was not the expected JSON document
    #[error("unable to decode response body: {0}")]
    Decode(String),
}

impl DeckError for TransportError {
    fn code(&self) -> ErrorCode {
        use codes::*;
        match self {
            TransportError::Network(_) => NETWORK,
            TransportError::Status { .. } => STATUS,
            TransportError::Decode(_) => DECODE,
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Transport
    }

    fn is_transient(&self) -> bool {
        match self {
            TransportError::Network(_) => true,
            TransportError::Status { status } => *status >= 500,
            TransportError::Decode(_) => false,
        }
    }
}

/// Convenient Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

impl TransportError {
    /// Create a network failure from any displayable cause
    pub fn network(cause: impl std::fmt::Display) -> Self {
        TransportError::Network(cause.to_string())
    }

    /// Create a decode failure from any displayable cause
    pub fn decode(cause: impl std::fmt::Display) -> Self {
        TransportError::Decode(cause.to_string())
    }
}
