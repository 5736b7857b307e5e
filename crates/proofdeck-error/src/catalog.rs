// Catalog-specific error types

use thiserror::Error;

use crate::{DeckError, ErrorCode, ErrorDomain};

/// Catalog error codes
pub mod codes {
    use crate::ErrorCode;

    // Catalog error codes start with 4000
    pub const NOT_FOUND: ErrorCode = ErrorCode(4001);
}

/// Errors raised by catalog lookups
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    /// No record with the given id exists in the named bucket
    #[error("no record with id {id} in the {bucket} bucket")]
    NotFound { bucket: String, id: String },
}

impl DeckError for CatalogError {
    fn code(&self) -> ErrorCode {
        use codes::*;
        match self {
            CatalogError::NotFound { .. } => NOT_FOUND,
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Catalog
    }

    fn user_facing(&self) -> bool {
        true
    }
}

/// Convenient Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    /// Create a not-found error for a bucket/id pair
    pub fn not_found(bucket: impl Into<String>, id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            bucket: bucket.into(),
            id: id.into(),
        }
    }
}
