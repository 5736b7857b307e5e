// Export-specific error types

use thiserror::Error;

use crate::{DeckError, ErrorCode, ErrorDomain};

/// Export error codes
pub mod codes {
    use crate::ErrorCode;

    // Export error codes start with 5000
    pub const EMPTY_DATASET: ErrorCode = ErrorCode(5001);
}

/// Errors raised by the CSV exporter
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    /// Zero records were given; header-only output is never emitted
    #[error("no records to export")]
    EmptyDataset,
}

impl DeckError for ExportError {
    fn code(&self) -> ErrorCode {
        use codes::*;
        match self {
            ExportError::EmptyDataset => EMPTY_DATASET,
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Export
    }
}

/// Convenient Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
