// Validation-specific error types
// These errors name the offending input's position so the UI can
// surface a blocking message before any mutation happens

use std::fmt;

use thiserror::Error;

use crate::{DeckError, ErrorCode, ErrorDomain};

/// Validation error codes
pub mod codes {
    use crate::ErrorCode;

    // Validation error codes start with 3000
    pub const MALFORMED_PREMISE: ErrorCode = ErrorCode(3001);
    pub const MALFORMED_CONCLUSION: ErrorCode = ErrorCode(3002);
    pub const UNCLOSED_FORMULA: ErrorCode = ErrorCode(3003);
}

/// Which input a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FormulaRole {
    Premise,
    Conclusion,
}

impl fmt::Display for FormulaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaRole::Premise => write!(f, "premise"),
            FormulaRole::Conclusion => write!(f, "conclusion"),
        }
    }
}

fn fmt_unclosed(role: &FormulaRole, index: &Option<usize>) -> String {
    match (role, index) {
        (FormulaRole::Premise, Some(i)) => format!("premise {} is not closed", i),
        _ => format!("the {} is not closed", role),
    }
}

/// Errors raised by the pre-submission validation gate.
///
/// Premise indices are 1-based, matching what the user sees.
#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    /// A premise segment failed to parse as a WFF
    #[error("premise {index}, {text}, is not well formed")]
    MalformedPremise { index: usize, text: String },

    /// The conclusion failed to parse as a WFF
    #[error("the conclusion {text} is not well formed")]
    MalformedConclusion { text: String },

    /// A formula contains free variables in predicate mode
    #[error("{}", fmt_unclosed(.role, .index))]
    UnclosedFormula {
        role: FormulaRole,
        index: Option<usize>,
    },
}

impl DeckError for ValidationError {
    fn code(&self) -> ErrorCode {
        use codes::*;
        match self {
            ValidationError::MalformedPremise { .. } => MALFORMED_PREMISE,
            ValidationError::MalformedConclusion { .. } => MALFORMED_CONCLUSION,
            ValidationError::UnclosedFormula { .. } => UNCLOSED_FORMULA,
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Validation
    }

    fn user_facing(&self) -> bool {
        true
    }
}

/// Convenient Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclosed_messages_name_the_position() {
        let premise = ValidationError::UnclosedFormula {
            role: FormulaRole::Premise,
            index: Some(2),
        };
        assert_eq!(premise.to_string(), "premise 2 is not closed");

        let conclusion = ValidationError::UnclosedFormula {
            role: FormulaRole::Conclusion,
            index: None,
        };
        assert_eq!(conclusion.to_string(), "the conclusion is not closed");
    }
}
