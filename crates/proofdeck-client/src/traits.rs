//! Interfaces for the external collaborators.
//!
//! The identity provider and the formula parser are services the pipeline
//! consumes but does not implement. They are injected by reference, never
//! reached through ambient globals.
//!
//! ## Trait Organization
//!
//! * **Identity**: session state and token issuance (`IdentityProvider`)
//! * **Formulas**: normalization and well-formedness (`FormulaParser`)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use proofdeck_error::AuthResult;

//-----------------------------------------------------------------------------
// Identity Provider
//-----------------------------------------------------------------------------

/// Basic profile of the signed-in account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    /// Account email
    pub email: String,

    /// Display name
    pub display_name: String,
}

/// A bearer token together with its expiry instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken {
    /// The token string sent in `X-Auth-Token`
    pub token: String,

    /// When the token stops being valid
    pub expires_at: DateTime<Utc>,
}

/// The identity service that signs users in and issues tokens.
///
/// Implementations adapt a concrete provider SDK. `refresh` is the only
/// suspension point; the cached accessors are synchronous reads of
/// provider state.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Whether an identity session currently exists
    fn is_signed_in(&self) -> bool;

    /// Profile of the signed-in account, if any
    fn profile(&self) -> Option<IdentityProfile>;

    /// The last issued token, if any
    fn cached_token(&self) -> Option<BearerToken>;

    /// Request a newly issued token from the provider
    async fn refresh(&self) -> AuthResult<BearerToken>;
}

//-----------------------------------------------------------------------------
// Formula Parser
//-----------------------------------------------------------------------------

/// Result of parsing one formula string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFormula {
    /// Canonical rendering of the formula
    pub rendered: String,

    /// Free variables, empty for closed formulas
    pub free_variables: Vec<String>,
}

impl ParsedFormula {
    /// Whether the formula has no free variables
    pub fn is_closed(&self) -> bool {
        self.free_variables.is_empty()
    }
}

/// The external well-formedness checker.
///
/// Parsing is synchronous; the service is a library call, not a network
/// round-trip.
pub trait FormulaParser: Send + Sync {
    /// Clean up raw input before parsing (connective aliases, spacing)
    fn normalize(&self, raw: &str) -> String;

    /// Parse a normalized formula; `None` if it is not well formed
    fn parse(&self, text: &str) -> Option<ParsedFormula>;
}
