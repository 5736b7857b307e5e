//! Stringly-typed encodings the backend speaks.
//!
//! The backend stores booleans as the strings `"true"`/`"false"` and hands
//! out record ids that arrive sometimes as JSON numbers, sometimes as
//! strings. These helpers keep that noise at the boundary so the rest of
//! the client works with `bool` and one id type.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

//-----------------------------------------------------------------------------
// Wire Errors
//-----------------------------------------------------------------------------

/// Errors raised while decoding wire records into typed forms
#[derive(Error, Debug)]
pub enum WireError {
    /// The legacy `Logic` field must hold exactly one JSON-encoded line list
    #[error("Logic must contain exactly one element, found {0}")]
    LogicArity(usize),

    /// The body blob was not valid JSON
    #[error("malformed proof body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

//-----------------------------------------------------------------------------
// Record Ids
//-----------------------------------------------------------------------------

/// A backend-assigned record id.
///
/// Stored stringified; equality is on the string form so numeric and
/// string ids from transport compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ProofId(String);

impl ProofId {
    /// Construct from any id-like value
    pub fn new(id: impl Into<String>) -> Self {
        ProofId(id.into())
    }

    /// The stringified id
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True until the backend has assigned an id on first save
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compare against any id-like value on the stringified form
    pub fn matches(&self, other: &str) -> bool {
        self.0 == other
    }

    /// Numeric form, where the backend requires integer id lists
    pub fn to_index(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ProofId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProofId {
    fn from(id: &str) -> Self {
        ProofId(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ProofId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) => Ok(ProofId(s)),
            serde_json::Value::Number(n) => Ok(ProofId(n.to_string())),
            serde_json::Value::Null => Ok(ProofId::default()),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number id, got {}",
                other
            ))),
        }
    }
}

//-----------------------------------------------------------------------------
// String Booleans
//-----------------------------------------------------------------------------

/// Serde adapter for the backend's `"true"`/`"false"` string booleans
pub mod bool_string {
    use super::*;

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Tolerate a genuine JSON boolean alongside the stringly encoding
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Bool(b) => Ok(b),
            serde_json::Value::String(s) => Ok(s == "true"),
            serde_json::Value::Null => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected boolean string, got {}",
                other
            ))),
        }
    }
}

/// Serde adapter for `ProofCompleted`, which admits `"error"` as well.
///
/// `"error"` marks a submission the checker rejected; the client treats it
/// as not completed.
pub mod completion_string {
    use super::*;

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        bool_string::serialize(value, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        bool_string::deserialize(deserializer)
    }
}
