//! Proof records and the legacy body encoding.
//!
//! A proof travels with its body JSON-encoded inside a single-element
//! `Logic` array. That encoding predates subproof nesting and is kept for
//! wire compatibility; the client decodes it into a typed [`ProofBody`]
//! immediately at the boundary and never works with the blob directly.

use serde::{Deserialize, Serialize};

use crate::wire::{self, ProofId, WireError};

/// Justification tag marking a line as a premise
pub const PREMISE_JUSTIFICATION: &str = "Pr";

//-----------------------------------------------------------------------------
// Classification
//-----------------------------------------------------------------------------

/// Classification of a saved record: a private proof or a published argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Proof,
    Argument,
}

impl Default for EntryType {
    fn default() -> Self {
        EntryType::Proof
    }
}

/// The logic a proof is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofType {
    /// Propositional / truth-functional logic
    #[serde(rename = "prop")]
    Prop,

    /// First-order (predicate) logic
    #[serde(rename = "fol")]
    Fol,
}

impl ProofType {
    /// Whether the closure check applies to formulas of this logic
    pub fn is_predicate(&self) -> bool {
        matches!(self, ProofType::Fol)
    }
}

impl Default for ProofType {
    fn default() -> Self {
        ProofType::Prop
    }
}

//-----------------------------------------------------------------------------
// Proof Body
//-----------------------------------------------------------------------------

/// One line of a proof as the editor produces it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofLine {
    /// The formula on this line
    #[serde(rename = "wffstr")]
    pub wff: String,

    /// Justification tag ("Pr" for premises, rule names otherwise)
    #[serde(rename = "jstr")]
    pub justification: String,
}

impl ProofLine {
    /// Create a premise line
    pub fn premise(wff: impl Into<String>) -> Self {
        ProofLine {
            wff: wff.into(),
            justification: PREMISE_JUSTIFICATION.to_string(),
        }
    }

    /// Whether this line is a premise
    pub fn is_premise(&self) -> bool {
        self.justification == PREMISE_JUSTIFICATION
    }
}

/// The typed form of a proof's line list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofBody {
    lines: Vec<ProofLine>,
}

impl ProofBody {
    /// Build a body from editor lines
    pub fn new(lines: Vec<ProofLine>) -> Self {
        ProofBody { lines }
    }

    /// The lines in editor order
    pub fn lines(&self) -> &[ProofLine] {
        &self.lines
    }

    /// Formula strings of all premise lines, in order
    pub fn premises(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter(|line| line.is_premise())
            .map(|line| line.wff.clone())
            .collect()
    }

    /// Decode the legacy single-element `Logic` encoding.
    ///
    /// The invariant is exactly one element; zero or several is a
    /// malformed record, not an empty body.
    pub fn from_logic(logic: &[String]) -> Result<Self, WireError> {
        match logic {
            [blob] => {
                let lines: Vec<ProofLine> = serde_json::from_str(blob)?;
                Ok(ProofBody { lines })
            }
            other => Err(WireError::LogicArity(other.len())),
        }
    }

    /// Encode into the single-element `Logic` form
    pub fn to_logic(&self) -> Result<Vec<String>, WireError> {
        Ok(vec![serde_json::to_string(&self.lines)?])
    }
}

//-----------------------------------------------------------------------------
// Proof Record
//-----------------------------------------------------------------------------

/// A proof record as the backend stores it.
///
/// Field names and the stringly booleans follow the backend schema.
/// `UserSubmitted` and `TimeSubmitted` are assigned server-side and
/// ignored on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proof {
    /// Backend-assigned id; empty until first save
    #[serde(rename = "Id", default, skip_serializing_if = "ProofId::is_empty")]
    pub id: ProofId,

    /// "proof" or "argument"
    #[serde(rename = "EntryType", default)]
    pub entry_type: EntryType,

    /// Submitting user's email, set by the backend from the token
    #[serde(rename = "UserSubmitted", default, skip_serializing_if = "String::is_empty")]
    pub user_submitted: String,

    /// User-chosen name; repository problems start with "Repository - "
    #[serde(rename = "ProofName")]
    pub name: String,

    /// "prop" or "fol"
    #[serde(rename = "ProofType", default)]
    pub proof_type: ProofType,

    /// Premises of the proof; an array of WFFs
    #[serde(rename = "Premise", default)]
    pub premises: Vec<String>,

    /// Body of the proof; a single JSON-encoded line list
    #[serde(rename = "Logic", default)]
    pub logic: Vec<String>,

    /// Deprecated; always empty, kept for schema compatibility
    #[serde(rename = "Rules", default)]
    pub rules: Vec<String>,

    /// Whether this proof was ever completed by the user
    #[serde(rename = "EverCompleted", default, with = "wire::bool_string")]
    pub ever_completed: bool,

    /// Whether the submitted attempt is complete
    #[serde(rename = "ProofCompleted", default, with = "wire::completion_string")]
    pub completed: bool,

    /// Conclusion of the proof
    #[serde(rename = "Conclusion", default)]
    pub conclusion: String,

    /// Whether the proof is published to the shared repository
    #[serde(rename = "RepoProblem", default, with = "wire::bool_string")]
    pub repo_problem: bool,

    /// Submission timestamp, set by the backend
    #[serde(rename = "TimeSubmitted", default, skip_serializing_if = "String::is_empty")]
    pub time_submitted: String,
}

impl Proof {
    /// Decode the typed body from the legacy `Logic` encoding
    pub fn body(&self) -> Result<ProofBody, WireError> {
        ProofBody::from_logic(&self.logic)
    }
}

//-----------------------------------------------------------------------------
// Repository Feed
//-----------------------------------------------------------------------------

/// One record of the repository feed: a section name and its proofs.
///
/// The feed is append-only; the same section name may recur later in the
/// list and is not coalesced by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionProofs {
    /// Section the proofs belong to
    #[serde(rename = "SectionName")]
    pub section_name: String,

    /// Proofs in feed order
    #[serde(rename = "ProofList", default)]
    pub proof_list: Vec<Proof>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lines() -> Vec<ProofLine> {
        vec![
            ProofLine::premise("P -> Q"),
            ProofLine::premise("P"),
            ProofLine {
                wff: "Q".to_string(),
                justification: "MP 1,2".to_string(),
            },
        ]
    }

    #[test]
    fn body_round_trips_through_logic_blob() {
        let body = ProofBody::new(sample_lines());
        let logic = body.to_logic().unwrap();
        assert_eq!(logic.len(), 1);

        let back = ProofBody::from_logic(&logic).unwrap();
        assert_eq!(back, body);
        assert_eq!(back.premises(), vec!["P -> Q", "P"]);
    }

    #[test]
    fn logic_arity_is_enforced() {
        assert!(matches!(
            ProofBody::from_logic(&[]),
            Err(WireError::LogicArity(0))
        ));

        let blob = serde_json::to_string(&sample_lines()).unwrap();
        assert!(matches!(
            ProofBody::from_logic(&[blob.clone(), blob]),
            Err(WireError::LogicArity(2))
        ));
    }

    #[test]
    fn proof_record_uses_backend_field_names() {
        let body = ProofBody::new(sample_lines());
        let proof = Proof {
            id: ProofId::default(),
            entry_type: EntryType::Proof,
            user_submitted: String::new(),
            name: "Modus Ponens".to_string(),
            proof_type: ProofType::Prop,
            premises: body.premises(),
            logic: body.to_logic().unwrap(),
            rules: Vec::new(),
            ever_completed: false,
            completed: true,
            conclusion: "Q".to_string(),
            repo_problem: false,
            time_submitted: String::new(),
        };

        let value = serde_json::to_value(&proof).unwrap();
        assert_eq!(value["EntryType"], "proof");
        assert_eq!(value["ProofCompleted"], "true");
        assert_eq!(value["RepoProblem"], "false");
        // Backend-owned fields are not sent while unset
        assert!(value.get("Id").is_none());
        assert!(value.get("UserSubmitted").is_none());
    }

    #[test]
    fn response_records_decode_with_numeric_ids() {
        let json = r#"{
            "Id": 7,
            "EntryType": "argument",
            "UserSubmitted": "teacher@example.edu",
            "ProofName": "Repository - Hypothetical Syllogism",
            "ProofType": "fol",
            "Premise": ["Ax(F(x) -> G(x))"],
            "Logic": ["[]"],
            "Rules": [],
            "EverCompleted": "true",
            "ProofCompleted": "error",
            "Conclusion": "F(a) -> G(a)",
            "RepoProblem": "true",
            "TimeSubmitted": "2024-02-11 09:30:00"
        }"#;

        let proof: Proof = serde_json::from_str(json).unwrap();
        assert!(proof.id.matches("7"));
        assert_eq!(proof.entry_type, EntryType::Argument);
        assert!(proof.ever_completed);
        assert!(!proof.completed);
        assert!(proof.repo_problem);
    }
}
