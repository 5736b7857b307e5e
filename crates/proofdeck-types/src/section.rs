//! Sections, rosters, and assignments.
//!
//! These records are read/write through the backend; the client never
//! mutates one without an immediate round-trip.

use serde::{Deserialize, Serialize};

use crate::proof::Proof;
use crate::wire::{self, ProofId};

//-----------------------------------------------------------------------------
// Sections and Rosters
//-----------------------------------------------------------------------------

/// A class section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section name
    #[serde(rename = "Name")]
    pub name: String,

    /// Email of the instructor who owns the section
    #[serde(rename = "InstructorEmail", default)]
    pub instructor_email: String,
}

/// One roster row: a user's membership in a section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    /// Section the row belongs to
    #[serde(rename = "SectionName")]
    pub section_name: String,

    /// Member email
    #[serde(rename = "UserEmail")]
    pub user_email: String,

    /// "student", "ta", or "instructor"
    #[serde(rename = "Role", default)]
    pub role: String,
}

//-----------------------------------------------------------------------------
// Assignments
//-----------------------------------------------------------------------------

/// An assignment as the backend reports it, with its proofs resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Assignment name
    #[serde(rename = "name")]
    pub name: String,

    /// Owning section; responses omit this, callers fill it from context
    #[serde(rename = "sectionName", default, skip_serializing_if = "String::is_empty")]
    pub section_name: String,

    /// Proofs assigned, in order
    #[serde(rename = "proofList", default)]
    pub proof_list: Vec<Proof>,

    /// Whether students can see the assignment
    #[serde(rename = "visibility", default, with = "wire::bool_string")]
    pub visibility: bool,
}

impl Assignment {
    /// The ordered proof-id references, as required for any update
    pub fn proof_ids(&self) -> Vec<ProofId> {
        self.proof_list.iter().map(|p| p.id.clone()).collect()
    }
}

/// Request body for `update-assignment`.
///
/// The backend replaces the whole record, so every update carries the
/// full name/id-list/visibility state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentUpdate {
    pub section_name: String,
    pub current_name: String,
    pub updated_name: String,
    pub updated_proof_ids: Vec<i64>,
    #[serde(with = "wire::bool_string")]
    pub updated_visibility: bool,
}

//-----------------------------------------------------------------------------
// Admin Bootstrap
//-----------------------------------------------------------------------------

/// Response of the `admins` bootstrap endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminList {
    /// Emails with administrator rights
    #[serde(rename = "Admins", default)]
    pub admins: Vec<String>,
}

impl AdminList {
    /// Whether the given email is an administrator
    pub fn contains(&self, email: &str) -> bool {
        self.admins.iter().any(|admin| admin == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_decodes_backend_response() {
        let json = r#"{
            "name": "Week 3",
            "proofList": [
                {"Id": "4", "ProofName": "MP practice", "Premise": [], "Logic": ["[]"], "Rules": []},
                {"Id": 9, "ProofName": "MT practice", "Premise": [], "Logic": ["[]"], "Rules": []}
            ],
            "visibility": "false"
        }"#;

        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert!(!assignment.visibility);
        let ids = assignment.proof_ids();
        assert!(ids[0].matches("4"));
        assert!(ids[1].matches("9"));
    }

    #[test]
    fn update_request_uses_camel_case_and_integer_ids() {
        let update = AssignmentUpdate {
            section_name: "S1".to_string(),
            current_name: "Week 3".to_string(),
            updated_name: "Week 3".to_string(),
            updated_proof_ids: vec![4, 9],
            updated_visibility: true,
        };

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["sectionName"], "S1");
        assert_eq!(value["updatedProofIds"][1], 9);
        assert_eq!(value["updatedVisibility"], "true");
    }

    #[test]
    fn admin_list_membership() {
        let admins: AdminList =
            serde_json::from_str(r#"{"Admins": ["teacher@example.edu"]}"#).unwrap();
        assert!(admins.contains("teacher@example.edu"));
        assert!(!admins.contains("student@example.edu"));
    }
}
