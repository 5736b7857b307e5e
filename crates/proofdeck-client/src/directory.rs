//! Section, roster, and assignment administration.
//!
//! Every operation round-trips immediately; nothing here is cached beyond
//! what the catalog keeps. Operations with a required ordering await their
//! steps internally, so callers cannot race them.

use std::sync::Arc;

use log::{debug, warn};
use serde_json::{json, Value};

use proofdeck_error::{CatalogError, Error, Result, TransportError};
use proofdeck_types::{Assignment, AssignmentUpdate, Proof, ProofId, Roster, Section};

use crate::catalog::ProofCatalog;
use crate::dispatch::{decode_value, RequestDispatcher};

/// Admin-facing directory operations
pub struct SectionDirectory {
    /// Backend access
    dispatcher: Arc<RequestDispatcher>,

    /// Metadata cache shared with the rest of the client
    catalog: Arc<ProofCatalog>,
}

impl SectionDirectory {
    /// Create a directory over a dispatcher and catalog
    pub fn new(dispatcher: Arc<RequestDispatcher>, catalog: Arc<ProofCatalog>) -> Self {
        Self {
            dispatcher,
            catalog,
        }
    }

    //-------------------------------------------------------------------------
    // Sections and Rosters
    //-------------------------------------------------------------------------

    /// Create a section owned by the signed-in instructor
    pub async fn add_section(&self, name: &str) -> Result<()> {
        self.dispatcher
            .post("add-section", json!({ "sectionName": name }))
            .await?;
        Ok(())
    }

    /// Create a section and enroll its initial roster.
    ///
    /// The section insert must land before the roster insert or the
    /// backend rejects the roster rows; both awaits happen here, in
    /// order, so callers cannot reorder them.
    pub async fn create_section_with_roster(
        &self,
        name: &str,
        student_emails: &[String],
    ) -> Result<()> {
        self.add_section(name).await?;
        if !student_emails.is_empty() {
            self.add_roster(name, student_emails).await?;
        }
        Ok(())
    }

    /// Enroll students into an existing section
    pub async fn add_roster(&self, section_name: &str, student_emails: &[String]) -> Result<()> {
        let response = self
            .dispatcher
            .post(
                "add-roster",
                json!({
                    "sectionName": section_name,
                    "studentEmails": student_emails,
                }),
            )
            .await?;
        debug!("roster updated: {response}");
        Ok(())
    }

    /// Drop a section and everything enrolled in it
    pub async fn remove_section(&self, name: &str) -> Result<()> {
        self.dispatcher
            .post("remove-section", json!({ "sectionName": name }))
            .await?;
        Ok(())
    }

    /// Drop one student from a section
    pub async fn remove_from_roster(&self, section_name: &str, user_email: &str) -> Result<()> {
        self.dispatcher
            .post(
                "remove-from-roster",
                json!({
                    "sectionName": section_name,
                    "userEmail": user_email,
                }),
            )
            .await?;
        Ok(())
    }

    /// The roster of one section
    pub async fn roster(&self, section_name: &str) -> Result<Vec<Roster>> {
        let value = self
            .dispatcher
            .get("roster", json!({ "sectionName": section_name }))
            .await?;
        Ok(decode_value::<Option<Vec<Roster>>>(value)?.unwrap_or_default())
    }

    /// The signed-in user's sections, refreshing the catalog cache
    pub async fn sections(&self, user_email: &str) -> Result<Vec<Section>> {
        self.catalog.load_sections(user_email).await
    }

    //-------------------------------------------------------------------------
    // Assignments
    //-------------------------------------------------------------------------

    /// The assignments of one section, refreshing the catalog cache
    pub async fn assignments_by_section(&self, section_name: &str) -> Result<Vec<Assignment>> {
        self.catalog.load_assignments(section_name).await
    }

    /// One assignment by name, freshly loaded
    pub async fn assignment_details(
        &self,
        section_name: &str,
        assignment_name: &str,
    ) -> Result<Assignment> {
        let assignments = self.catalog.load_assignments(section_name).await?;
        assignments
            .into_iter()
            .find(|a| a.name == assignment_name)
            .ok_or_else(|| {
                Error::Catalog(CatalogError::not_found("assignment", assignment_name))
            })
    }

    /// Create an assignment in a section
    pub async fn add_assignment(&self, section_name: &str, name: &str) -> Result<()> {
        self.dispatcher
            .post(
                "add-assignment",
                json!({ "sectionName": section_name, "name": name }),
            )
            .await?;
        Ok(())
    }

    /// Remove an assignment from a section
    pub async fn remove_assignment(&self, section_name: &str, name: &str) -> Result<()> {
        self.dispatcher
            .post(
                "remove-assignment",
                json!({ "sectionName": section_name, "name": name }),
            )
            .await?;
        Ok(())
    }

    /// Replace an assignment's name, proof list, and visibility
    pub async fn update_assignment(&self, update: &AssignmentUpdate) -> Result<()> {
        let body = serde_json::to_value(update)
            .map_err(|e| Error::Transport(TransportError::decode(e)))?;
        self.dispatcher.post("update-assignment", body).await?;
        Ok(())
    }

    /// Append a proof to an assignment's list and push the update
    pub async fn add_proof_to_assignment(
        &self,
        section_name: &str,
        assignment_name: &str,
        proof_id: &ProofId,
    ) -> Result<()> {
        let assignment = self.assignment_details(section_name, assignment_name).await?;

        let mut ids = proof_indices(&assignment);
        ids.push(numeric_id(proof_id)?);

        self.update_assignment(&replacement(section_name, &assignment, ids, assignment.visibility))
            .await
    }

    /// Remove a proof from an assignment's list and push the update.
    ///
    /// Removing a proof the assignment does not contain surfaces a
    /// not-found error instead of silently no-opping.
    pub async fn remove_proof_from_assignment(
        &self,
        section_name: &str,
        assignment_name: &str,
        proof_id: &ProofId,
    ) -> Result<()> {
        let assignment = self.assignment_details(section_name, assignment_name).await?;

        let target = numeric_id(proof_id)?;
        let mut ids = proof_indices(&assignment);
        let before = ids.len();
        ids.retain(|id| *id != target);
        if ids.len() == before {
            return Err(Error::Catalog(CatalogError::not_found(
                "assignment proof",
                proof_id.as_str(),
            )));
        }

        self.update_assignment(&replacement(section_name, &assignment, ids, assignment.visibility))
            .await
    }

    /// Apply per-assignment visibility decisions, one update each, in order
    pub async fn publish_assignments(
        &self,
        section_name: &str,
        decisions: &[(String, bool)],
    ) -> Result<()> {
        for (assignment_name, visible) in decisions {
            let assignment = self.assignment_details(section_name, assignment_name).await?;
            let ids = proof_indices(&assignment);
            self.update_assignment(&replacement(section_name, &assignment, ids, *visible))
                .await?;
        }
        Ok(())
    }

    //-------------------------------------------------------------------------
    // Admin Result Feeds
    //-------------------------------------------------------------------------

    /// The signed-in admin's published arguments.
    ///
    /// The backend wraps this list in an extra JSON string encoding; both
    /// the wrapped and plain forms decode here.
    pub async fn user_arguments(&self) -> Result<Vec<Proof>> {
        let value = self.dispatcher.get("arguments-by-user", json!({})).await?;

        match value {
            Value::String(wrapped) => serde_json::from_str(&wrapped)
                .map_err(|e| Error::Transport(TransportError::decode(e))),
            other => Ok(decode_value::<Option<Vec<Proof>>>(other)?.unwrap_or_default()),
        }
    }

    /// Completed proofs across one section
    pub async fn completed_proofs_by_section(&self, section_name: &str) -> Result<Vec<Proof>> {
        let value = self
            .dispatcher
            .get(
                "completed-proofs-by-section",
                json!({ "sectionName": section_name }),
            )
            .await?;
        Ok(decode_value::<Option<Vec<Proof>>>(value)?.unwrap_or_default())
    }

    /// Completed proofs for one assignment
    pub async fn completed_proofs_by_assignment(
        &self,
        section_name: &str,
        assignment_name: &str,
    ) -> Result<Vec<Proof>> {
        let value = self
            .dispatcher
            .get(
                "completed-proofs-by-assignment",
                json!({
                    "sectionName": section_name,
                    "assignmentName": assignment_name,
                }),
            )
            .await?;
        Ok(decode_value::<Option<Vec<Proof>>>(value)?.unwrap_or_default())
    }
}

/// The backend requires integer id lists on update; non-numeric ids
/// cannot have come from it and are dropped with a warning.
fn proof_indices(assignment: &Assignment) -> Vec<i64> {
    assignment
        .proof_ids()
        .iter()
        .filter_map(|id| {
            let index = id.to_index();
            if index.is_none() {
                warn!("skipping non-numeric proof id {id} in assignment {}", assignment.name);
            }
            index
        })
        .collect()
}

fn numeric_id(proof_id: &ProofId) -> Result<i64> {
    proof_id.to_index().ok_or_else(|| {
        Error::Transport(TransportError::decode(format!(
            "non-numeric proof id {proof_id}"
        )))
    })
}

fn replacement(
    section_name: &str,
    assignment: &Assignment,
    updated_proof_ids: Vec<i64>,
    updated_visibility: bool,
) -> AssignmentUpdate {
    AssignmentUpdate {
        section_name: section_name.to_string(),
        current_name: assignment.name.clone(),
        updated_name: assignment.name.clone(),
        updated_proof_ids,
        updated_visibility,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockIdentityProvider, MockTransport};
    use crate::session::TokenGuard;

    fn directory_with(transport: Arc<MockTransport>) -> SectionDirectory {
        let provider = Arc::new(MockIdentityProvider::signed_in(
            "teacher@example.edu",
            "Teacher",
        ));
        let dispatcher = Arc::new(RequestDispatcher::new(
            Arc::new(TokenGuard::new(provider)),
            transport,
        ));
        let catalog = Arc::new(ProofCatalog::new(dispatcher.clone()));
        SectionDirectory::new(dispatcher, catalog)
    }

    fn week_three() -> Value {
        json!([{
            "name": "Week 3",
            "proofList": [
                {"Id": 4, "ProofName": "MP practice", "Premise": [], "Logic": ["[]"], "Rules": []}
            ],
            "visibility": "true"
        }])
    }

    #[tokio::test]
    async fn section_insert_lands_before_the_roster_insert() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(json!({"success": "true"}));
        transport.push_response(json!({"success": "true"}));

        let directory = directory_with(transport.clone());
        directory
            .create_section_with_roster("S1", &["a@x.edu".to_string(), "b@x.edu".to_string()])
            .await
            .unwrap();

        let paths: Vec<String> = transport.requests().iter().map(|r| r.path.clone()).collect();
        assert_eq!(paths, vec!["add-section", "add-roster"]);
        assert_eq!(
            transport.requests()[1].payload["studentEmails"],
            json!(["a@x.edu", "b@x.edu"])
        );
    }

    #[tokio::test]
    async fn empty_rosters_skip_the_roster_insert() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(json!({"success": "true"}));

        let directory = directory_with(transport.clone());
        directory.create_section_with_roster("S1", &[]).await.unwrap();

        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn adding_a_proof_replays_the_full_assignment_state() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(week_three());
        transport.push_response(json!({"success": "true"}));

        let directory = directory_with(transport.clone());
        directory
            .add_proof_to_assignment("S1", "Week 3", &ProofId::from("9"))
            .await
            .unwrap();

        let update = &transport.requests()[1];
        assert_eq!(update.path, "update-assignment");
        assert_eq!(update.payload["updatedProofIds"], json!([4, 9]));
        assert_eq!(update.payload["updatedVisibility"], "true");
        assert_eq!(update.payload["currentName"], "Week 3");
    }

    #[tokio::test]
    async fn removing_an_absent_proof_surfaces_not_found() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(week_three());

        let directory = directory_with(transport.clone());
        let result = directory
            .remove_proof_from_assignment("S1", "Week 3", &ProofId::from("9"))
            .await;

        assert!(matches!(
            result,
            Err(Error::Catalog(CatalogError::NotFound { .. }))
        ));
        // No update round-trip happened
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn publish_updates_each_decided_assignment() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(week_three());
        transport.push_response(json!({"success": "true"}));

        let directory = directory_with(transport.clone());
        directory
            .publish_assignments("S1", &[("Week 3".to_string(), false)])
            .await
            .unwrap();

        let update = &transport.requests()[1];
        assert_eq!(update.payload["updatedVisibility"], "false");
        assert_eq!(update.payload["updatedProofIds"], json!([4]));
    }

    #[tokio::test]
    async fn user_arguments_unwrap_the_double_encoding() {
        let transport = Arc::new(MockTransport::new());
        let wrapped = serde_json::to_string(&json!([
            {"Id": 7, "ProofName": "Repository - LEM", "Premise": [], "Logic": ["[]"], "Rules": []}
        ]))
        .unwrap();
        transport.push_response(Value::String(wrapped));

        let directory = directory_with(transport);
        let arguments = directory.user_arguments().await.unwrap();
        assert_eq!(arguments.len(), 1);
        assert_eq!(arguments[0].name, "Repository - LEM");
    }
}
