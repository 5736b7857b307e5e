//! Building and persisting proof records.
//!
//! The assembler turns editor state into the canonical wire record and
//! pushes it through the dispatcher. After a save the affected catalog
//! buckets reload in a fixed order, each awaited before the next, so
//! public visibility changes are reflected immediately.

use std::sync::Arc;

use log::debug;

use proofdeck_error::{Error, Result, TransportError};
use proofdeck_types::{EntryType, Proof, ProofBody, ProofId, ProofLine, ProofType};

use crate::catalog::ProofCatalog;
use crate::dispatch::RequestDispatcher;

/// Name prefix marking a proof published to the repository
pub const REPOSITORY_PREFIX: &str = "Repository - ";

/// Fallback name for unnamed proofs
const UNNAMED_PROOF: &str = "n/a";

//-----------------------------------------------------------------------------
// Classification
//-----------------------------------------------------------------------------

/// Classify a record: "argument" only for admin-published proofs.
///
/// The promotion is one-way; only visibility toggling in the UI flips it.
pub fn classify(is_admin: bool, repo_visible: bool) -> EntryType {
    if is_admin && repo_visible {
        EntryType::Argument
    } else {
        EntryType::Proof
    }
}

/// Prefix a name for repository publication. Applying this twice does not
/// double-prefix.
pub fn repository_name(name: &str) -> String {
    if name.starts_with(REPOSITORY_PREFIX) {
        name.to_string()
    } else {
        format!("{REPOSITORY_PREFIX}{name}")
    }
}

//-----------------------------------------------------------------------------
// Editor State
//-----------------------------------------------------------------------------

/// What the proof editor holds at save time
#[derive(Debug, Clone)]
pub struct EditorState {
    /// User-chosen proof name; may be empty
    pub name: String,

    /// The logic the proof is written in
    pub proof_type: ProofType,

    /// All editor lines, premises and derivations alike
    pub lines: Vec<ProofLine>,

    /// The wanted conclusion
    pub conclusion: String,

    /// Whether the proof was ever completed in an earlier attempt
    pub ever_completed: bool,

    /// Whether the current attempt is complete
    pub completed: bool,
}

/// Catalog context the record is classified against
#[derive(Debug, Clone, Copy)]
pub struct SubmissionContext {
    /// Whether the signed-in user is an administrator
    pub is_admin: bool,

    /// Whether the proof is marked repository-visible
    pub repo_visible: bool,
}

//-----------------------------------------------------------------------------
// Assembler
//-----------------------------------------------------------------------------

/// Builds canonical proof records and persists them
pub struct SubmissionAssembler {
    /// Backend access
    dispatcher: Arc<RequestDispatcher>,

    /// Catalog to reload after a save
    catalog: Arc<ProofCatalog>,
}

impl SubmissionAssembler {
    /// Create an assembler over a dispatcher and catalog
    pub fn new(dispatcher: Arc<RequestDispatcher>, catalog: Arc<ProofCatalog>) -> Self {
        Self {
            dispatcher,
            catalog,
        }
    }

    /// Build the canonical record from editor state and catalog context.
    ///
    /// Premises are the formulas of all lines justified as premises. The
    /// body goes into the single-element `Logic` encoding; `Rules` stays
    /// empty for schema compatibility.
    pub fn assemble(&self, editor: &EditorState, context: SubmissionContext) -> Result<Proof> {
        let body = ProofBody::new(editor.lines.clone());
        let logic = body
            .to_logic()
            .map_err(|e| Error::Transport(TransportError::decode(e)))?;

        let name = if editor.name.trim().is_empty() {
            UNNAMED_PROOF.to_string()
        } else {
            editor.name.clone()
        };

        Ok(Proof {
            id: ProofId::default(),
            entry_type: classify(context.is_admin, context.repo_visible),
            user_submitted: String::new(),
            name,
            proof_type: editor.proof_type,
            premises: body.premises(),
            logic,
            rules: Vec::new(),
            ever_completed: editor.ever_completed,
            completed: editor.completed,
            conclusion: editor.conclusion.clone(),
            repo_problem: context.repo_visible,
            time_submitted: String::new(),
        })
    }

    /// Persist a record, then reload the affected buckets in order:
    /// completed or user (depending on completion), then always repo.
    pub async fn save(&self, proof: &Proof) -> Result<()> {
        let record = serde_json::to_value(proof)
            .map_err(|e| Error::Transport(TransportError::decode(e)))?;

        let response = self.dispatcher.post("saveproof", record).await?;
        debug!("proof saved: {response}");

        if proof.completed {
            self.catalog.load_completed_proofs().await?;
        } else {
            self.catalog.load_user_proofs().await?;
        }
        self.catalog.load_repo_proofs().await?;

        Ok(())
    }

    /// Assemble and persist in one step
    pub async fn submit(
        &self,
        editor: &EditorState,
        context: SubmissionContext,
    ) -> Result<Proof> {
        let proof = self.assemble(editor, context)?;
        self.save(&proof).await?;
        Ok(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockIdentityProvider, MockTransport};
    use crate::session::TokenGuard;
    use serde_json::json;

    fn assembler_with(transport: Arc<MockTransport>) -> SubmissionAssembler {
        let provider = Arc::new(MockIdentityProvider::signed_in(
            "teacher@example.edu",
            "Teacher",
        ));
        let guard = Arc::new(TokenGuard::new(provider));
        let dispatcher = Arc::new(RequestDispatcher::new(guard, transport));
        let catalog = Arc::new(ProofCatalog::new(dispatcher.clone()));
        SubmissionAssembler::new(dispatcher, catalog)
    }

    fn editor(completed: bool) -> EditorState {
        EditorState {
            name: "Distribution".to_string(),
            proof_type: ProofType::Prop,
            lines: vec![
                ProofLine::premise("P & (Q | R)"),
                ProofLine {
                    wff: "(P & Q) | (P & R)".to_string(),
                    justification: "Dist 1".to_string(),
                },
            ],
            conclusion: "(P & Q) | (P & R)".to_string(),
            ever_completed: false,
            completed,
        }
    }

    #[test]
    fn only_admin_published_records_are_arguments() {
        assert_eq!(classify(true, true), EntryType::Argument);
        assert_eq!(classify(true, false), EntryType::Proof);
        assert_eq!(classify(false, true), EntryType::Proof);
        assert_eq!(classify(false, false), EntryType::Proof);
    }

    #[test]
    fn repository_prefix_is_idempotent() {
        let once = repository_name("DeMorgan");
        assert_eq!(once, "Repository - DeMorgan");
        assert_eq!(repository_name(&once), once);
    }

    #[test]
    fn assemble_extracts_premises_and_the_body_blob() {
        let transport = Arc::new(MockTransport::new());
        let assembler = assembler_with(transport);

        let proof = assembler
            .assemble(
                &editor(false),
                SubmissionContext {
                    is_admin: true,
                    repo_visible: true,
                },
            )
            .unwrap();

        assert_eq!(proof.entry_type, EntryType::Argument);
        assert!(proof.repo_problem);
        assert_eq!(proof.premises, vec!["P & (Q | R)"]);
        assert_eq!(proof.logic.len(), 1);
        assert!(proof.rules.is_empty());

        // The blob decodes back into the full line list
        let body = proof.body().unwrap();
        assert_eq!(body.lines().len(), 2);
    }

    #[test]
    fn unnamed_proofs_get_the_fallback_name() {
        let transport = Arc::new(MockTransport::new());
        let assembler = assembler_with(transport);

        let proof = assembler
            .assemble(
                &EditorState {
                    name: "  ".to_string(),
                    ..editor(false)
                },
                SubmissionContext {
                    is_admin: false,
                    repo_visible: false,
                },
            )
            .unwrap();
        assert_eq!(proof.name, "n/a");
    }

    #[tokio::test]
    async fn completed_saves_reload_completed_and_repo_buckets() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(json!({"success": "true"}));
        transport.push_response(json!([])); // completed reload
        transport.push_response(json!([])); // repo reload

        let assembler = assembler_with(transport.clone());
        assembler
            .submit(
                &editor(true),
                SubmissionContext {
                    is_admin: false,
                    repo_visible: false,
                },
            )
            .await
            .unwrap();

        let paths: Vec<(String, String)> = transport
            .requests()
            .iter()
            .map(|r| (r.path.clone(), r.payload["selection"].as_str().unwrap_or("").to_string()))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("saveproof".to_string(), String::new()),
                ("proofs".to_string(), "completedrepo".to_string()),
                ("proofs".to_string(), "repo".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn incomplete_saves_reload_user_and_repo_buckets() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(json!({"success": "true"}));
        transport.push_response(json!([])); // user reload
        transport.push_response(json!([])); // repo reload

        let assembler = assembler_with(transport.clone());
        assembler
            .submit(
                &editor(false),
                SubmissionContext {
                    is_admin: false,
                    repo_visible: false,
                },
            )
            .await
            .unwrap();

        let selections: Vec<String> = transport
            .requests()
            .iter()
            .skip(1)
            .map(|r| r.payload["selection"].as_str().unwrap_or("").to_string())
            .collect();
        assert_eq!(selections, vec!["user", "repo"]);
    }

    #[tokio::test]
    async fn failed_saves_do_not_reload_anything() {
        let transport = Arc::new(MockTransport::new());
        transport.push_error(proofdeck_error::TransportError::Status { status: 400 });

        let assembler = assembler_with(transport.clone());
        let result = assembler
            .submit(
                &editor(false),
                SubmissionContext {
                    is_admin: false,
                    repo_visible: false,
                },
            )
            .await;

        assert!(result.is_err());
        assert_eq!(transport.requests().len(), 1);
    }
}
