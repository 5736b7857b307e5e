//! The client facade.
//!
//! Wires the pipeline together around injected collaborators: no ambient
//! globals, one object owning the session, catalog, and component
//! handles. Sign-in bootstraps the admin list, rebuilds the session, and
//! loads the three catalog buckets in order.

use std::sync::Arc;

use log::{info, warn};
use serde_json::json;

use proofdeck_error::{Error, Result};
use proofdeck_types::{AdminList, Session};

use crate::catalog::ProofCatalog;
use crate::config::ClientConfig;
use crate::dispatch::{decode_value, HttpTransport, RequestDispatcher, Transport};
use crate::directory::SectionDirectory;
use crate::export::CsvExporter;
use crate::session::TokenGuard;
use crate::submit::SubmissionAssembler;
use crate::traits::{FormulaParser, IdentityProvider};
use crate::validate::ValidationGate;

/// One signed-in client over the proof-authoring backend
pub struct ProofdeckClient {
    /// Backend access shared by every component
    dispatcher: Arc<RequestDispatcher>,

    /// The proof and metadata cache
    catalog: Arc<ProofCatalog>,

    /// Pre-submission validation
    validation: ValidationGate,

    /// Record assembly and persistence
    assembler: SubmissionAssembler,

    /// Roster and assignment administration
    directory: SectionDirectory,

    /// CSV export
    exporter: CsvExporter,
}

impl ProofdeckClient {
    /// Build a client over the HTTP transport
    pub fn new(
        config: &ClientConfig,
        provider: Arc<dyn IdentityProvider>,
        parser: Arc<dyn FormulaParser>,
    ) -> Result<Self> {
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new(config).map_err(Error::Transport)?);
        Ok(Self::with_transport(config, provider, parser, transport))
    }

    /// Build a client over any transport (tests inject a mock here)
    pub fn with_transport(
        config: &ClientConfig,
        provider: Arc<dyn IdentityProvider>,
        parser: Arc<dyn FormulaParser>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let guard = Arc::new(TokenGuard::new(provider));
        let dispatcher = Arc::new(RequestDispatcher::new(guard, transport));
        let catalog = Arc::new(ProofCatalog::new(dispatcher.clone()));

        Self {
            validation: ValidationGate::new(parser),
            assembler: SubmissionAssembler::new(dispatcher.clone(), catalog.clone()),
            directory: SectionDirectory::new(dispatcher.clone(), catalog.clone()),
            exporter: CsvExporter::from_config(config),
            dispatcher,
            catalog,
        }
    }

    /// Handle a sign-in event.
    ///
    /// Fetches the admin list (a missing list degrades to non-admin,
    /// logged), rebuilds the session snapshot, then loads the user,
    /// repository, and completed buckets, each awaited in turn.
    pub async fn sign_in(&self) -> Result<Session> {
        let admins = match self.dispatcher.get("admins", json!({})).await {
            Ok(value) => match decode_value::<AdminList>(value) {
                Ok(admins) => admins,
                Err(e) => {
                    warn!("unable to load admin users: {e}");
                    AdminList::default()
                }
            },
            Err(e) => {
                warn!("unable to load admin users: {e}");
                AdminList::default()
            }
        };

        let session = self
            .dispatcher
            .guard()
            .establish(&admins)
            .map_err(Error::Auth)?;
        if session.is_admin {
            info!("logged in as an administrator");
        }
        info!("signed in as {}", session.email);

        self.catalog.load_user_proofs().await?;
        self.catalog.load_repo_proofs().await?;
        self.catalog.load_completed_proofs().await?;

        Ok(session)
    }

    /// The current session snapshot, if signed in
    pub fn session(&self) -> Option<Session> {
        self.dispatcher.guard().session()
    }

    /// Backend access for callers composing their own requests
    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// The proof and metadata cache
    pub fn catalog(&self) -> &ProofCatalog {
        &self.catalog
    }

    /// Pre-submission validation
    pub fn validation(&self) -> &ValidationGate {
        &self.validation
    }

    /// Record assembly and persistence
    pub fn assembler(&self) -> &SubmissionAssembler {
        &self.assembler
    }

    /// Roster and assignment administration
    pub fn directory(&self) -> &SectionDirectory {
        &self.directory
    }

    /// CSV export
    pub fn exporter(&self) -> &CsvExporter {
        &self.exporter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockFormulaParser, MockIdentityProvider, MockTransport};

    fn client_with(
        provider: Arc<MockIdentityProvider>,
        transport: Arc<MockTransport>,
    ) -> ProofdeckClient {
        ProofdeckClient::with_transport(
            &ClientConfig::default(),
            provider,
            Arc::new(MockFormulaParser::new()),
            transport,
        )
    }

    #[tokio::test]
    async fn sign_in_bootstraps_admins_and_loads_buckets_in_order() {
        let _ = env_logger::builder().is_test(true).try_init();

        let transport = Arc::new(MockTransport::new());
        transport.push_response(json!({"Admins": ["teacher@example.edu"]}));
        transport.push_response(json!([])); // user
        transport.push_response(json!([])); // repo
        transport.push_response(json!([])); // completed

        let provider = Arc::new(MockIdentityProvider::signed_in(
            "teacher@example.edu",
            "Teacher",
        ));
        let client = client_with(provider, transport.clone());

        let session = client.sign_in().await.unwrap();
        assert!(session.is_admin);
        assert_eq!(client.session().unwrap().email, "teacher@example.edu");

        let calls: Vec<(String, String)> = transport
            .requests()
            .iter()
            .map(|r| {
                (
                    r.path.clone(),
                    r.payload["selection"].as_str().unwrap_or("").to_string(),
                )
            })
            .collect();
        assert_eq!(
            calls,
            vec![
                ("admins".to_string(), String::new()),
                ("proofs".to_string(), "user".to_string()),
                ("proofs".to_string(), "repo".to_string()),
                ("proofs".to_string(), "completedrepo".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn a_missing_admin_list_degrades_to_non_admin() {
        let transport = Arc::new(MockTransport::new());
        transport.push_error(proofdeck_error::TransportError::Status { status: 500 });
        transport.push_response(json!([]));
        transport.push_response(json!([]));
        transport.push_response(json!([]));

        let provider = Arc::new(MockIdentityProvider::signed_in(
            "teacher@example.edu",
            "Teacher",
        ));
        let client = client_with(provider, transport);

        let session = client.sign_in().await.unwrap();
        assert!(!session.is_admin);
    }
}
