//! Mock collaborators for testing.
//!
//! Fully functional in-memory implementations of the identity provider,
//! the transport, and the formula parser, keeping the same interfaces as
//! the real implementations so tests exercise the pipeline without a
//! network or a parser library.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;

use proofdeck_error::{AuthError, AuthResult, TransportError, TransportResult};
use proofdeck_types::{Proof, ProofId};

use crate::dispatch::{BackendRequest, Transport};
use crate::traits::{BearerToken, FormulaParser, IdentityProfile, IdentityProvider, ParsedFormula};

//-----------------------------------------------------------------------------
// Identity Provider
//-----------------------------------------------------------------------------

struct TokenState {
    serial: usize,
    expires_at: chrono::DateTime<Utc>,
}

/// Scriptable identity provider with counted refreshes
pub struct MockIdentityProvider {
    profile: Option<IdentityProfile>,
    state: Mutex<TokenState>,
    refreshes: AtomicUsize,
    fail_refresh: AtomicBool,
}

impl MockIdentityProvider {
    /// A provider with an active session and a fresh token
    pub fn signed_in(email: &str, display_name: &str) -> Self {
        Self {
            profile: Some(IdentityProfile {
                email: email.to_string(),
                display_name: display_name.to_string(),
            }),
            state: Mutex::new(TokenState {
                serial: 0,
                expires_at: Utc::now() + Duration::hours(1),
            }),
            refreshes: AtomicUsize::new(0),
            fail_refresh: AtomicBool::new(false),
        }
    }

    /// A provider with no session at all
    pub fn signed_out() -> Self {
        Self {
            profile: None,
            state: Mutex::new(TokenState {
                serial: 0,
                expires_at: Utc::now(),
            }),
            refreshes: AtomicUsize::new(0),
            fail_refresh: AtomicBool::new(false),
        }
    }

    /// Push the cached token's expiry into the past
    pub fn expire_token(&self) {
        self.state.lock().expect("token state lock").expires_at =
            Utc::now() - Duration::hours(1);
    }

    /// Make the next refresh calls fail
    pub fn fail_refresh(&self) {
        self.fail_refresh.store(true, Ordering::SeqCst);
    }

    /// How many refreshes have been requested
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// The token string the provider would currently hand out
    pub fn current_token_string(&self) -> String {
        format!(
            "token-{}",
            self.state.lock().expect("token state lock").serial
        )
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn is_signed_in(&self) -> bool {
        self.profile.is_some()
    }

    fn profile(&self) -> Option<IdentityProfile> {
        self.profile.clone()
    }

    fn cached_token(&self) -> Option<BearerToken> {
        self.profile.as_ref()?;
        let state = self.state.lock().expect("token state lock");
        Some(BearerToken {
            token: format!("token-{}", state.serial),
            expires_at: state.expires_at,
        })
    }

    async fn refresh(&self) -> AuthResult<BearerToken> {
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(AuthError::refresh_failed("identity provider unavailable"));
        }

        self.refreshes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().expect("token state lock");
        state.serial += 1;
        state.expires_at = Utc::now() + Duration::hours(1);

        Ok(BearerToken {
            token: format!("token-{}", state.serial),
            expires_at: state.expires_at,
        })
    }
}

//-----------------------------------------------------------------------------
// Transport
//-----------------------------------------------------------------------------

/// Scripted transport recording every request it executes
pub struct MockTransport {
    responses: Mutex<VecDeque<TransportResult<Value>>>,
    requests: Mutex<Vec<BackendRequest>>,
}

impl MockTransport {
    /// An empty transport; unscripted requests answer JSON null
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn push_response(&self, value: Value) {
        self.responses
            .lock()
            .expect("response queue lock")
            .push_back(Ok(value));
    }

    /// Queue a failure
    pub fn push_error(&self, error: TransportError) {
        self.responses
            .lock()
            .expect("response queue lock")
            .push_back(Err(error));
    }

    /// Every request executed so far, in order
    pub fn requests(&self) -> Vec<BackendRequest> {
        self.requests.lock().expect("request log lock").clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: BackendRequest) -> TransportResult<Value> {
        self.requests
            .lock()
            .expect("request log lock")
            .push(request);

        self.responses
            .lock()
            .expect("response queue lock")
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

//-----------------------------------------------------------------------------
// Formula Parser
//-----------------------------------------------------------------------------

/// Parser stub: everything is well formed unless scripted otherwise
pub struct MockFormulaParser {
    rejected: Vec<String>,
    free_variables: HashMap<String, Vec<String>>,
}

impl MockFormulaParser {
    /// A parser accepting every formula as closed and well formed
    pub fn new() -> Self {
        Self {
            rejected: Vec::new(),
            free_variables: HashMap::new(),
        }
    }

    /// Mark a normalized formula as not well formed
    pub fn reject(mut self, text: &str) -> Self {
        self.rejected.push(text.to_string());
        self
    }

    /// Give a normalized formula free variables
    pub fn with_free_variables(mut self, text: &str, vars: &[&str]) -> Self {
        self.free_variables.insert(
            text.to_string(),
            vars.iter().map(|v| v.to_string()).collect(),
        );
        self
    }
}

impl Default for MockFormulaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaParser for MockFormulaParser {
    fn normalize(&self, raw: &str) -> String {
        raw.trim().to_string()
    }

    fn parse(&self, text: &str) -> Option<ParsedFormula> {
        if self.rejected.iter().any(|r| r == text) {
            return None;
        }

        Some(ParsedFormula {
            rendered: text.to_string(),
            free_variables: self
                .free_variables
                .get(text)
                .cloned()
                .unwrap_or_default(),
        })
    }
}

//-----------------------------------------------------------------------------
// Record Builders
//-----------------------------------------------------------------------------

/// A minimal valid proof record for catalog fixtures
pub fn proof_named(id: &str, name: &str) -> Proof {
    Proof {
        id: ProofId::from(id),
        entry_type: Default::default(),
        user_submitted: String::new(),
        name: name.to_string(),
        proof_type: Default::default(),
        premises: Vec::new(),
        logic: vec!["[]".to_string()],
        rules: Vec::new(),
        ever_completed: false,
        completed: false,
        conclusion: String::new(),
        repo_problem: false,
        time_submitted: String::new(),
    }
}
