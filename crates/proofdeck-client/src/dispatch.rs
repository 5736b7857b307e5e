//! Token-lifecycle-aware request dispatch.
//!
//! Every backend call funnels through [`RequestDispatcher::send`], which
//! checks the session, refreshes a stale token exactly once, and only then
//! hands the request to the transport. The token attached is always the
//! one valid *after* any required refresh.
//!
//! Encodings are canonical and enforced here: POST bodies travel as JSON
//! documents, GET payloads as structured query parameters.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use proofdeck_error::{AuthError, Error, Result, TransportError, TransportResult};

use crate::config::ClientConfig;
use crate::session::TokenGuard;

/// Header carrying the bearer token on every privileged call
pub const AUTH_HEADER: &str = "X-Auth-Token";

//-----------------------------------------------------------------------------
// Requests
//-----------------------------------------------------------------------------

/// HTTP methods the backend speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// One fully prepared backend request
#[derive(Debug, Clone)]
pub struct BackendRequest {
    /// GET or POST
    pub method: Method,

    /// Path relative to the backend prefix, e.g. `proofs`
    pub path: String,

    /// Bearer token valid at dispatch time
    pub token: String,

    /// JSON body (POST) or query-parameter source object (GET)
    pub payload: Value,
}

//-----------------------------------------------------------------------------
// Transport Seam
//-----------------------------------------------------------------------------

/// The wire boundary; implemented over HTTP and mocked in tests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a prepared request and return the parsed JSON body
    async fn execute(&self, request: BackendRequest) -> TransportResult<Value>;
}

/// HTTP transport over reqwest
pub struct HttpTransport {
    /// HTTP client with the only client-side timeout boundary
    http: reqwest::Client,

    /// Backend base URL, no trailing slash
    base_url: String,
}

impl HttpTransport {
    /// Build a transport from the client configuration
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(TransportError::network)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Flatten a payload object into query pairs.
    ///
    /// Scalars stringify plainly; arrays join with commas, matching how
    /// the backend reads multi-valued parameters.
    fn query_pairs(payload: &Value) -> Vec<(String, String)> {
        let Some(object) = payload.as_object() else {
            return Vec::new();
        };

        object
            .iter()
            .map(|(key, value)| (key.clone(), Self::query_value(value)))
            .collect()
    }

    fn query_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(Self::query_value)
                .collect::<Vec<_>>()
                .join(","),
            other => other.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: BackendRequest) -> TransportResult<Value> {
        let url = format!("{}/{}", self.base_url, request.path);

        let builder = match request.method {
            Method::Get => self.http.get(&url).query(&Self::query_pairs(&request.payload)),
            Method::Post => self.http.post(&url).json(&request.payload),
        };

        let response = builder
            .header(AUTH_HEADER, &request.token)
            .send()
            .await
            .map_err(TransportError::network)?;

        let status = response.status();
        if !status.is_success() {
            // The body is logged here and goes no further; callers see
            // only the status class.
            let body = response.text().await.unwrap_or_default();
            warn!(
                "backend {} /{} failed with {}: {}",
                request.method, request.path, status, body
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(TransportError::decode)
    }
}

//-----------------------------------------------------------------------------
// Dispatcher
//-----------------------------------------------------------------------------

/// Issues authenticated GET/POST calls to the backend
pub struct RequestDispatcher {
    /// Session and token lifecycle
    guard: Arc<TokenGuard>,

    /// The wire boundary
    transport: Arc<dyn Transport>,

    /// Shown-once flag for the unauthenticated warning
    login_prompt_shown: AtomicBool,
}

impl RequestDispatcher {
    /// Create a dispatcher over a token guard and transport
    pub fn new(guard: Arc<TokenGuard>, transport: Arc<dyn Transport>) -> Self {
        Self {
            guard,
            transport,
            login_prompt_shown: AtomicBool::new(false),
        }
    }

    /// The token guard backing this dispatcher
    pub fn guard(&self) -> &TokenGuard {
        &self.guard
    }

    /// Whether the one-time unauthenticated warning has been emitted
    pub fn login_warning_shown(&self) -> bool {
        self.login_prompt_shown.load(Ordering::SeqCst)
    }

    /// Issue a GET request with structured query parameters
    pub async fn get(&self, path: &str, params: Value) -> Result<Value> {
        self.send(Method::Get, path, params).await
    }

    /// Issue a POST request with a JSON body
    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.send(Method::Post, path, body).await
    }

    async fn send(&self, method: Method, path: &str, payload: Value) -> Result<Value> {
        if !self.guard.is_authenticated() {
            debug!("cannot send {} /{} from unknown user", method, path);
            if !self.login_prompt_shown.swap(true, Ordering::SeqCst) {
                warn!(
                    "You are not signed in. To save your work, please sign in \
                     and then try again, or refresh the page."
                );
            }
            return Err(AuthError::NoSession.into());
        }

        // Refresh, if needed, strictly precedes the network call; the
        // token attached is the one valid after the refresh.
        let token = if self.guard.is_expired() {
            warn!("token expired; attempting to refresh token");
            self.guard.refresh().await.map_err(Error::Auth)?
        } else {
            self.guard.current_token().map_err(Error::Auth)?
        };

        let request = BackendRequest {
            method,
            path: path.to_string(),
            token,
            payload,
        };

        Ok(self.transport.execute(request).await?)
    }
}

/// Decode a response value into a typed record
pub fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| Error::Transport(TransportError::decode(e)))
}
