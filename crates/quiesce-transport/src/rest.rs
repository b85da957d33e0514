//! Authenticated JSON-over-HTTP(S) session.
//!
//! One [`RestSession`] wraps one reqwest client plus the endpoint and auth
//! scheme it was opened against. The session performs no retries; errors are
//! classified for the convergence layer and returned as-is.

use std::fmt;
use std::time::Duration;

use quiesce_core::Endpoint;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::error::TransportError;
use crate::probe::{preflight, DEFAULT_PROBE_TIMEOUT};

/// Authentication scheme applied to every request on a session.
#[derive(Clone)]
pub enum AuthScheme {
    /// HTTP basic auth.
    Basic {
        /// Login user name.
        username: String,
        /// Login password.
        password: String,
    },
    /// Bearer token, typically obtained from a session-create call.
    Bearer {
        /// The token value.
        token: String,
    },
}

impl fmt::Debug for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
        }
    }
}

/// Connection options for a [`RestSession`].
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Use HTTPS. Disabled only by tests talking to a plaintext mock server.
    pub use_tls: bool,
    /// Accept self-signed certificates; management planes in this stack ship
    /// their own CA.
    pub accept_invalid_certs: bool,
    /// Transport-level timeout for each call, from the caller's policy.
    pub timeout: Duration,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            use_tls: true,
            accept_invalid_certs: true,
            timeout: Duration::from_secs(30),
        }
    }
}

impl RestConfig {
    /// Config with a specific per-call timeout.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            use_tls: true,
            accept_invalid_certs: true,
            timeout,
        }
    }
}

/// Error body shape shared by the REST backends.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// One authenticated session against one REST control plane.
pub struct RestSession {
    client: reqwest::Client,
    base_url: String,
    endpoint: Endpoint,
    auth: AuthScheme,
    open: bool,
}

impl RestSession {
    /// Open a session: probe the endpoint, then build the client.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unreachable`] when the pre-flight probe
    /// fails and [`TransportError::Session`] when the client cannot be built.
    pub async fn open(
        endpoint: Endpoint,
        auth: AuthScheme,
        config: RestConfig,
    ) -> Result<Self, TransportError> {
        preflight(&endpoint, DEFAULT_PROBE_TIMEOUT).await?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(DEFAULT_PROBE_TIMEOUT)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|err| TransportError::Session(format!("failed to build client: {err}")))?;

        let scheme = if config.use_tls { "https" } else { "http" };
        let base_url = format!("{scheme}://{endpoint}");

        Ok(Self {
            client,
            base_url,
            endpoint,
            auth,
            open: true,
        })
    }

    /// The endpoint this session was opened against.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Replace the session's auth scheme.
    ///
    /// Used after a session-create call upgrades basic credentials to a
    /// session token.
    pub fn set_auth(&mut self, auth: AuthScheme) {
        self.auth = auth;
    }

    /// GET a JSON document.
    ///
    /// # Errors
    ///
    /// Returns a classified [`TransportError`] on connection, auth, status,
    /// or decode failure.
    pub async fn get_json(&self, path: &str) -> Result<Value, TransportError> {
        self.execute(Method::GET, path, None).await
    }

    /// POST with an optional JSON body, returning the response document.
    ///
    /// # Errors
    ///
    /// Returns a classified [`TransportError`] on connection, auth, status,
    /// or decode failure.
    pub async fn post_json(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        self.execute(Method::POST, path, body).await
    }

    /// DELETE a resource, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns a classified [`TransportError`] on connection, auth, or
    /// status failure.
    pub async fn delete(&self, path: &str) -> Result<(), TransportError> {
        self.execute(Method::DELETE, path, None).await.map(|_| ())
    }

    /// Close the session. Idempotent; further calls fail with
    /// [`TransportError::Session`].
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Whether the session is still open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        if !self.open {
            return Err(TransportError::Session(
                "call on a closed session".to_string(),
            ));
        }

        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.request(method, &url);
        request = match &self.auth {
            AuthScheme::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            AuthScheme::Bearer { token } => request.bearer_auth(token),
        };
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout {
                    endpoint: self.endpoint.to_string(),
                }
            } else {
                TransportError::Transient(err.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TransportError::AuthenticationFailed {
                endpoint: self.endpoint.to_string(),
            });
        }
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or_else(|| format!("status {status}"));
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        response
            .json::<Value>()
            .await
            .map_err(|err| TransportError::Transient(format!("invalid response body: {err}")))
    }
}

impl fmt::Debug for RestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestSession")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}
