//! Transport error taxonomy.
//!
//! Session-establishment failures ([`TransportError::Unreachable`],
//! [`TransportError::AuthenticationFailed`]) abort an operation before any
//! polling starts. Mid-operation failures are classified transient or not via
//! [`TransportError::is_transient`]; convergence loops swallow transient
//! failures within their existing attempt budget and stop on everything else.

use thiserror::Error;

/// Errors raised by the transport adapters.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint did not answer the pre-flight probe or the session open.
    #[error("endpoint {endpoint} unreachable: {reason}")]
    Unreachable {
        /// The endpoint that was probed.
        endpoint: String,
        /// Connect-level failure detail.
        reason: String,
    },

    /// A session was opened but the identity was rejected.
    #[error("authentication failed for {endpoint}")]
    AuthenticationFailed {
        /// The endpoint that rejected the credentials.
        endpoint: String,
    },

    /// A single call exceeded its transport-level timeout.
    #[error("request to {endpoint} timed out")]
    Timeout {
        /// The endpoint that failed to answer in time.
        endpoint: String,
    },

    /// The backend answered with a non-success status.
    #[error("API call failed with status {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Backend-supplied error detail, when decodable.
        message: String,
    },

    /// A network blip mid-call; safe to retry on the next poll.
    #[error("transient transport failure: {0}")]
    Transient(String),

    /// The shell command or external executable exited nonzero.
    #[error("command exited with status {status}: {stderr}")]
    Exec {
        /// Process exit status.
        status: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// Session-lifecycle misuse or protocol failure.
    #[error("session error: {0}")]
    Session(String),
}

impl TransportError {
    /// Whether a convergence loop may swallow this failure and keep polling.
    ///
    /// Server-side 5xx answers are transient here: backends in a powering-up
    /// or powering-down stack routinely answer 503 while their own services
    /// settle.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transient(_) | Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}
