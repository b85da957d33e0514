//! Gate error taxonomy.

use quiesce_observe::ObserveError;
use quiesce_transport::TransportError;
use thiserror::Error;

/// Errors raised by health and readiness gates.
#[derive(Debug, Error)]
pub enum GateError {
    /// The backing service never answered within its connection-retry
    /// budget. A hard failure, distinct from a convergence timeout and from
    /// an unhealthy result.
    #[error("backend service not ready after {attempts} connection attempts")]
    BackendNotReady {
        /// Connection attempts made before giving up.
        attempts: u32,
    },

    /// An observation failed for a non-retryable reason.
    #[error(transparent)]
    Observe(#[from] ObserveError),

    /// A transport call failed for a non-retryable reason.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
