//! Pre-flight reachability probe.

use std::time::Duration;

use quiesce_core::Endpoint;
use tokio::net::TcpStream;

use crate::error::TransportError;

/// Default probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Probe a management port with a plain TCP connect before opening a session.
///
/// Failing here classifies the endpoint as unreachable, which keeps
/// "host unreachable" and "authentication failed" distinguishable in the
/// audit trail.
///
/// # Errors
///
/// Returns [`TransportError::Unreachable`] if the connect fails or times out.
pub async fn preflight(endpoint: &Endpoint, timeout: Duration) -> Result<(), TransportError> {
    let addr = (endpoint.address.as_str(), endpoint.port);
    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(err)) => Err(TransportError::Unreachable {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        }),
        Err(_elapsed) => Err(TransportError::Unreachable {
            endpoint: endpoint.to_string(),
            reason: format!("connect timed out after {}s", timeout.as_secs()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn probe_succeeds_against_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let endpoint = Endpoint::new("127.0.0.1", port);
        assert!(preflight(&endpoint, DEFAULT_PROBE_TIMEOUT).await.is_ok());
    }

    #[tokio::test]
    async fn probe_fails_against_closed_port() {
        // Bind and immediately drop to get a port that refuses connections.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let endpoint = Endpoint::new("127.0.0.1", port);
        let err = preflight(&endpoint, DEFAULT_PROBE_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Unreachable { .. }));
    }
}
