//! SDN manager cluster adapter.

use async_trait::async_trait;
use quiesce_core::{Credentials, Endpoint};
use serde::Deserialize;

use crate::error::TransportError;
use crate::rest::{AuthScheme, RestConfig, RestSession};

/// Surface of the SDN manager API used by quiesce.
#[async_trait]
pub trait SdnApi: Send + Sync {
    /// Raw status string of the manager cluster.
    async fn cluster_status(&self) -> Result<String, TransportError>;
}

#[derive(Debug, Deserialize)]
struct ClusterStatusBody {
    status: String,
}

/// HTTP implementation of [`SdnApi`].
pub struct HttpSdnApi {
    session: RestSession,
}

impl HttpSdnApi {
    /// Open a basic-auth session against the SDN manager.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unreachable`] when the pre-flight probe
    /// fails.
    pub async fn connect(
        endpoint: Endpoint,
        credentials: &Credentials,
        config: RestConfig,
    ) -> Result<Self, TransportError> {
        let session = RestSession::open(
            endpoint,
            AuthScheme::Basic {
                username: credentials.username.clone(),
                password: credentials.password.clone(),
            },
            config,
        )
        .await?;
        tracing::debug!(endpoint = %session.endpoint(), "opened SDN manager session");
        Ok(Self { session })
    }

    /// Close the session. Idempotent.
    pub fn close(&mut self) {
        self.session.close();
    }
}

#[async_trait]
impl SdnApi for HttpSdnApi {
    async fn cluster_status(&self) -> Result<String, TransportError> {
        let body = self.session.get_json("/api/v1/cluster/status").await?;
        let body: ClusterStatusBody = serde_json::from_value(body)
            .map_err(|err| TransportError::Transient(format!("unexpected response shape: {err}")))?;
        Ok(body.status)
    }
}
