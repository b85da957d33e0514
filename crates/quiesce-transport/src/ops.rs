//! Operations-analytics and lifecycle-manager adapter.
//!
//! One basic-auth session covers the analytics cluster's read surface
//! (health, resync, membership, online-state) and the lifecycle manager's
//! online-state transition request.

use async_trait::async_trait;
use quiesce_core::{Credentials, Endpoint};
use serde::Deserialize;
use serde_json::json;

use crate::error::TransportError;
use crate::rest::{AuthScheme, RestConfig, RestSession};

/// One named health group as reported by the health service.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthGroupDto {
    /// Group name.
    pub name: String,
    /// Raw severity string.
    pub severity: String,
}

/// Surface of the operations-analytics control plane used by quiesce.
#[async_trait]
pub trait OpsApi: Send + Sync {
    /// Fetch the structured health summary.
    async fn health_groups(&self) -> Result<Vec<HealthGroupDto>, TransportError>;

    /// Number of objects currently resynchronizing.
    async fn resync_pending(&self) -> Result<u64, TransportError>;

    /// Identifiers of the current cluster members.
    async fn cluster_members(&self) -> Result<Vec<String>, TransportError>;

    /// Raw online-state of the management cluster.
    async fn online_state(&self) -> Result<String, TransportError>;

    /// Request an online-state transition via the lifecycle manager.
    async fn request_online_state(&self, desired: &str) -> Result<(), TransportError>;
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    groups: Vec<HealthGroupDto>,
}

#[derive(Debug, Deserialize)]
struct ResyncBody {
    pending_objects: u64,
}

#[derive(Debug, Deserialize)]
struct MembersBody {
    members: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StateBody {
    state: String,
}

/// HTTP implementation of [`OpsApi`].
pub struct HttpOpsApi {
    session: RestSession,
}

impl HttpOpsApi {
    /// Open a basic-auth session against the analytics endpoint.
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
        tracing::debug!(endpoint = %session.endpoint(), "opened analytics session");
        Ok(Self { session })
    }

    /// Close the session. Idempotent.
    pub fn close(&mut self) {
        self.session.close();
    }

    fn decode<T: serde::de::DeserializeOwned>(
        value: serde_json::Value,
    ) -> Result<T, TransportError> {
        serde_json::from_value(value)
            .map_err(|err| TransportError::Transient(format!("unexpected response shape: {err}")))
    }
}

#[async_trait]
impl OpsApi for HttpOpsApi {
    async fn health_groups(&self) -> Result<Vec<HealthGroupDto>, TransportError> {
        let body = self.session.get_json("/api/health/summary").await?;
        Ok(Self::decode::<HealthBody>(body)?.groups)
    }

    async fn resync_pending(&self) -> Result<u64, TransportError> {
        let body = self.session.get_json("/api/resync").await?;
        Ok(Self::decode::<ResyncBody>(body)?.pending_objects)
    }

    async fn cluster_members(&self) -> Result<Vec<String>, TransportError> {
        let body = self.session.get_json("/api/cluster/members").await?;
        Ok(Self::decode::<MembersBody>(body)?.members)
    }

    async fn online_state(&self) -> Result<String, TransportError> {
        let body = self.session.get_json("/api/cluster/state").await?;
        Ok(Self::decode::<StateBody>(body)?.state)
    }

    async fn request_online_state(&self, desired: &str) -> Result<(), TransportError> {
        self.session
            .post_json("/api/cluster/state", Some(&json!({ "state": desired })))
            .await
            .map(|_| ())
    }
}
