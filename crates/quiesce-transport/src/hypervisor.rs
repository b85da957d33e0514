//! Hypervisor management API adapter.
//!
//! The trait carries raw string status fields exactly as the backend reports
//! them; mapping onto the typed state domains happens in the observation
//! layer, never here.

use async_trait::async_trait;
use quiesce_core::{Credentials, Endpoint};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::TransportError;
use crate::rest::{AuthScheme, RestConfig, RestSession};

/// One VM row from the management API's inventory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct VmSummary {
    /// Inventory identifier.
    pub vm: String,
    /// Display name.
    pub name: String,
    /// Raw power state string.
    pub power_state: String,
}

/// Surface of the hypervisor management API used by quiesce.
///
/// Mutating calls are one-shot transition commands: the backend acks the
/// request and transitions asynchronously, so correctness is established by
/// the convergence layer's repeated observation, not by these calls.
#[async_trait]
pub trait HypervisorApi: Send + Sync {
    /// List VMs, optionally filtered server-side by name.
    async fn list_vms(&self, name_filter: Option<&str>) -> Result<Vec<VmSummary>, TransportError>;

    /// Raw power state of one VM.
    async fn vm_power_state(&self, vm: &str) -> Result<String, TransportError>;

    /// Request power-on.
    async fn power_on_vm(&self, vm: &str) -> Result<(), TransportError>;

    /// Request hard power-off.
    async fn power_off_vm(&self, vm: &str) -> Result<(), TransportError>;

    /// Request an in-guest shutdown via the guest tools.
    async fn shutdown_guest(&self, vm: &str) -> Result<(), TransportError>;

    /// Raw connection state of a host.
    async fn host_connection_state(&self, host: &str) -> Result<String, TransportError>;

    /// Request host reconnect.
    async fn connect_host(&self, host: &str) -> Result<(), TransportError>;

    /// Request administrative disconnect.
    async fn disconnect_host(&self, host: &str) -> Result<(), TransportError>;

    /// Whether the host is in maintenance mode.
    async fn host_maintenance_flag(&self, host: &str) -> Result<bool, TransportError>;

    /// Request entry into maintenance mode.
    async fn enter_maintenance(&self, host: &str) -> Result<(), TransportError>;

    /// Request exit from maintenance mode.
    async fn exit_maintenance(&self, host: &str) -> Result<(), TransportError>;

    /// Whether HA is enabled on a cluster.
    async fn ha_flag(&self, cluster: &str) -> Result<bool, TransportError>;

    /// Request an HA enable/disable reconfiguration.
    async fn set_ha_flag(&self, cluster: &str, enabled: bool) -> Result<(), TransportError>;

    /// Raw DRS automation level of a cluster.
    async fn drs_automation_level(&self, cluster: &str) -> Result<String, TransportError>;

    /// Request a DRS automation-level change.
    async fn set_drs_automation_level(
        &self,
        cluster: &str,
        level: &str,
    ) -> Result<(), TransportError>;

    /// Value of a cluster advanced setting, `None` when unset.
    async fn advanced_setting(
        &self,
        cluster: &str,
        key: &str,
    ) -> Result<Option<String>, TransportError>;

    /// Write a cluster advanced setting.
    async fn set_advanced_setting(
        &self,
        cluster: &str,
        key: &str,
        value: &str,
    ) -> Result<(), TransportError>;

    /// Descriptions of cluster-level tasks currently running.
    ///
    /// The convergence layer uses this as the concurrent-reconfiguration
    /// guard before trusting a single state read.
    async fn active_cluster_tasks(&self, cluster: &str) -> Result<Vec<String>, TransportError>;
}

#[derive(Debug, Deserialize)]
struct PowerBody {
    state: String,
}

#[derive(Debug, Deserialize)]
struct HostBody {
    connection_state: String,
    in_maintenance: bool,
}

#[derive(Debug, Deserialize)]
struct ClusterBody {
    ha_enabled: bool,
    drs_automation: String,
}

#[derive(Debug, Deserialize)]
struct SettingBody {
    value: String,
}

#[derive(Debug, Deserialize)]
struct TaskBody {
    description: String,
}

/// HTTP implementation of [`HypervisorApi`] over a token session.
#[derive(Debug)]
pub struct HttpHypervisorApi {
    session: RestSession,
}

impl HttpHypervisorApi {
    /// Open a management session: probe, authenticate with basic credentials,
    /// exchange them for a session token.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unreachable`] when the probe fails and
    /// [`TransportError::AuthenticationFailed`] when the identity is
    /// rejected.
    pub async fn connect(
        endpoint: Endpoint,
        credentials: &Credentials,
        config: RestConfig,
    ) -> Result<Self, TransportError> {
        let mut session = RestSession::open(
            endpoint,
            AuthScheme::Basic {
                username: credentials.username.clone(),
                password: credentials.password.clone(),
            },
            config,
        )
        .await?;

        let token = session.post_json("/api/session", None).await?;
        let token = token
            .as_str()
            .ok_or_else(|| {
                TransportError::Session("session create returned a non-string token".to_string())
            })?
            .to_string();
        session.set_auth(AuthScheme::Bearer { token });

        tracing::debug!(endpoint = %session.endpoint(), "opened hypervisor management session");
        Ok(Self { session })
    }

    /// Delete the remote session and close the adapter. Idempotent.
    pub async fn close(&mut self) {
        if !self.session.is_open() {
            return;
        }
        if let Err(err) = self.session.delete("/api/session").await {
            tracing::debug!(error = %err, "session delete failed during close");
        }
        self.session.close();
    }

    fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, TransportError> {
        serde_json::from_value(value)
            .map_err(|err| TransportError::Transient(format!("unexpected response shape: {err}")))
    }
}

#[async_trait]
impl HypervisorApi for HttpHypervisorApi {
    async fn list_vms(&self, name_filter: Option<&str>) -> Result<Vec<VmSummary>, TransportError> {
        let path = match name_filter {
            Some(name) => format!("/api/vms?name={name}"),
            None => "/api/vms".to_string(),
        };
        let body = self.session.get_json(&path).await?;
        Self::decode(body)
    }

    async fn vm_power_state(&self, vm: &str) -> Result<String, TransportError> {
        let body = self.session.get_json(&format!("/api/vms/{vm}/power")).await?;
        Ok(Self::decode::<PowerBody>(body)?.state)
    }

    async fn power_on_vm(&self, vm: &str) -> Result<(), TransportError> {
        self.session
            .post_json(&format!("/api/vms/{vm}/power?action=start"), None)
            .await
            .map(|_| ())
    }

    async fn power_off_vm(&self, vm: &str) -> Result<(), TransportError> {
        self.session
            .post_json(&format!("/api/vms/{vm}/power?action=stop"), None)
            .await
            .map(|_| ())
    }

    async fn shutdown_guest(&self, vm: &str) -> Result<(), TransportError> {
        self.session
            .post_json(&format!("/api/vms/{vm}/guest/shutdown"), None)
            .await
            .map(|_| ())
    }

    async fn host_connection_state(&self, host: &str) -> Result<String, TransportError> {
        let body = self.session.get_json(&format!("/api/hosts/{host}")).await?;
        Ok(Self::decode::<HostBody>(body)?.connection_state)
    }

    async fn connect_host(&self, host: &str) -> Result<(), TransportError> {
        self.session
            .post_json(&format!("/api/hosts/{host}/connect"), None)
            .await
            .map(|_| ())
    }

    async fn disconnect_host(&self, host: &str) -> Result<(), TransportError> {
        self.session
            .post_json(&format!("/api/hosts/{host}/disconnect"), None)
            .await
            .map(|_| ())
    }

    async fn host_maintenance_flag(&self, host: &str) -> Result<bool, TransportError> {
        let body = self.session.get_json(&format!("/api/hosts/{host}")).await?;
        Ok(Self::decode::<HostBody>(body)?.in_maintenance)
    }

    async fn enter_maintenance(&self, host: &str) -> Result<(), TransportError> {
        self.session
            .post_json(&format!("/api/hosts/{host}/maintenance?action=enter"), None)
            .await
            .map(|_| ())
    }

    async fn exit_maintenance(&self, host: &str) -> Result<(), TransportError> {
        self.session
            .post_json(&format!("/api/hosts/{host}/maintenance?action=exit"), None)
            .await
            .map(|_| ())
    }

    async fn ha_flag(&self, cluster: &str) -> Result<bool, TransportError> {
        let body = self
            .session
            .get_json(&format!("/api/clusters/{cluster}"))
            .await?;
        Ok(Self::decode::<ClusterBody>(body)?.ha_enabled)
    }

    async fn set_ha_flag(&self, cluster: &str, enabled: bool) -> Result<(), TransportError> {
        self.session
            .post_json(
                &format!("/api/clusters/{cluster}/ha"),
                Some(&json!({ "enabled": enabled })),
            )
            .await
            .map(|_| ())
    }

    async fn drs_automation_level(&self, cluster: &str) -> Result<String, TransportError> {
        let body = self
            .session
            .get_json(&format!("/api/clusters/{cluster}"))
            .await?;
        Ok(Self::decode::<ClusterBody>(body)?.drs_automation)
    }

    async fn set_drs_automation_level(
        &self,
        cluster: &str,
        level: &str,
    ) -> Result<(), TransportError> {
        self.session
            .post_json(
                &format!("/api/clusters/{cluster}/drs"),
                Some(&json!({ "automation_level": level })),
            )
            .await
            .map(|_| ())
    }

    async fn advanced_setting(
        &self,
        cluster: &str,
        key: &str,
    ) -> Result<Option<String>, TransportError> {
        let result = self
            .session
            .get_json(&format!("/api/clusters/{cluster}/settings/{key}"))
            .await;
        match result {
            Ok(body) => Ok(Some(Self::decode::<SettingBody>(body)?.value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn set_advanced_setting(
        &self,
        cluster: &str,
        key: &str,
        value: &str,
    ) -> Result<(), TransportError> {
        self.session
            .post_json(
                &format!("/api/clusters/{cluster}/settings/{key}"),
                Some(&json!({ "value": value })),
            )
            .await
            .map(|_| ())
    }

    async fn active_cluster_tasks(&self, cluster: &str) -> Result<Vec<String>, TransportError> {
        let body = self
            .session
            .get_json(&format!("/api/clusters/{cluster}/tasks?status=running"))
            .await?;
        let tasks: Vec<TaskBody> = Self::decode(body)?;
        Ok(tasks.into_iter().map(|t| t.description).collect())
    }
}
