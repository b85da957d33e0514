//! Host connection, maintenance-mode, and power-up operations.

use async_trait::async_trait;
use quiesce_audit::AuditSink;
use quiesce_core::{ConnectionState, ConvergencePolicy, ConvergenceReport, Credentials, MaintenanceMode};
use quiesce_observe::{cluster as observe_cluster, host as observe_host, ObserveError};
use quiesce_transport::{HypervisorApi, OobPowerController, TransportError};

use crate::engine::{converge, Convergent};

/// Drives a host's connection state.
pub struct HostConnectionOp<'a> {
    api: &'a dyn HypervisorApi,
    host: String,
    desired: ConnectionState,
}

impl<'a> HostConnectionOp<'a> {
    /// Bind a host to the management API.
    #[must_use]
    pub fn new(api: &'a dyn HypervisorApi, host: impl Into<String>, desired: ConnectionState) -> Self {
        Self {
            api,
            host: host.into(),
            desired,
        }
    }
}

#[async_trait]
impl Convergent for HostConnectionOp<'_> {
    type State = ConnectionState;

    fn describe(&self) -> String {
        format!("host '{}'", self.host)
    }

    async fn observe(&mut self) -> Result<ConnectionState, ObserveError> {
        observe_host::host_connection_state(self.api, &self.host).await
    }

    async fn transition(&mut self) -> Result<(), TransportError> {
        match self.desired {
            ConnectionState::Connected => self.api.connect_host(&self.host).await,
            ConnectionState::Disconnected => self.api.disconnect_host(&self.host).await,
            ConnectionState::NotResponding => Err(TransportError::Session(
                "'not responding' is an observed state, not a valid goal".to_string(),
            )),
        }
    }
}

/// Drives a host into or out of maintenance mode.
///
/// When the host's cluster is named, convergence is declared only once no
/// cluster-level reconfiguration task is running; a single matching state
/// read during "reconfiguring storage" is not trusted.
pub struct HostMaintenanceOp<'a> {
    api: &'a dyn HypervisorApi,
    host: String,
    cluster: Option<String>,
    desired: MaintenanceMode,
}

impl<'a> HostMaintenanceOp<'a> {
    /// Bind a host (and optionally its cluster, for the settle guard).
    #[must_use]
    pub fn new(
        api: &'a dyn HypervisorApi,
        host: impl Into<String>,
        cluster: Option<String>,
        desired: MaintenanceMode,
    ) -> Self {
        Self {
            api,
            host: host.into(),
            cluster,
            desired,
        }
    }
}

#[async_trait]
impl Convergent for HostMaintenanceOp<'_> {
    type State = MaintenanceMode;

    fn describe(&self) -> String {
        format!("host '{}'", self.host)
    }

    async fn observe(&mut self) -> Result<MaintenanceMode, ObserveError> {
        observe_host::host_maintenance_mode(self.api, &self.host).await
    }

    async fn transition(&mut self) -> Result<(), TransportError> {
        match self.desired {
            MaintenanceMode::InMaintenance => self.api.enter_maintenance(&self.host).await,
            MaintenanceMode::NotInMaintenance => self.api.exit_maintenance(&self.host).await,
        }
    }

    async fn settled(&mut self) -> Result<bool, ObserveError> {
        match &self.cluster {
            Some(cluster) => Ok(!observe_cluster::reconfiguration_active(self.api, cluster).await?),
            None => Ok(true),
        }
    }
}

/// Power up a host that has no reachable management path.
///
/// Issues one hard power-up signal through the out-of-band controller, then
/// converges the host's connection state through the management API. The
/// signal is one-shot; a failed signal is a transport failure without any
/// polling.
pub async fn power_up_host(
    api: &dyn HypervisorApi,
    oob: &OobPowerController,
    host: &str,
    oob_address: &str,
    oob_credentials: &Credentials,
    policy: &ConvergencePolicy,
    audit: &AuditSink,
) -> ConvergenceReport<ConnectionState> {
    audit.info(format!("issuing out-of-band power-up to host '{host}'"));
    if let Err(err) = oob.power_on(oob_address, oob_credentials).await {
        audit.error(format!("out-of-band power-up of host '{host}' failed: {err}"));
        return ConvergenceReport::transport_failure(None, 0);
    }

    let mut op = HostConnectionOp::new(api, host, ConnectionState::Connected);
    converge(&mut op, &ConnectionState::Connected, policy, audit).await
}
