//! Host observations.

use quiesce_core::{ConnectionState, MaintenanceMode};
use quiesce_transport::HypervisorApi;

use crate::error::{classify, ObserveError};

/// Connection state of a host as seen by the hypervisor manager.
///
/// # Errors
///
/// Returns [`ObserveError::NotFound`] when the host does not exist and
/// [`ObserveError::UnexpectedState`] when the backend reports a connection
/// state outside the known domain.
pub async fn host_connection_state(
    api: &dyn HypervisorApi,
    host: &str,
) -> Result<ConnectionState, ObserveError> {
    let raw = api
        .host_connection_state(host)
        .await
        .map_err(|err| classify(host, err))?;
    ConnectionState::from_api(&raw).ok_or_else(|| ObserveError::UnexpectedState {
        target: host.to_string(),
        field: "connection_state",
        raw,
    })
}

/// Maintenance mode of a host.
///
/// # Errors
///
/// Returns [`ObserveError::NotFound`] when the host does not exist.
pub async fn host_maintenance_mode(
    api: &dyn HypervisorApi,
    host: &str,
) -> Result<MaintenanceMode, ObserveError> {
    let flag = api
        .host_maintenance_flag(host)
        .await
        .map_err(|err| classify(host, err))?;
    Ok(MaintenanceMode::from_flag(flag))
}
