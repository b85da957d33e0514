//! Management-appliance service observations over the shell channel.

use std::time::Duration;

use quiesce_core::ServiceRunState;
use quiesce_transport::{ShellChannel, TransportError};

use crate::error::ObserveError;

/// Command used to query the appliance's service controller.
fn status_command(service: &str) -> String {
    format!("svc-control --status {service}")
}

/// Run state of an appliance service, parsed from the service controller's
/// output.
///
/// # Errors
///
/// Returns [`ObserveError::NotFound`] when the controller reports an unknown
/// service and [`ObserveError::UnexpectedState`] when its output cannot be
/// parsed.
pub async fn service_run_state(
    shell: &mut dyn ShellChannel,
    service: &str,
    timeout: Duration,
) -> Result<ServiceRunState, ObserveError> {
    let output = shell.run(&status_command(service), timeout).await?;

    if !output.success() {
        if output.stderr.to_ascii_lowercase().contains("unknown service") {
            return Err(ObserveError::NotFound {
                target: service.to_string(),
            });
        }
        return Err(ObserveError::Transport(TransportError::Exec {
            status: i32::try_from(output.exit_status).unwrap_or(i32::MAX),
            stderr: output.stderr,
        }));
    }

    let raw = output
        .stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_ascii_uppercase();
    ServiceRunState::from_api(&raw).ok_or_else(|| ObserveError::UnexpectedState {
        target: service.to_string(),
        field: "run_state",
        raw,
    })
}
