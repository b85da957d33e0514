//! Appliance service operations over the shell channel.

use std::time::Duration;

use async_trait::async_trait;
use quiesce_core::ServiceRunState;
use quiesce_observe::{appliance as observe_appliance, ObserveError};
use quiesce_transport::{ShellChannel, TransportError};

use crate::engine::Convergent;

/// Drives one appliance service to a run state.
///
/// The shell session is borrowed for the duration of the operation; the
/// caller keeps ownership and closes it on every exit path.
pub struct ServiceStateOp<'a> {
    shell: &'a mut dyn ShellChannel,
    service: String,
    desired: ServiceRunState,
    command_timeout: Duration,
}

impl<'a> ServiceStateOp<'a> {
    /// Bind a service on an open shell session.
    ///
    /// `command_timeout` is the transport-level budget for each controller
    /// invocation, normally the policy's attempt timeout.
    #[must_use]
    pub fn new(
        shell: &'a mut dyn ShellChannel,
        service: impl Into<String>,
        desired: ServiceRunState,
        command_timeout: Duration,
    ) -> Self {
        Self {
            shell,
            service: service.into(),
            desired,
            command_timeout,
        }
    }

    fn transition_command(&self) -> String {
        let action = match self.desired {
            ServiceRunState::Started => "--start",
            ServiceRunState::Stopped => "--stop",
        };
        format!("svc-control {action} {}", self.service)
    }
}

#[async_trait]
impl Convergent for ServiceStateOp<'_> {
    type State = ServiceRunState;

    fn describe(&self) -> String {
        format!("appliance service '{}'", self.service)
    }

    async fn observe(&mut self) -> Result<ServiceRunState, ObserveError> {
        observe_appliance::service_run_state(&mut *self.shell, &self.service, self.command_timeout)
            .await
    }

    async fn transition(&mut self) -> Result<(), TransportError> {
        let output = self
            .shell
            .run(&self.transition_command(), self.command_timeout)
            .await?;
        if output.success() {
            Ok(())
        } else {
            Err(TransportError::Exec {
                status: i32::try_from(output.exit_status).unwrap_or(i32::MAX),
                stderr: output.stderr,
            })
        }
    }
}
