//! Virtual machine power operations.

use async_trait::async_trait;
use quiesce_audit::AuditSink;
use quiesce_core::{ConvergencePolicy, PowerState, VmSelector};
use quiesce_observe::{vm as observe_vm, ObserveError};
use quiesce_transport::{HypervisorApi, TransportError};

use crate::engine::{converge, Convergent};
use crate::multi::TargetReport;

/// Drives one VM to a desired power state.
pub struct VmPowerOp<'a> {
    api: &'a dyn HypervisorApi,
    vm: String,
    desired: PowerState,
    graceful: bool,
}

impl<'a> VmPowerOp<'a> {
    /// Bind a VM to the management API.
    ///
    /// `graceful` selects an in-guest shutdown over a hard power-off when
    /// the desired state is [`PowerState::PoweredOff`]; it has no effect on
    /// power-on.
    #[must_use]
    pub fn new(
        api: &'a dyn HypervisorApi,
        vm: impl Into<String>,
        desired: PowerState,
        graceful: bool,
    ) -> Self {
        Self {
            api,
            vm: vm.into(),
            desired,
            graceful,
        }
    }
}

#[async_trait]
impl Convergent for VmPowerOp<'_> {
    type State = PowerState;

    fn describe(&self) -> String {
        format!("virtual machine '{}'", self.vm)
    }

    async fn observe(&mut self) -> Result<PowerState, ObserveError> {
        observe_vm::vm_power_state(self.api, &self.vm).await
    }

    async fn transition(&mut self) -> Result<(), TransportError> {
        match self.desired {
            PowerState::PoweredOn => self.api.power_on_vm(&self.vm).await,
            PowerState::PoweredOff if self.graceful => self.api.shutdown_guest(&self.vm).await,
            PowerState::PoweredOff => self.api.power_off_vm(&self.vm).await,
            PowerState::Suspended => Err(TransportError::Session(
                "suspending a virtual machine is not supported".to_string(),
            )),
        }
    }
}

/// Converge every VM matching the selector, sequentially.
///
/// A defaulted selector over an empty scope is a silent no-op; an explicit
/// pattern that matches nothing is reported as a WARNING skip. Both return
/// an empty report list rather than an error. Per-target failures are
/// collected, never short-circuited.
///
/// # Errors
///
/// Returns an error only when the match set itself cannot be produced
/// (inventory missing, invalid pattern, transport failure on the listing).
pub async fn converge_matching_vms(
    api: &dyn HypervisorApi,
    selector: &VmSelector,
    desired: PowerState,
    graceful: bool,
    policy: &ConvergencePolicy,
    audit: &AuditSink,
) -> Result<Vec<TargetReport<PowerState>>, ObserveError> {
    let matched = observe_vm::vms_matching(api, selector).await?;

    if matched.is_empty() {
        match selector {
            VmSelector::Pattern(pattern) => {
                audit.warning(format!(
                    "pattern '{pattern}' matched no virtual machines; skipping"
                ));
            }
            VmSelector::Defaulted => {
                tracing::debug!("no virtual machines in scope; nothing to do");
            }
        }
        return Ok(Vec::new());
    }

    let mut reports = Vec::new();
    for (name, _observed) in matched {
        let mut op = VmPowerOp::new(api, name.clone(), desired, graceful);
        let report = converge(&mut op, &desired, policy, audit).await;
        reports.push(TargetReport { name, report });
    }
    Ok(reports)
}
