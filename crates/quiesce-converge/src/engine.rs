//! The generic convergence engine.

use std::fmt;

use async_trait::async_trait;
use quiesce_audit::AuditSink;
use quiesce_core::{ConvergencePolicy, ConvergenceReport};
use quiesce_observe::ObserveError;
use quiesce_transport::TransportError;

/// A target that can be driven toward a desired state.
///
/// Implementations bind one remote resource to one transport adapter for the
/// duration of one operation. `observe` must be side-effect-free on the
/// remote system; `transition` is a one-shot command that the engine never
/// retries — correctness is established purely by repeated observation.
#[async_trait]
pub trait Convergent: Send {
    /// The state domain of this target kind.
    type State: PartialEq + Clone + fmt::Display + Send + Sync;

    /// Human-readable identity for the audit trail.
    fn describe(&self) -> String;

    /// Read the target's current state.
    async fn observe(&mut self) -> Result<Self::State, ObserveError>;

    /// Issue the one-shot transition command toward the desired state.
    async fn transition(&mut self) -> Result<(), TransportError>;

    /// Whether convergence may be declared from a matching observation.
    ///
    /// Maintenance-mode and HA operations override this to check for a
    /// cluster-level reconfiguration task still running; a matching state
    /// read while the task is in flight is treated as not-yet-converged.
    async fn settled(&mut self) -> Result<bool, ObserveError> {
        Ok(true)
    }
}

/// Drive a target to `desired` under the given policy.
///
/// The algorithm: observe once; short-circuit to `AlreadyConverged` when the
/// target is already there (and settled) without issuing any command;
/// otherwise issue the transition command once and poll — sleep, observe,
/// compare — until the state matches or the attempt budget runs out.
///
/// Transient transport failures anywhere in the loop are swallowed within
/// the existing cadence; a missing target and non-transient failures are
/// terminal. Every terminal outcome is audited and returned in the report;
/// the engine never escalates beyond returning it.
pub async fn converge<T: Convergent>(
    target: &mut T,
    desired: &T::State,
    policy: &ConvergencePolicy,
    audit: &AuditSink,
) -> ConvergenceReport<T::State> {
    let what = target.describe();
    let mut last_observed: Option<T::State> = None;

    match target.observe().await {
        Ok(state) => {
            last_observed = Some(state.clone());
            if state == *desired {
                match target.settled().await {
                    Ok(true) => {
                        audit.info(format!("{what} is already {desired}; nothing to do"));
                        return ConvergenceReport::already_converged(state);
                    }
                    Ok(false) => {
                        audit.info(format!(
                            "{what} reports {desired} but a reconfiguration is still running; waiting"
                        ));
                    }
                    Err(err) if err.is_transient() => {
                        audit.warning(format!("{what}: settle check failed transiently: {err}"));
                    }
                    Err(err) => {
                        audit.error(format!("{what}: settle check failed: {err}"));
                        return ConvergenceReport::transport_failure(last_observed, 0);
                    }
                }
            }
        }
        Err(err) if err.is_not_found() => {
            audit.error(format!("{what} not found; no transition attempted"));
            return ConvergenceReport::target_not_found(0);
        }
        Err(err) if err.is_transient() => {
            audit.warning(format!(
                "{what}: initial observation failed transiently: {err}"
            ));
        }
        Err(err) => {
            audit.error(format!("{what}: observation failed: {err}"));
            return ConvergenceReport::transport_failure(None, 0);
        }
    }

    // The command is issued only when the last good observation shows drift;
    // a target seen at the desired state (settling or not) is never commanded.
    let already_at_desired = last_observed.as_ref() == Some(desired);
    if !already_at_desired {
        audit.info(format!("driving {what} to {desired}"));
        match target.transition().await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                audit.error(format!("{what} not found; no transition attempted"));
                return ConvergenceReport::target_not_found(0);
            }
            Err(err) if err.is_transient() => {
                audit.warning(format!(
                    "{what}: transition command failed transiently ({err}); relying on observation"
                ));
            }
            Err(err) => {
                audit.error(format!("{what}: transition command failed: {err}"));
                return ConvergenceReport::transport_failure(last_observed, 0);
            }
        }
    }

    let mut attempts = 0u32;
    while attempts < policy.max_attempts {
        tokio::time::sleep(policy.poll_interval()).await;
        attempts += 1;

        match target.observe().await {
            Ok(state) => {
                last_observed = Some(state.clone());
                if state == *desired {
                    match target.settled().await {
                        Ok(true) => {
                            audit.info(format!(
                                "{what} reached {desired} after {attempts} polls"
                            ));
                            return ConvergenceReport::converged(state, attempts);
                        }
                        Ok(false) => {
                            audit.info(format!(
                                "{what} at {desired}, reconfiguration still running"
                            ));
                        }
                        Err(err) if err.is_transient() => {
                            audit.warning(format!(
                                "{what}: settle check failed transiently: {err}"
                            ));
                        }
                        Err(err) => {
                            audit.error(format!("{what}: settle check failed: {err}"));
                            return ConvergenceReport::transport_failure(last_observed, attempts);
                        }
                    }
                } else {
                    tracing::debug!(target = %what, observed = %state, "not yet converged");
                }
            }
            Err(err) if err.is_not_found() => {
                audit.error(format!("{what} disappeared while converging"));
                return ConvergenceReport::target_not_found(attempts);
            }
            Err(err) if err.is_transient() => {
                audit.warning(format!(
                    "{what}: poll {attempts} failed transiently: {err}"
                ));
            }
            Err(err) => {
                audit.error(format!("{what}: observation failed: {err}"));
                return ConvergenceReport::transport_failure(last_observed, attempts);
            }
        }
    }

    let seen = last_observed.as_ref().map_or_else(
        || "no successful observation".to_string(),
        |state| format!("last observed {state}"),
    );
    audit.warning(format!(
        "{what} did not reach {desired} within {attempts} polls; {seen}"
    ));
    ConvergenceReport::timed_out(last_observed, attempts)
}
