//! SDN manager cluster stability gate.
//!
//! After a cold boot the SDN manager takes minutes to answer at all, and
//! minutes more for its cluster services to re-form. The gate walks a small
//! state machine:
//!
//! ```text
//! Unreachable ──(any successful poll)──▶ ReachableNotStable ──(STABLE)──▶ Stable
//!     │ connection error: stay,                │ not yet stable: stay, backoff
//!     │ long backoff                           │ shortens after settle_threshold
//!     ▼                                        ▼ consecutive successes
//! ```
//!
//! The long backoff while unreachable avoids hammering the manager's
//! credential lockout policy right after boot; polling tightens once
//! liveness is established.

use std::time::Duration;

use quiesce_audit::AuditSink;
use quiesce_core::{ConvergenceReport, SdnClusterStatus};
use quiesce_observe::manager as observe_manager;
use quiesce_transport::SdnApi;

/// Phase of the stability gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilityPhase {
    /// No poll has succeeded yet; the manager may still be booting.
    Unreachable,
    /// The manager answers but the cluster is not yet stable.
    ReachableNotStable,
    /// Terminal: the cluster reported the stable marker.
    Stable,
}

/// Budget and backoff schedule for the stability gate.
#[derive(Debug, Clone)]
pub struct StabilityPolicy {
    /// Maximum polls before giving up.
    pub max_attempts: u32,
    /// Backoff while the manager is unreachable, in seconds.
    pub unreachable_backoff_secs: u64,
    /// Backoff while reachable but not yet stable, in seconds.
    pub settling_backoff_secs: u64,
    /// Backoff once `settle_threshold` polls have succeeded, in seconds.
    pub settled_backoff_secs: u64,
    /// Successful polls before the backoff shortens.
    pub settle_threshold: u32,
}

impl StabilityPolicy {
    /// The observed production schedule: 20 polls, 90s while unreachable,
    /// 60s while settling, 30s once liveness is established.
    #[must_use]
    pub const fn sdn_cluster() -> Self {
        Self {
            max_attempts: 20,
            unreachable_backoff_secs: 90,
            settling_backoff_secs: 60,
            settled_backoff_secs: 30,
            settle_threshold: 3,
        }
    }
}

impl Default for StabilityPolicy {
    fn default() -> Self {
        Self::sdn_cluster()
    }
}

/// The backoff to apply after a poll, given the phase reached and the number
/// of successful polls so far.
#[must_use]
pub fn next_backoff(
    policy: &StabilityPolicy,
    phase: StabilityPhase,
    successful_polls: u32,
) -> Duration {
    match phase {
        StabilityPhase::Unreachable => Duration::from_secs(policy.unreachable_backoff_secs),
        StabilityPhase::ReachableNotStable => {
            if successful_polls < policy.settle_threshold {
                Duration::from_secs(policy.settling_backoff_secs)
            } else {
                Duration::from_secs(policy.settled_backoff_secs)
            }
        }
        StabilityPhase::Stable => Duration::ZERO,
    }
}

/// Poll the SDN manager until its cluster reports stable.
///
/// Connection failures keep the gate in the unreachable phase with the long
/// backoff; successful-but-unstable answers move it to the settling phase,
/// whose backoff shortens as successes accumulate. Exhausting the budget in
/// any non-terminal phase is a timeout; a non-transient failure (for
/// example rejected credentials) is terminal immediately.
pub async fn await_cluster_stable(
    api: &dyn SdnApi,
    policy: &StabilityPolicy,
    audit: &AuditSink,
) -> ConvergenceReport<SdnClusterStatus> {
    audit.info("waiting for SDN manager cluster to stabilize");

    let mut phase = StabilityPhase::Unreachable;
    let mut successful_polls = 0u32;
    let mut last_status = None;
    let mut attempts = 0u32;

    while attempts < policy.max_attempts {
        attempts += 1;

        match observe_manager::sdn_cluster_status(api).await {
            Ok(status) => {
                successful_polls += 1;
                last_status = Some(status);
                if status.is_stable() {
                    audit.info(format!(
                        "SDN manager cluster stable after {attempts} polls"
                    ));
                    return ConvergenceReport::converged(status, attempts);
                }
                if phase == StabilityPhase::Unreachable {
                    audit.info("SDN manager reachable, cluster not yet stable");
                }
                phase = StabilityPhase::ReachableNotStable;
                tracing::debug!(%status, attempts, "cluster still settling");
            }
            Err(err) if err.is_transient() => {
                audit.warning(format!(
                    "SDN manager not answering (attempt {attempts}): {err}"
                ));
            }
            Err(err) => {
                audit.error(format!("SDN manager query failed: {err}"));
                return ConvergenceReport::transport_failure(last_status, attempts);
            }
        }

        tokio::time::sleep(next_backoff(policy, phase, successful_polls)).await;
    }

    audit.warning(format!(
        "SDN manager cluster did not stabilize within {attempts} polls"
    ));
    ConvergenceReport::timed_out(last_status, attempts)
}
