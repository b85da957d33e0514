//! Poll-loop budgets for convergence operations.
//!
//! Every convergence loop is bounded by a policy: a poll cadence, a finite
//! attempt count, and a transport-level timeout for each individual call.
//! The per-operation-family cadences observed in production are preserved
//! here as named presets rather than folded into one schedule; the numbers
//! differ deliberately (a VM power transition settles in seconds, an HA
//! reconfiguration in minutes).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Budget for one convergence operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergencePolicy {
    /// Seconds to sleep between observation polls.
    #[serde(default = "ConvergencePolicy::default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Maximum number of observation polls before giving up.
    #[serde(default = "ConvergencePolicy::default_max_attempts")]
    pub max_attempts: u32,

    /// Transport-level timeout for each individual call.
    #[serde(default = "ConvergencePolicy::default_attempt_timeout")]
    pub attempt_timeout_secs: u64,
}

impl ConvergencePolicy {
    const fn default_poll_interval() -> u64 {
        10
    }

    const fn default_max_attempts() -> u32 {
        30
    }

    const fn default_attempt_timeout() -> u64 {
        30
    }

    /// Create a policy from explicit values.
    #[must_use]
    pub const fn new(poll_interval_secs: u64, max_attempts: u32, attempt_timeout_secs: u64) -> Self {
        Self {
            poll_interval_secs,
            max_attempts,
            attempt_timeout_secs,
        }
    }

    /// VM power transitions: 10s cadence, up to 60 polls.
    #[must_use]
    pub const fn vm_power() -> Self {
        Self::new(10, 60, 30)
    }

    /// In-guest shutdown requests settle faster: 5s cadence, up to 60 polls.
    #[must_use]
    pub const fn guest_shutdown() -> Self {
        Self::new(5, 60, 30)
    }

    /// Host maintenance-mode transitions: 10s cadence, up to 60 polls.
    #[must_use]
    pub const fn host_maintenance() -> Self {
        Self::new(10, 60, 60)
    }

    /// Host connect/disconnect: 10s cadence, up to 30 polls.
    #[must_use]
    pub const fn host_connection() -> Self {
        Self::new(10, 30, 30)
    }

    /// HA reconfiguration: 5s cadence, up to 60 polls.
    #[must_use]
    pub const fn ha_reconfigure() -> Self {
        Self::new(5, 60, 30)
    }

    /// DRS and advanced-setting changes apply quickly: 5s cadence, 12 polls.
    #[must_use]
    pub const fn cluster_setting() -> Self {
        Self::new(5, 12, 30)
    }

    /// Appliance service start/stop: 10s cadence, up to 30 polls.
    #[must_use]
    pub const fn service_state() -> Self {
        Self::new(10, 30, 60)
    }

    /// Management-cluster online-state transitions: 30s cadence, 20 polls.
    #[must_use]
    pub const fn cluster_online() -> Self {
        Self::new(30, 20, 60)
    }

    /// The poll cadence as a [`Duration`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// The per-call transport timeout as a [`Duration`].
    #[must_use]
    pub const fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    /// Worst-case wall-clock runtime of a loop under this policy.
    #[must_use]
    pub const fn max_runtime(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs * self.max_attempts as u64)
    }
}

impl Default for ConvergencePolicy {
    fn default() -> Self {
        Self::new(
            Self::default_poll_interval(),
            Self::default_max_attempts(),
            Self::default_attempt_timeout(),
        )
    }
}
