//! The return contract of every convergence operation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal outcome of a convergence operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceOutcome {
    /// The target was already in the desired state; no transition command
    /// was issued.
    AlreadyConverged,
    /// A fresh observation confirmed the desired state within budget.
    Converged,
    /// The attempt budget was exhausted without reaching the desired state.
    TimedOut,
    /// The named resource does not exist in the target's inventory.
    TargetNotFound,
    /// A non-transient transport failure stopped the operation.
    TransportFailure,
}

impl ConvergenceOutcome {
    /// Whether the target ended up in the desired state.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::AlreadyConverged | Self::Converged)
    }
}

impl fmt::Display for ConvergenceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AlreadyConverged => "already converged",
            Self::Converged => "converged",
            Self::TimedOut => "timed out",
            Self::TargetNotFound => "target not found",
            Self::TransportFailure => "transport failure",
        };
        f.write_str(name)
    }
}

/// Result of driving one target toward a desired state.
///
/// Carries the last observed state (when any observation succeeded) and the
/// number of poll attempts consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceReport<S> {
    /// Terminal outcome.
    pub outcome: ConvergenceOutcome,
    /// The most recent successfully observed state, if any.
    pub last_observed: Option<S>,
    /// Number of observation polls performed after the transition command.
    pub attempts: u32,
}

impl<S> ConvergenceReport<S> {
    /// The target was already in the desired state.
    #[must_use]
    pub const fn already_converged(observed: S) -> Self {
        Self {
            outcome: ConvergenceOutcome::AlreadyConverged,
            last_observed: Some(observed),
            attempts: 0,
        }
    }

    /// A fresh observation confirmed the desired state.
    #[must_use]
    pub const fn converged(observed: S, attempts: u32) -> Self {
        Self {
            outcome: ConvergenceOutcome::Converged,
            last_observed: Some(observed),
            attempts,
        }
    }

    /// The attempt budget ran out.
    #[must_use]
    pub const fn timed_out(last_observed: Option<S>, attempts: u32) -> Self {
        Self {
            outcome: ConvergenceOutcome::TimedOut,
            last_observed,
            attempts,
        }
    }

    /// The resource was not found.
    #[must_use]
    pub const fn target_not_found(attempts: u32) -> Self {
        Self {
            outcome: ConvergenceOutcome::TargetNotFound,
            last_observed: None,
            attempts,
        }
    }

    /// A non-transient transport failure stopped the operation.
    #[must_use]
    pub const fn transport_failure(last_observed: Option<S>, attempts: u32) -> Self {
        Self {
            outcome: ConvergenceOutcome::TransportFailure,
            last_observed,
            attempts,
        }
    }

    /// Whether the target ended up in the desired state.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
