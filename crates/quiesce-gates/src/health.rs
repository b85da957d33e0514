//! Cluster health aggregate gate.

use std::time::Duration;

use quiesce_audit::AuditSink;
use quiesce_core::HealthSeverity;
use quiesce_observe::{manager as observe_manager, HealthGroup};
use quiesce_transport::OpsApi;

use crate::error::GateError;

/// Bounded retry budget for reaching the health service itself.
///
/// This budget is separate from any convergence attempt budget: it covers
/// the health service still initializing after a cold boot. Exhausting it is
/// a hard [`GateError::BackendNotReady`], not a timeout.
#[derive(Debug, Clone)]
pub struct BackendRetryPolicy {
    /// Connection attempts before giving up.
    pub connect_attempts: u32,
    /// Fixed backoff between attempts, in seconds.
    pub connect_backoff_secs: u64,
}

impl BackendRetryPolicy {
    /// The health service after a cold boot: 12 attempts, 10s apart.
    #[must_use]
    pub const fn health_service() -> Self {
        Self {
            connect_attempts: 12,
            connect_backoff_secs: 10,
        }
    }

    /// The fixed backoff as a [`Duration`].
    #[must_use]
    pub const fn connect_backoff(&self) -> Duration {
        Duration::from_secs(self.connect_backoff_secs)
    }
}

impl Default for BackendRetryPolicy {
    fn default() -> Self {
        Self::health_service()
    }
}

/// Aggregate health verdict with the per-group breakdown.
#[derive(Debug, Clone)]
pub struct HealthVerdict {
    /// The aggregate severity: red if any group is red, else green.
    pub overall: HealthSeverity,
    /// Every group as reported, for diagnostics.
    pub groups: Vec<HealthGroup>,
}

impl HealthVerdict {
    /// Whether the gate passes.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.overall == HealthSeverity::Green
    }
}

/// Aggregate a set of group severities: any red dominates, everything else
/// counts as green.
#[must_use]
pub fn aggregate_severity(groups: &[HealthGroup]) -> HealthSeverity {
    if groups
        .iter()
        .any(|group| group.severity == HealthSeverity::Red)
    {
        HealthSeverity::Red
    } else {
        HealthSeverity::Green
    }
}

/// Evaluate the cluster health aggregate.
///
/// The *connection* to the health service retries on the gate's own bounded
/// budget with a fixed backoff; the health *result* is evaluated exactly
/// once from the first successful fetch. A red aggregate is returned as a
/// verdict, not an error — the caller decides fatality.
///
/// # Errors
///
/// Returns [`GateError::BackendNotReady`] when the health service never
/// answers, or the underlying failure when it answers with a non-retryable
/// error.
pub async fn cluster_health(
    api: &dyn OpsApi,
    retry: &BackendRetryPolicy,
    audit: &AuditSink,
) -> Result<HealthVerdict, GateError> {
    let mut attempt = 0u32;
    let groups = loop {
        attempt += 1;
        match observe_manager::health_groups(api).await {
            Ok(groups) => break groups,
            Err(err) if err.is_transient() => {
                if attempt >= retry.connect_attempts {
                    audit.error(format!(
                        "health service not ready after {attempt} connection attempts"
                    ));
                    return Err(GateError::BackendNotReady { attempts: attempt });
                }
                audit.warning(format!(
                    "health service not answering (attempt {attempt}/{}): {err}",
                    retry.connect_attempts
                ));
                tokio::time::sleep(retry.connect_backoff()).await;
            }
            Err(err) => {
                audit.error(format!("health query failed: {err}"));
                return Err(err.into());
            }
        }
    };

    let overall = aggregate_severity(&groups);
    if overall == HealthSeverity::Green {
        audit.info(format!("cluster health is green across {} groups", groups.len()));
    } else {
        let red: Vec<&str> = groups
            .iter()
            .filter(|g| g.severity == HealthSeverity::Red)
            .map(|g| g.name.as_str())
            .collect();
        audit.error(format!("cluster health is red: {}", red.join(", ")));
    }

    Ok(HealthVerdict { overall, groups })
}
