//! Sequential convergence of independent target lists.

use quiesce_audit::AuditSink;
use quiesce_core::{ConvergencePolicy, ConvergenceReport};

use crate::engine::{converge, Convergent};

/// The report for one named target out of a list.
#[derive(Debug, Clone)]
pub struct TargetReport<S> {
    /// The target's name.
    pub name: String,
    /// Its convergence report.
    pub report: ConvergenceReport<S>,
}

/// Converge a list of independent targets sequentially.
///
/// One target's failure never aborts its siblings: every target is driven to
/// completion and every report is collected. The caller inspects the reports
/// to decide fatality.
pub async fn converge_each<T: Convergent>(
    targets: impl IntoIterator<Item = (String, T)>,
    desired: &T::State,
    policy: &ConvergencePolicy,
    audit: &AuditSink,
) -> Vec<TargetReport<T::State>> {
    let mut reports = Vec::new();
    for (name, mut target) in targets {
        let report = converge(&mut target, desired, policy, audit).await;
        reports.push(TargetReport { name, report });
    }
    reports
}
