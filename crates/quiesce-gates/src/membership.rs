//! Cluster-membership gate.

use std::collections::HashSet;

use quiesce_audit::AuditSink;
use quiesce_observe::manager as observe_manager;
use quiesce_transport::OpsApi;

use crate::error::GateError;

/// Presence result for one expected member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberCheck {
    /// The expected member identifier.
    pub member: String,
    /// Whether it appears in the observed membership list.
    pub present: bool,
}

/// Check every expected member against the observed membership list.
///
/// Every member is checked and reported individually — no aggregate
/// short-circuit — so a partial-membership problem is diagnosable member by
/// member rather than as one opaque failure.
///
/// # Errors
///
/// Returns the underlying failure when the membership list cannot be read.
pub async fn check_membership(
    api: &dyn OpsApi,
    expected: &[String],
    audit: &AuditSink,
) -> Result<Vec<MemberCheck>, GateError> {
    let observed = observe_manager::cluster_members(api).await?;
    let observed: HashSet<&str> = observed.iter().map(String::as_str).collect();

    let mut checks = Vec::with_capacity(expected.len());
    for member in expected {
        let present = observed.contains(member.as_str());
        if present {
            audit.info(format!("member '{member}' present in cluster"));
        } else {
            audit.warning(format!("member '{member}' missing from cluster"));
        }
        checks.push(MemberCheck {
            member: member.clone(),
            present,
        });
    }
    Ok(checks)
}

/// Whether every expected member was present.
#[must_use]
pub fn all_present(checks: &[MemberCheck]) -> bool {
    checks.iter().all(|check| check.present)
}
