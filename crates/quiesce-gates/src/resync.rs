//! Resync-pending gate.

use quiesce_audit::AuditSink;
use quiesce_observe::manager as observe_manager;
use quiesce_transport::OpsApi;

use crate::error::GateError;

/// Result of one resync read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResyncCheck {
    /// Objects still resynchronizing.
    pub pending: u64,
}

impl ResyncCheck {
    /// Whether the gate passes: nothing left to resynchronize.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        self.pending == 0
    }
}

/// Read the resync-pending count once.
///
/// Deliberately loop-free: higher layers that need to wait for zero compose
/// this gate inside their own poll loop with their own budget.
///
/// # Errors
///
/// Returns the underlying failure when the count cannot be read.
pub async fn resync_pending(api: &dyn OpsApi, audit: &AuditSink) -> Result<ResyncCheck, GateError> {
    let pending = observe_manager::resync_pending(api).await?;
    if pending == 0 {
        audit.info("no objects resynchronizing");
    } else {
        audit.warning(format!("{pending} objects still resynchronizing"));
    }
    Ok(ResyncCheck { pending })
}
