//! Management-cluster online-state operations.

use async_trait::async_trait;
use quiesce_core::ClusterOnlineState;
use quiesce_observe::{manager as observe_manager, ObserveError};
use quiesce_transport::{OpsApi, TransportError};

use crate::engine::Convergent;

/// Drives the management cluster's online-state.
///
/// The transition request goes to the lifecycle manager; the state is read
/// back from the analytics cluster itself, which answers slowly while its
/// services start or drain — hence the long-cadence
/// [`quiesce_core::ConvergencePolicy::cluster_online`] preset.
pub struct ClusterOnlineOp<'a> {
    api: &'a dyn OpsApi,
    cluster: String,
    desired: ClusterOnlineState,
}

impl<'a> ClusterOnlineOp<'a> {
    /// Bind the management cluster to its analytics API.
    #[must_use]
    pub fn new(
        api: &'a dyn OpsApi,
        cluster: impl Into<String>,
        desired: ClusterOnlineState,
    ) -> Self {
        Self {
            api,
            cluster: cluster.into(),
            desired,
        }
    }
}

#[async_trait]
impl Convergent for ClusterOnlineOp<'_> {
    type State = ClusterOnlineState;

    fn describe(&self) -> String {
        format!("management cluster '{}'", self.cluster)
    }

    async fn observe(&mut self) -> Result<ClusterOnlineState, ObserveError> {
        observe_manager::cluster_online_state(self.api).await
    }

    async fn transition(&mut self) -> Result<(), TransportError> {
        let desired = match self.desired {
            ClusterOnlineState::Online => "ONLINE",
            ClusterOnlineState::Offline => "OFFLINE",
            ClusterOnlineState::Unknown => {
                return Err(TransportError::Session(
                    "'unknown' is an observed state, not a valid goal".to_string(),
                ))
            }
        };
        self.api.request_online_state(desired).await
    }
}
