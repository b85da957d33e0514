//! Management-plane observations: SDN cluster, analytics cluster, health.

use quiesce_core::{ClusterOnlineState, HealthSeverity, SdnClusterStatus};
use quiesce_transport::{OpsApi, SdnApi};

use crate::error::ObserveError;

/// One named health group with its mapped severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthGroup {
    /// Group name as reported.
    pub name: String,
    /// Mapped severity.
    pub severity: HealthSeverity,
}

/// Status of the SDN manager cluster.
///
/// The status domain is loose (backends grow new values across releases), so
/// unrecognized statuses map to [`SdnClusterStatus::Unknown`] rather than an
/// error; an unknown status is simply not stable.
///
/// # Errors
///
/// Returns the underlying transport failure unchanged.
pub async fn sdn_cluster_status(api: &dyn SdnApi) -> Result<SdnClusterStatus, ObserveError> {
    let raw = api.cluster_status().await?;
    Ok(SdnClusterStatus::from_api(&raw))
}

/// Online-state of the management cluster.
///
/// # Errors
///
/// Returns the underlying transport failure unchanged.
pub async fn cluster_online_state(api: &dyn OpsApi) -> Result<ClusterOnlineState, ObserveError> {
    let raw = api.online_state().await?;
    Ok(ClusterOnlineState::from_api(&raw))
}

/// Number of objects currently resynchronizing.
///
/// # Errors
///
/// Returns the underlying transport failure unchanged.
pub async fn resync_pending(api: &dyn OpsApi) -> Result<u64, ObserveError> {
    Ok(api.resync_pending().await?)
}

/// Identifiers of the current cluster members, ordered as reported.
///
/// # Errors
///
/// Returns the underlying transport failure unchanged.
pub async fn cluster_members(api: &dyn OpsApi) -> Result<Vec<String>, ObserveError> {
    Ok(api.cluster_members().await?)
}

/// The health summary with severities mapped at this boundary.
///
/// # Errors
///
/// Returns the underlying transport failure unchanged.
pub async fn health_groups(api: &dyn OpsApi) -> Result<Vec<HealthGroup>, ObserveError> {
    let groups = api.health_groups().await?;
    Ok(groups
        .into_iter()
        .map(|dto| HealthGroup {
            severity: HealthSeverity::from_api(&dto.severity),
            name: dto.name,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiesce_transport::{HealthGroupDto, TransportError};

    struct FakeOps {
        state: &'static str,
        groups: Vec<(&'static str, &'static str)>,
    }

    #[async_trait]
    impl OpsApi for FakeOps {
        async fn health_groups(&self) -> Result<Vec<HealthGroupDto>, TransportError> {
            Ok(self
                .groups
                .iter()
                .map(|(name, severity)| HealthGroupDto {
                    name: (*name).to_string(),
                    severity: (*severity).to_string(),
                })
                .collect())
        }

        async fn resync_pending(&self) -> Result<u64, TransportError> {
            Ok(17)
        }

        async fn cluster_members(&self) -> Result<Vec<String>, TransportError> {
            Ok(vec!["node-a".into(), "node-b".into()])
        }

        async fn online_state(&self) -> Result<String, TransportError> {
            Ok(self.state.to_string())
        }

        async fn request_online_state(&self, _desired: &str) -> Result<(), TransportError> {
            Ok(())
        }
    }

    struct FakeSdn(&'static str);

    #[async_trait]
    impl SdnApi for FakeSdn {
        async fn cluster_status(&self) -> Result<String, TransportError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn sdn_status_maps_loosely() {
        assert_eq!(
            sdn_cluster_status(&FakeSdn("STABLE")).await.unwrap(),
            SdnClusterStatus::Stable
        );
        assert_eq!(
            sdn_cluster_status(&FakeSdn("SPLIT_BRAIN")).await.unwrap(),
            SdnClusterStatus::Unknown
        );
    }

    #[tokio::test]
    async fn online_state_maps_loosely() {
        let api = FakeOps {
            state: "OFFLINE",
            groups: vec![],
        };
        assert_eq!(
            cluster_online_state(&api).await.unwrap(),
            ClusterOnlineState::Offline
        );
    }

    #[tokio::test]
    async fn health_groups_map_severities() {
        let api = FakeOps {
            state: "ONLINE",
            groups: vec![("cluster", "green"), ("network", "RED"), ("capacity", "odd")],
        };
        let groups = health_groups(&api).await.unwrap();
        assert_eq!(groups[0].severity, HealthSeverity::Green);
        assert_eq!(groups[1].severity, HealthSeverity::Red);
        assert_eq!(groups[2].severity, HealthSeverity::Unknown);
    }

    #[tokio::test]
    async fn counts_and_members_pass_through() {
        let api = FakeOps {
            state: "ONLINE",
            groups: vec![],
        };
        assert_eq!(resync_pending(&api).await.unwrap(), 17);
        assert_eq!(cluster_members(&api).await.unwrap().len(), 2);
    }
}
