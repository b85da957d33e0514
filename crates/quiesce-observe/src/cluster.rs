//! Cluster-setting observations.

use quiesce_core::{DrsAutomationLevel, HaMode};
use quiesce_transport::HypervisorApi;

use crate::error::{classify, ObserveError};

/// Task descriptions that indicate a cluster-level reconfiguration is still
/// running. Matched case-insensitively against the active task list.
const RECONFIGURATION_MARKERS: &[&str] = &["reconfiguring storage", "configuring availability"];

/// HA mode of a cluster.
///
/// # Errors
///
/// Returns [`ObserveError::NotFound`] when the cluster does not exist.
pub async fn ha_mode(api: &dyn HypervisorApi, cluster: &str) -> Result<HaMode, ObserveError> {
    let flag = api
        .ha_flag(cluster)
        .await
        .map_err(|err| classify(cluster, err))?;
    Ok(HaMode::from_flag(flag))
}

/// DRS automation level of a cluster.
///
/// # Errors
///
/// Returns [`ObserveError::NotFound`] when the cluster does not exist and
/// [`ObserveError::UnexpectedState`] for an out-of-domain level.
pub async fn drs_automation_level(
    api: &dyn HypervisorApi,
    cluster: &str,
) -> Result<DrsAutomationLevel, ObserveError> {
    let raw = api
        .drs_automation_level(cluster)
        .await
        .map_err(|err| classify(cluster, err))?;
    DrsAutomationLevel::from_api(&raw).ok_or_else(|| ObserveError::UnexpectedState {
        target: cluster.to_string(),
        field: "drs_automation",
        raw,
    })
}

/// Value of a cluster advanced setting; `None` when the key is unset.
///
/// # Errors
///
/// Returns [`ObserveError::NotFound`] when the cluster does not exist.
pub async fn advanced_setting(
    api: &dyn HypervisorApi,
    cluster: &str,
    key: &str,
) -> Result<Option<String>, ObserveError> {
    api.advanced_setting(cluster, key)
        .await
        .map_err(|err| classify(cluster, err))
}

/// Whether a cluster-level reconfiguration task is still running.
///
/// Used as the guard before trusting a single maintenance-mode or HA state
/// read: a cluster that reports the desired flag while "configuring
/// availability" is still in flight has not converged yet.
///
/// # Errors
///
/// Returns [`ObserveError::NotFound`] when the cluster does not exist.
pub async fn reconfiguration_active(
    api: &dyn HypervisorApi,
    cluster: &str,
) -> Result<bool, ObserveError> {
    let tasks = api
        .active_cluster_tasks(cluster)
        .await
        .map_err(|err| classify(cluster, err))?;
    Ok(tasks.iter().any(|task| {
        let task = task.to_ascii_lowercase();
        RECONFIGURATION_MARKERS
            .iter()
            .any(|marker| task.contains(marker))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeCluster, FakeHypervisor};

    fn api_with_cluster(cluster: FakeCluster) -> FakeHypervisor {
        let mut api = FakeHypervisor::default();
        api.clusters.insert("mgmt".to_string(), cluster);
        api
    }

    #[tokio::test]
    async fn ha_and_drs_map() {
        let api = api_with_cluster(FakeCluster {
            ha_enabled: true,
            drs_automation: "FULLY_AUTOMATED".into(),
            ..FakeCluster::default()
        });

        assert_eq!(ha_mode(&api, "mgmt").await.unwrap(), HaMode::Enabled);
        assert_eq!(
            drs_automation_level(&api, "mgmt").await.unwrap(),
            DrsAutomationLevel::FullyAutomated
        );
    }

    #[tokio::test]
    async fn unset_setting_is_none() {
        let api = api_with_cluster(FakeCluster::default());
        let value = advanced_setting(&api, "mgmt", "das.heartbeatDsPerHost")
            .await
            .unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn reconfiguration_marker_detected() {
        let api = api_with_cluster(FakeCluster {
            active_tasks: vec!["Configuring Availability on cluster mgmt".into()],
            ..FakeCluster::default()
        });
        assert!(reconfiguration_active(&api, "mgmt").await.unwrap());

        let api = api_with_cluster(FakeCluster {
            active_tasks: vec!["Rebalancing virtual machines".into()],
            ..FakeCluster::default()
        });
        assert!(!reconfiguration_active(&api, "mgmt").await.unwrap());
    }

    #[tokio::test]
    async fn missing_cluster_is_not_found() {
        let api = FakeHypervisor::default();
        let err = ha_mode(&api, "ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
