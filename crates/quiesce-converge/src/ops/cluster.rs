//! Cluster-setting operations: HA, DRS automation, advanced settings.

use std::fmt;

use async_trait::async_trait;
use quiesce_core::{DrsAutomationLevel, HaMode};
use quiesce_observe::{cluster as observe_cluster, ObserveError};
use quiesce_transport::{HypervisorApi, TransportError};

use crate::engine::Convergent;

/// Drives a cluster's HA flag.
///
/// HA reconfiguration runs as a cluster-level background task; convergence
/// is declared only once that task is gone, not from the flag alone.
pub struct HaOp<'a> {
    api: &'a dyn HypervisorApi,
    cluster: String,
    desired: HaMode,
}

impl<'a> HaOp<'a> {
    /// Bind a cluster to the management API.
    #[must_use]
    pub fn new(api: &'a dyn HypervisorApi, cluster: impl Into<String>, desired: HaMode) -> Self {
        Self {
            api,
            cluster: cluster.into(),
            desired,
        }
    }
}

#[async_trait]
impl Convergent for HaOp<'_> {
    type State = HaMode;

    fn describe(&self) -> String {
        format!("cluster '{}'", self.cluster)
    }

    async fn observe(&mut self) -> Result<HaMode, ObserveError> {
        observe_cluster::ha_mode(self.api, &self.cluster).await
    }

    async fn transition(&mut self) -> Result<(), TransportError> {
        self.api
            .set_ha_flag(&self.cluster, self.desired == HaMode::Enabled)
            .await
    }

    async fn settled(&mut self) -> Result<bool, ObserveError> {
        Ok(!observe_cluster::reconfiguration_active(self.api, &self.cluster).await?)
    }
}

/// Drives a cluster's DRS automation level.
pub struct DrsAutomationOp<'a> {
    api: &'a dyn HypervisorApi,
    cluster: String,
    desired: DrsAutomationLevel,
}

impl<'a> DrsAutomationOp<'a> {
    /// Bind a cluster to the management API.
    #[must_use]
    pub fn new(
        api: &'a dyn HypervisorApi,
        cluster: impl Into<String>,
        desired: DrsAutomationLevel,
    ) -> Self {
        Self {
            api,
            cluster: cluster.into(),
            desired,
        }
    }
}

#[async_trait]
impl Convergent for DrsAutomationOp<'_> {
    type State = DrsAutomationLevel;

    fn describe(&self) -> String {
        format!("cluster '{}'", self.cluster)
    }

    async fn observe(&mut self) -> Result<DrsAutomationLevel, ObserveError> {
        observe_cluster::drs_automation_level(self.api, &self.cluster).await
    }

    async fn transition(&mut self) -> Result<(), TransportError> {
        self.api
            .set_drs_automation_level(&self.cluster, self.desired.as_api())
            .await
    }
}

/// An advanced-setting value, with "unset" kept distinct from any set value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingValue(pub Option<String>);

impl SettingValue {
    /// A set value.
    #[must_use]
    pub fn set(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    /// The unset marker.
    #[must_use]
    pub const fn unset() -> Self {
        Self(None)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => write!(f, "'{value}'"),
            None => f.write_str("unset"),
        }
    }
}

/// Drives one cluster advanced setting to a value.
pub struct AdvancedSettingOp<'a> {
    api: &'a dyn HypervisorApi,
    cluster: String,
    key: String,
    desired: SettingValue,
}

impl<'a> AdvancedSettingOp<'a> {
    /// Bind a setting key on a cluster.
    #[must_use]
    pub fn new(
        api: &'a dyn HypervisorApi,
        cluster: impl Into<String>,
        key: impl Into<String>,
        desired: SettingValue,
    ) -> Self {
        Self {
            api,
            cluster: cluster.into(),
            key: key.into(),
            desired,
        }
    }
}

#[async_trait]
impl Convergent for AdvancedSettingOp<'_> {
    type State = SettingValue;

    fn describe(&self) -> String {
        format!("setting '{}' on cluster '{}'", self.key, self.cluster)
    }

    async fn observe(&mut self) -> Result<SettingValue, ObserveError> {
        let value = observe_cluster::advanced_setting(self.api, &self.cluster, &self.key).await?;
        Ok(SettingValue(value))
    }

    async fn transition(&mut self) -> Result<(), TransportError> {
        match &self.desired.0 {
            Some(value) => {
                self.api
                    .set_advanced_setting(&self.cluster, &self.key, value)
                    .await
            }
            None => Err(TransportError::Session(
                "clearing an advanced setting is not supported by the management API".to_string(),
            )),
        }
    }
}
