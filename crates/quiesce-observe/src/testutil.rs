//! Scripted in-memory hypervisor for observation tests.

use std::collections::HashMap;

use async_trait::async_trait;
use quiesce_transport::{HypervisorApi, TransportError, VmSummary};

#[derive(Debug, Clone)]
pub struct FakeHost {
    pub connection_state: String,
    pub in_maintenance: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeCluster {
    pub ha_enabled: bool,
    pub drs_automation: String,
    pub settings: HashMap<String, String>,
    pub active_tasks: Vec<String>,
}

/// A hypervisor inventory backed by plain maps.
#[derive(Debug, Default)]
pub struct FakeHypervisor {
    pub vms: Vec<(String, String)>,
    pub hosts: HashMap<String, FakeHost>,
    pub clusters: HashMap<String, FakeCluster>,
    pub inventory_missing: bool,
}

impl FakeHypervisor {
    pub fn with_vms(vms: &[(&str, &str)]) -> Self {
        Self {
            vms: vms
                .iter()
                .map(|(n, s)| ((*n).to_string(), (*s).to_string()))
                .collect(),
            ..Self::default()
        }
    }

    fn not_found(what: &str) -> TransportError {
        TransportError::Api {
            status: 404,
            message: format!("no such {what}"),
        }
    }
}

#[async_trait]
impl HypervisorApi for FakeHypervisor {
    async fn list_vms(&self, _name_filter: Option<&str>) -> Result<Vec<VmSummary>, TransportError> {
        if self.inventory_missing {
            return Err(Self::not_found("inventory"));
        }
        Ok(self
            .vms
            .iter()
            .enumerate()
            .map(|(i, (name, state))| VmSummary {
                vm: format!("vm-{i}"),
                name: name.clone(),
                power_state: state.clone(),
            })
            .collect())
    }

    async fn vm_power_state(&self, vm: &str) -> Result<String, TransportError> {
        self.vms
            .iter()
            .find(|(name, _)| name == vm)
            .map(|(_, state)| state.clone())
            .ok_or_else(|| Self::not_found("vm"))
    }

    async fn power_on_vm(&self, _vm: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn power_off_vm(&self, _vm: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn shutdown_guest(&self, _vm: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn host_connection_state(&self, host: &str) -> Result<String, TransportError> {
        self.hosts
            .get(host)
            .map(|h| h.connection_state.clone())
            .ok_or_else(|| Self::not_found("host"))
    }

    async fn connect_host(&self, _host: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn disconnect_host(&self, _host: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn host_maintenance_flag(&self, host: &str) -> Result<bool, TransportError> {
        self.hosts
            .get(host)
            .map(|h| h.in_maintenance)
            .ok_or_else(|| Self::not_found("host"))
    }

    async fn enter_maintenance(&self, _host: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn exit_maintenance(&self, _host: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn ha_flag(&self, cluster: &str) -> Result<bool, TransportError> {
        self.clusters
            .get(cluster)
            .map(|c| c.ha_enabled)
            .ok_or_else(|| Self::not_found("cluster"))
    }

    async fn set_ha_flag(&self, _cluster: &str, _enabled: bool) -> Result<(), TransportError> {
        Ok(())
    }

    async fn drs_automation_level(&self, cluster: &str) -> Result<String, TransportError> {
        self.clusters
            .get(cluster)
            .map(|c| c.drs_automation.clone())
            .ok_or_else(|| Self::not_found("cluster"))
    }

    async fn set_drs_automation_level(
        &self,
        _cluster: &str,
        _level: &str,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    async fn advanced_setting(
        &self,
        cluster: &str,
        key: &str,
    ) -> Result<Option<String>, TransportError> {
        let cluster = self
            .clusters
            .get(cluster)
            .ok_or_else(|| Self::not_found("cluster"))?;
        Ok(cluster.settings.get(key).cloned())
    }

    async fn set_advanced_setting(
        &self,
        _cluster: &str,
        _key: &str,
        _value: &str,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    async fn active_cluster_tasks(&self, cluster: &str) -> Result<Vec<String>, TransportError> {
        self.clusters
            .get(cluster)
            .map(|c| c.active_tasks.clone())
            .ok_or_else(|| Self::not_found("cluster"))
    }
}
