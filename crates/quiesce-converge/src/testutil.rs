//! Stateful in-memory hypervisor for operation tests.
//!
//! Transition commands mutate the fake inventory, so a convergence loop
//! observes the effect on its next poll.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use quiesce_core::PowerState;
use quiesce_transport::{HypervisorApi, TransportError, VmSummary};

#[derive(Debug, Clone)]
pub struct HostEntry {
    pub connection_state: String,
    pub in_maintenance: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ClusterEntry {
    pub ha_enabled: bool,
    pub drs_automation: String,
    pub settings: HashMap<String, String>,
    /// Task lists returned by successive settle checks; the last entry
    /// repeats once the script is exhausted.
    pub task_script: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct Inner {
    pub vms: Vec<(String, PowerState)>,
    pub hosts: HashMap<String, HostEntry>,
    pub clusters: HashMap<String, ClusterEntry>,
    pub task_reads: usize,
    pub commands: Vec<String>,
}

/// A hypervisor whose commands take effect immediately.
#[derive(Debug, Default)]
pub struct StatefulHypervisor {
    pub inner: Mutex<Inner>,
}

impl StatefulHypervisor {
    pub fn with_vms(vms: &[(&str, PowerState)]) -> Self {
        let fake = Self::default();
        fake.inner.lock().vms = vms
            .iter()
            .map(|(n, s)| ((*n).to_string(), *s))
            .collect();
        fake
    }

    pub fn with_host(host: &str, connection_state: &str, in_maintenance: bool) -> Self {
        let fake = Self::default();
        fake.inner.lock().hosts.insert(
            host.to_string(),
            HostEntry {
                connection_state: connection_state.to_string(),
                in_maintenance,
            },
        );
        fake
    }

    pub fn with_cluster(cluster: &str, entry: ClusterEntry) -> Self {
        let fake = Self::default();
        fake.inner.lock().clusters.insert(cluster.to_string(), entry);
        fake
    }

    pub fn commands(&self) -> Vec<String> {
        self.inner.lock().commands.clone()
    }

    fn not_found(what: &str) -> TransportError {
        TransportError::Api {
            status: 404,
            message: format!("no such {what}"),
        }
    }

    fn raw_power(state: PowerState) -> String {
        match state {
            PowerState::PoweredOn => "POWERED_ON".to_string(),
            PowerState::PoweredOff => "POWERED_OFF".to_string(),
            PowerState::Suspended => "SUSPENDED".to_string(),
        }
    }

    fn set_vm(&self, vm: &str, state: PowerState) {
        for entry in &mut self.inner.lock().vms {
            if entry.0 == vm {
                entry.1 = state;
            }
        }
    }
}

#[async_trait]
impl HypervisorApi for StatefulHypervisor {
    async fn list_vms(&self, _name_filter: Option<&str>) -> Result<Vec<VmSummary>, TransportError> {
        Ok(self
            .inner
            .lock()
            .vms
            .iter()
            .enumerate()
            .map(|(i, (name, state))| VmSummary {
                vm: format!("vm-{i}"),
                name: name.clone(),
                power_state: Self::raw_power(*state),
            })
            .collect())
    }

    async fn vm_power_state(&self, vm: &str) -> Result<String, TransportError> {
        self.inner
            .lock()
            .vms
            .iter()
            .find(|(name, _)| name == vm)
            .map(|(_, state)| Self::raw_power(*state))
            .ok_or_else(|| Self::not_found("vm"))
    }

    async fn power_on_vm(&self, vm: &str) -> Result<(), TransportError> {
        self.inner.lock().commands.push(format!("power_on {vm}"));
        self.set_vm(vm, PowerState::PoweredOn);
        Ok(())
    }

    async fn power_off_vm(&self, vm: &str) -> Result<(), TransportError> {
        self.inner.lock().commands.push(format!("power_off {vm}"));
        self.set_vm(vm, PowerState::PoweredOff);
        Ok(())
    }

    async fn shutdown_guest(&self, vm: &str) -> Result<(), TransportError> {
        self.inner.lock().commands.push(format!("shutdown_guest {vm}"));
        self.set_vm(vm, PowerState::PoweredOff);
        Ok(())
    }

    async fn host_connection_state(&self, host: &str) -> Result<String, TransportError> {
        self.inner
            .lock()
            .hosts
            .get(host)
            .map(|h| h.connection_state.clone())
            .ok_or_else(|| Self::not_found("host"))
    }

    async fn connect_host(&self, host: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.commands.push(format!("connect {host}"));
        match inner.hosts.get_mut(host) {
            Some(h) => {
                h.connection_state = "CONNECTED".to_string();
                Ok(())
            }
            None => Err(Self::not_found("host")),
        }
    }

    async fn disconnect_host(&self, host: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.commands.push(format!("disconnect {host}"));
        match inner.hosts.get_mut(host) {
            Some(h) => {
                h.connection_state = "DISCONNECTED".to_string();
                Ok(())
            }
            None => Err(Self::not_found("host")),
        }
    }

    async fn host_maintenance_flag(&self, host: &str) -> Result<bool, TransportError> {
        self.inner
            .lock()
            .hosts
            .get(host)
            .map(|h| h.in_maintenance)
            .ok_or_else(|| Self::not_found("host"))
    }

    async fn enter_maintenance(&self, host: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.commands.push(format!("enter_maintenance {host}"));
        match inner.hosts.get_mut(host) {
            Some(h) => {
                h.in_maintenance = true;
                Ok(())
            }
            None => Err(Self::not_found("host")),
        }
    }

    async fn exit_maintenance(&self, host: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.commands.push(format!("exit_maintenance {host}"));
        match inner.hosts.get_mut(host) {
            Some(h) => {
                h.in_maintenance = false;
                Ok(())
            }
            None => Err(Self::not_found("host")),
        }
    }

    async fn ha_flag(&self, cluster: &str) -> Result<bool, TransportError> {
        self.inner
            .lock()
            .clusters
            .get(cluster)
            .map(|c| c.ha_enabled)
            .ok_or_else(|| Self::not_found("cluster"))
    }

    async fn set_ha_flag(&self, cluster: &str, enabled: bool) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.commands.push(format!("set_ha {cluster} {enabled}"));
        match inner.clusters.get_mut(cluster) {
            Some(c) => {
                c.ha_enabled = enabled;
                Ok(())
            }
            None => Err(Self::not_found("cluster")),
        }
    }

    async fn drs_automation_level(&self, cluster: &str) -> Result<String, TransportError> {
        self.inner
            .lock()
            .clusters
            .get(cluster)
            .map(|c| c.drs_automation.clone())
            .ok_or_else(|| Self::not_found("cluster"))
    }

    async fn set_drs_automation_level(
        &self,
        cluster: &str,
        level: &str,
    ) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.commands.push(format!("set_drs {cluster} {level}"));
        match inner.clusters.get_mut(cluster) {
            Some(c) => {
                c.drs_automation = level.to_string();
                Ok(())
            }
            None => Err(Self::not_found("cluster")),
        }
    }

    async fn advanced_setting(
        &self,
        cluster: &str,
        key: &str,
    ) -> Result<Option<String>, TransportError> {
        let inner = self.inner.lock();
        let cluster = inner
            .clusters
            .get(cluster)
            .ok_or_else(|| Self::not_found("cluster"))?;
        Ok(cluster.settings.get(key).cloned())
    }

    async fn set_advanced_setting(
        &self,
        cluster: &str,
        key: &str,
        value: &str,
    ) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner
            .commands
            .push(format!("set_setting {cluster} {key}={value}"));
        match inner.clusters.get_mut(cluster) {
            Some(c) => {
                c.settings.insert(key.to_string(), value.to_string());
                Ok(())
            }
            None => Err(Self::not_found("cluster")),
        }
    }

    async fn active_cluster_tasks(&self, cluster: &str) -> Result<Vec<String>, TransportError> {
        let mut inner = self.inner.lock();
        let read = inner.task_reads;
        inner.task_reads += 1;
        let cluster = inner
            .clusters
            .get(cluster)
            .ok_or_else(|| Self::not_found("cluster"))?;
        if cluster.task_script.is_empty() {
            return Ok(Vec::new());
        }
        let index = read.min(cluster.task_script.len() - 1);
        Ok(cluster.task_script[index].clone())
    }
}
