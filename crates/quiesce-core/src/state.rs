//! Desired/observed state domains for each target kind.
//!
//! Backends report state as loosely-typed strings. Each domain here carries a
//! mapping constructor that is applied once, at the observation boundary,
//! immediately after deserialization; the rest of the system only ever
//! compares these enums. Strict domains return `None` for unrecognized raw
//! values so the observation layer can surface them; loose domains (backend
//! status fields that grow new values across releases) fold unrecognized
//! input into an explicit `Unknown` variant that never compares equal to a
//! desired state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Power state of a virtual machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    /// The VM is running.
    PoweredOn,
    /// The VM is powered off.
    PoweredOff,
    /// The VM is suspended.
    Suspended,
}

impl PowerState {
    /// Parse a power state from the management API's string form.
    #[must_use]
    pub fn from_api(raw: &str) -> Option<Self> {
        match raw {
            "POWERED_ON" => Some(Self::PoweredOn),
            "POWERED_OFF" => Some(Self::PoweredOff),
            "SUSPENDED" => Some(Self::Suspended),
            _ => None,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PoweredOn => "powered on",
            Self::PoweredOff => "powered off",
            Self::Suspended => "suspended",
        };
        f.write_str(name)
    }
}

/// Connection state of a host as seen by the hypervisor manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// The host is connected to the manager.
    Connected,
    /// The host has been administratively disconnected.
    Disconnected,
    /// The manager cannot reach the host.
    NotResponding,
}

impl ConnectionState {
    /// Parse a connection state from the management API's string form.
    #[must_use]
    pub fn from_api(raw: &str) -> Option<Self> {
        match raw {
            "CONNECTED" => Some(Self::Connected),
            "DISCONNECTED" => Some(Self::Disconnected),
            "NOT_RESPONDING" => Some(Self::NotResponding),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::NotResponding => "not responding",
        };
        f.write_str(name)
    }
}

/// Maintenance mode of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceMode {
    /// The host is in maintenance mode.
    InMaintenance,
    /// The host is in normal operation.
    NotInMaintenance,
}

impl MaintenanceMode {
    /// Map the management API's boolean flag onto the domain.
    #[must_use]
    pub const fn from_flag(in_maintenance: bool) -> Self {
        if in_maintenance {
            Self::InMaintenance
        } else {
            Self::NotInMaintenance
        }
    }
}

impl fmt::Display for MaintenanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InMaintenance => "in maintenance mode",
            Self::NotInMaintenance => "not in maintenance mode",
        };
        f.write_str(name)
    }
}

/// High-availability protection on a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HaMode {
    /// HA is enabled.
    Enabled,
    /// HA is disabled.
    Disabled,
}

impl HaMode {
    /// Map the management API's boolean flag onto the domain.
    #[must_use]
    pub const fn from_flag(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

impl fmt::Display for HaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enabled => "HA enabled",
            Self::Disabled => "HA disabled",
        };
        f.write_str(name)
    }
}

/// DRS automation level of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrsAutomationLevel {
    /// Placement and migration are fully automated.
    FullyAutomated,
    /// Placement is automated, migration is recommended only.
    PartiallyAutomated,
    /// All recommendations require operator approval.
    Manual,
}

impl DrsAutomationLevel {
    /// Parse an automation level from the management API's string form.
    #[must_use]
    pub fn from_api(raw: &str) -> Option<Self> {
        match raw {
            "FULLY_AUTOMATED" => Some(Self::FullyAutomated),
            "PARTIALLY_AUTOMATED" => Some(Self::PartiallyAutomated),
            "MANUAL" => Some(Self::Manual),
            _ => None,
        }
    }

    /// The management API's string form for this level.
    #[must_use]
    pub const fn as_api(&self) -> &'static str {
        match self {
            Self::FullyAutomated => "FULLY_AUTOMATED",
            Self::PartiallyAutomated => "PARTIALLY_AUTOMATED",
            Self::Manual => "MANUAL",
        }
    }
}

impl fmt::Display for DrsAutomationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FullyAutomated => "fully automated",
            Self::PartiallyAutomated => "partially automated",
            Self::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// Run state of an appliance service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRunState {
    /// The service is running.
    Started,
    /// The service is stopped.
    Stopped,
}

impl ServiceRunState {
    /// Parse a run state from the service controller's output.
    #[must_use]
    pub fn from_api(raw: &str) -> Option<Self> {
        match raw {
            "STARTED" | "RUNNING" => Some(Self::Started),
            "STOPPED" => Some(Self::Stopped),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceRunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Started => "started",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Online-state of a management cluster (operations analytics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClusterOnlineState {
    /// The cluster is online and serving.
    Online,
    /// The cluster has been taken offline.
    Offline,
    /// The backend reported a state this build does not recognize.
    #[default]
    Unknown,
}

impl ClusterOnlineState {
    /// Parse an online-state from the analytics API's string form.
    #[must_use]
    pub fn from_api(raw: &str) -> Self {
        match raw {
            "ONLINE" => Self::Online,
            "OFFLINE" => Self::Offline,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ClusterOnlineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Status of the SDN manager cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SdnClusterStatus {
    /// All cluster services are up and in sync.
    Stable,
    /// The cluster is forming or re-forming.
    Unstable,
    /// One or more cluster services are degraded.
    Degraded,
    /// The backend reported a status this build does not recognize.
    #[default]
    Unknown,
}

impl SdnClusterStatus {
    /// Parse a cluster status from the SDN manager's string form.
    #[must_use]
    pub fn from_api(raw: &str) -> Self {
        match raw {
            "STABLE" => Self::Stable,
            "UNSTABLE" => Self::Unstable,
            "DEGRADED" => Self::Degraded,
            _ => Self::Unknown,
        }
    }

    /// Whether this is the stable marker the stability gate waits for.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        matches!(self, Self::Stable)
    }
}

impl fmt::Display for SdnClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stable => "stable",
            Self::Unstable => "unstable",
            Self::Degraded => "degraded",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Severity of a named health group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HealthSeverity {
    /// The group is healthy.
    Green,
    /// The group has warnings.
    Yellow,
    /// The group has failures.
    Red,
    /// Informational only.
    Info,
    /// The backend reported a severity this build does not recognize.
    #[default]
    Unknown,
}

impl HealthSeverity {
    /// Parse a severity from the health service's string form.
    ///
    /// The health backend is case-inconsistent across releases, so matching
    /// is case-insensitive.
    #[must_use]
    pub fn from_api(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "green" => Self::Green,
            "yellow" | "warning" => Self::Yellow,
            "red" | "error" => Self::Red,
            "info" | "skipped" => Self::Info,
            _ => Self::Unknown,
        }
    }

    /// Whether this severity counts as healthy for aggregation.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Green | Self::Info)
    }
}

impl fmt::Display for HealthSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Info => "info",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
