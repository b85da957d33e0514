//! Target addressing for convergence operations.
//!
//! A target is an addressable remote resource under convergence. Targets are
//! constructed per call from caller-supplied parameters and never persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A network endpoint for a control plane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Hostname or IP address.
    pub address: String,
    /// Management port.
    pub port: u16,
}

impl Endpoint {
    /// Create an endpoint with an explicit port.
    #[must_use]
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    /// Create an endpoint on the standard HTTPS management port.
    #[must_use]
    pub fn https(address: impl Into<String>) -> Self {
        Self::new(address, 443)
    }

    /// Create an endpoint on the standard SSH port.
    #[must_use]
    pub fn ssh(address: impl Into<String>) -> Self {
        Self::new(address, 22)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Credentials for a control-plane session.
///
/// Supplied by the caller per operation; never stored by this crate.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login user name.
    pub username: String,
    /// Login password.
    pub password: String,
}

impl Credentials {
    /// Create a new credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The kind of remote resource a convergence operation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A virtual machine managed by the hypervisor API.
    VirtualMachine,
    /// A hypervisor host.
    Host,
    /// A cluster-level setting (HA, DRS, advanced options).
    ClusterSetting,
    /// A service on a management appliance, driven over the shell channel.
    ApplianceService,
    /// The online-state of a management cluster (operations analytics).
    ManagementClusterState,
    /// The SDN manager cluster.
    NetworkManagerCluster,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VirtualMachine => "virtual machine",
            Self::Host => "host",
            Self::ClusterSetting => "cluster setting",
            Self::ApplianceService => "appliance service",
            Self::ManagementClusterState => "management cluster",
            Self::NetworkManagerCluster => "network manager cluster",
        };
        f.write_str(name)
    }
}

/// An addressable remote resource under convergence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    /// Control-plane endpoint that owns the resource.
    pub endpoint: Endpoint,
    /// Kind of resource.
    pub kind: ResourceKind,
    /// Resource identifier within the control plane's inventory.
    pub name: String,
}

impl TargetRef {
    /// Create a new target reference.
    #[must_use]
    pub fn new(endpoint: Endpoint, kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            endpoint,
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' at {}", self.kind, self.name, self.endpoint)
    }
}

/// Name-based selection of virtual machines.
///
/// Distinguishes "no pattern was supplied" from "a pattern was supplied but
/// matched nothing": a defaulted selector that matches zero VMs is a silent
/// no-op, while an explicit pattern with zero matches is reported as a skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmSelector {
    /// No pattern was given; the operation applies to the caller's default
    /// scope and silently no-ops when that scope is empty.
    Defaulted,
    /// An explicit name regex supplied by the caller.
    Pattern(String),
}

impl VmSelector {
    /// Create a selector from an optional caller-supplied pattern.
    #[must_use]
    pub fn from_option(pattern: Option<String>) -> Self {
        match pattern {
            Some(p) => Self::Pattern(p),
            None => Self::Defaulted,
        }
    }

    /// The explicit pattern, if one was supplied.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::Pattern(p) => Some(p),
            Self::Defaulted => None,
        }
    }

    /// Whether the caller supplied an explicit pattern.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }
}
