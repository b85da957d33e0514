//! Core types for the quiesce power-sequencing toolkit.
//!
//! This crate provides the domain vocabulary shared by every other quiesce
//! crate:
//!
//! - **Targets**: addressable remote resources (VMs, hosts, cluster settings,
//!   appliance services, management clusters)
//! - **State domains**: the desired/observed state enums for each target kind
//! - **Policies**: bounded poll-loop budgets for convergence operations
//! - **Reports**: the single return contract every convergence operation honors
//!
//! # Example
//!
//! ```
//! use quiesce_core::{ConvergencePolicy, Endpoint, ResourceKind, TargetRef};
//!
//! let target = TargetRef::new(
//!     Endpoint::https("vc01.mgmt.example"),
//!     ResourceKind::VirtualMachine,
//!     "witness-node-a",
//! );
//! let policy = ConvergencePolicy::vm_power();
//!
//! assert_eq!(policy.max_attempts, 60);
//! assert!(target.to_string().contains("witness-node-a"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod policy;
pub mod report;
pub mod state;
pub mod target;

pub use policy::ConvergencePolicy;
pub use report::{ConvergenceOutcome, ConvergenceReport};
pub use state::{
    ClusterOnlineState, ConnectionState, DrsAutomationLevel, HaMode, HealthSeverity,
    MaintenanceMode, PowerState, SdnClusterStatus, ServiceRunState,
};
pub use target::{Credentials, Endpoint, ResourceKind, TargetRef, VmSelector};
