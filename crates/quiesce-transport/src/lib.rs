//! Transport adapters for the control planes quiesce drives.
//!
//! Each adapter encapsulates one session lifecycle: open a session, execute
//! calls, close the session. Adapters perform network I/O only — no retries
//! at this layer; retrying is the concern of the convergence operations that
//! own the adapter for the duration of one operation.
//!
//! Adapters in this crate:
//!
//! - [`preflight`] — TCP reachability probe run before session establishment,
//!   so "host unreachable" and "authentication failed" stay distinguishable
//!   in the audit trail
//! - [`RestSession`] — authenticated JSON-over-HTTPS session
//! - [`HypervisorApi`] / [`HttpHypervisorApi`] — hypervisor management API
//! - [`OpsApi`] / [`HttpOpsApi`] — operations-analytics and lifecycle manager
//! - [`SdnApi`] / [`HttpSdnApi`] — SDN manager cluster API
//! - [`ShellChannel`] / [`ShellSession`] — host shell command execution
//! - [`OobPowerController`] — out-of-band hard power-up executable
//!
//! Every trait here is a mockable seam: convergence operations and gates are
//! written against the traits and tested with scripted in-memory
//! implementations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod hypervisor;
pub mod oob;
pub mod ops;
pub mod probe;
pub mod rest;
pub mod sdn;
pub mod shell;

pub use error::TransportError;
pub use hypervisor::{HttpHypervisorApi, HypervisorApi, VmSummary};
pub use oob::OobPowerController;
pub use ops::{HealthGroupDto, HttpOpsApi, OpsApi};
pub use probe::{preflight, DEFAULT_PROBE_TIMEOUT};
pub use rest::{AuthScheme, RestConfig, RestSession};
pub use sdn::{HttpSdnApi, SdnApi};
pub use shell::{CommandOutput, ShellChannel, ShellSession};

/// A result type using [`TransportError`].
pub type Result<T> = std::result::Result<T, TransportError>;
