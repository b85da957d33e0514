//! Health and readiness gates.
//!
//! Gates validate a composite condition before a dependent power-sequencing
//! step is allowed to proceed:
//!
//! - [`health::cluster_health`] — aggregate health across named groups, with
//!   a separate bounded retry budget for reaching the health service itself
//! - [`resync::resync_pending`] — count of objects still resynchronizing;
//!   single read, composable inside a caller-driven poll loop
//! - [`membership::check_membership`] — per-member presence diagnostics, no
//!   aggregate short-circuit
//! - [`stability::await_cluster_stable`] — the SDN manager cluster stability
//!   state machine with its shortening backoff schedule

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod health;
pub mod membership;
pub mod resync;
pub mod stability;

pub use error::GateError;
pub use health::{cluster_health, BackendRetryPolicy, HealthVerdict};
pub use membership::{check_membership, MemberCheck};
pub use resync::{resync_pending, ResyncCheck};
pub use stability::{await_cluster_stable, StabilityPhase, StabilityPolicy};
