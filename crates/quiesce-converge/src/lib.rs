//! Convergence operations: bounded poll loops that drive remote resources
//! from observed state to desired state.
//!
//! The per-target-kind operations all specialize one generic engine,
//! [`converge`], parameterized by a [`Convergent`] implementation: an
//! observation, a one-shot transition command, and an optional settle guard.
//! Poll cadence and attempt budget come from the caller's
//! [`quiesce_core::ConvergencePolicy`]; every operation returns a
//! [`quiesce_core::ConvergenceReport`] and audits every decision.
//!
//! One operation executes to completion before the caller proceeds;
//! suspension happens only at the poll-loop sleep points. Multi-target
//! drivers ([`converge_each`], [`ops::vm::converge_matching_vms`]) run
//! targets sequentially and collect per-target reports instead of
//! short-circuiting on a sibling's failure.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod engine;
pub mod multi;
pub mod ops;
#[cfg(test)]
mod testutil;

pub use engine::{converge, Convergent};
pub use multi::{converge_each, TargetReport};
