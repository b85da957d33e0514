//! Read-only observations of quiesce targets.
//!
//! Every function here issues read-only calls against a transport adapter
//! and maps the backend's raw strings onto the typed state domains of
//! `quiesce-core` — this crate is the only place raw status strings are
//! interpreted. Observations are produced fresh on every call and never
//! cached.
//!
//! Multi-resource observations return an ordered collection; an empty
//! collection is a valid, non-error result, distinct from the parent
//! resource itself being missing ([`ObserveError::NotFound`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod appliance;
pub mod cluster;
pub mod error;
pub mod host;
pub mod manager;
#[cfg(test)]
mod testutil;
pub mod vm;

pub use error::ObserveError;
pub use manager::HealthGroup;

/// A result type using [`ObserveError`].
pub type Result<T> = std::result::Result<T, ObserveError>;
