//! Observation error taxonomy.

use quiesce_transport::TransportError;
use thiserror::Error;

/// Errors raised while observing a target's state.
#[derive(Debug, Error)]
pub enum ObserveError {
    /// The named resource does not exist in the target's inventory.
    #[error("{target} not found")]
    NotFound {
        /// The missing resource.
        target: String,
    },

    /// The backend reported a value outside the expected domain.
    #[error("unexpected {field} value '{raw}' for {target}")]
    UnexpectedState {
        /// The resource whose state was read.
        target: String,
        /// The field that failed to map.
        field: &'static str,
        /// The raw value as reported.
        raw: String,
    },

    /// The caller-supplied name pattern does not compile.
    #[error("invalid name pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as supplied.
        pattern: String,
        /// Regex compile error detail.
        reason: String,
    },

    /// The underlying transport call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ObserveError {
    /// Whether a convergence loop may swallow this failure and keep polling.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_transient(),
            _ => false,
        }
    }

    /// Whether this observation failed because the resource is missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Translate a transport failure for one named resource.
///
/// A backend 404 becomes [`ObserveError::NotFound`] so convergence loops can
/// distinguish "gone" from "unreachable right now".
pub(crate) fn classify(target: &str, err: TransportError) -> ObserveError {
    if err.is_not_found() {
        ObserveError::NotFound {
            target: target.to_string(),
        }
    } else {
        ObserveError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_translation() {
        let err = classify(
            "vm 'witness-a'",
            TransportError::Api {
                status: 404,
                message: "no such vm".into(),
            },
        );
        assert!(err.is_not_found());
        assert!(!err.is_transient());

        let err = classify("vm 'witness-a'", TransportError::Transient("blip".into()));
        assert!(err.is_transient());
        assert!(!err.is_not_found());
    }
}
