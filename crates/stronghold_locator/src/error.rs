//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, unknown ring indices and cancelled sampling runs.
//!
//! Evidence that narrows nothing (an empty cone) or contradicts earlier throws is not an
//! error; see [`crate::predict::ThrowOutcome`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown ring index {index} (expected 0..8)")]
    UnknownRing { index: usize },

    #[error("sampling cancelled after {completed} of {requested} trials")]
    Cancelled { completed: usize, requested: usize },

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn unknown_ring_message_names_index() {
        let err = Error::UnknownRing { index: 9 };
        assert_eq!(err.to_string(), "unknown ring index 9 (expected 0..8)");
    }

    #[test]
    fn cancelled_reports_progress() {
        let err = Error::Cancelled {
            completed: 10,
            requested: 100,
        };
        assert!(err.to_string().contains("10 of 100"));
    }
}
