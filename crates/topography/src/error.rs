//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, unknown preset names, matrix replacement with the wrong size,
//! malformed threshold sequences and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown preset '{name}'")]
    UnknownPreset { name: String },

    #[error("matrix size mismatch: expected {expected} cells, got {actual}")]
    MatrixSizeMismatch { expected: usize, actual: usize },

    #[error("invalid thresholds: {0}")]
    InvalidThresholds(String),

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
    fn from_str_allocates_owned_message() {
        let err: Error = "issue".into();
        assert!(matches!(err, Error::Other(ref msg) if msg == "issue"));
    }

    #[test]
    fn display_names_the_offending_preset() {
        let err = Error::UnknownPreset {
            name: "volcano".into(),
        };
        assert_eq!(err.to_string(), "unknown preset 'volcano'");
    }

    #[test]
    fn display_reports_both_sizes() {
        let err = Error::MatrixSizeMismatch {
            expected: 100,
            actual: 99,
        };
        assert_eq!(
            err.to_string(),
            "matrix size mismatch: expected 100 cells, got 99"
        );
    }
}
