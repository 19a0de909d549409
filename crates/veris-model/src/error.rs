//! # Model Error Types
//!
//! Structured errors for model loading and scoring. Load failures are fatal
//! to a serving process (reported before the loop starts); scoring failures
//! are per-request and survivable.

use std::path::PathBuf;

use thiserror::Error;
use veris_core::CoreError;

/// Errors from model loading and ensemble scoring.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A model artifact could not be read from disk.
    #[error("failed to read model {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A model artifact was not valid model JSON.
    #[error("failed to parse model {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A model artifact declares a different feature dimensionality than
    /// the stack's fixed input width.
    #[error("model {path} expects {declared} features, stack is fixed at {expected}")]
    DimensionMismatch {
        path: PathBuf,
        declared: usize,
        expected: usize,
    },

    /// A tree referenced a node index outside its own node table.
    #[error("malformed tree: node index {0} out of range")]
    MalformedTree(usize),

    /// Input-validation failure forwarded from core types.
    #[error(transparent)]
    Input(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_path() {
        let err = ModelError::Read {
            path: PathBuf::from("/models/ensemble_recall_model.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = format!("{err}");
        assert!(msg.contains("ensemble_recall_model.json"));
    }

    #[test]
    fn dimension_mismatch_names_both_widths() {
        let err = ModelError::DimensionMismatch {
            path: PathBuf::from("m.json"),
            declared: 32,
            expected: 68,
        };
        let msg = format!("{err}");
        assert!(msg.contains("32"));
        assert!(msg.contains("68"));
    }

    #[test]
    fn input_error_forwards_core_message() {
        let err = ModelError::from(CoreError::FeatureCount {
            expected: 68,
            got: 69,
        });
        assert_eq!(format!("{err}"), "Expected 68 features, got 69");
    }
}
