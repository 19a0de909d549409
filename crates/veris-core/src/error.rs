//! # Core Error Types
//!
//! Structured errors shared across the VERIS workspace. Uses `thiserror`
//! for ergonomic error definitions with diagnostic context.
//!
//! The taxonomy distinguishes per-request input-validation failures (which
//! a serving loop reports and survives) from startup-time resource failures
//! (which are fatal). Only the per-request variants live here; crate-local
//! concerns (model loading, proving-engine failures) define their own enums
//! and convert from these.

use thiserror::Error;

/// Errors from core type construction and validation.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A feature vector arrived with the wrong number of components.
    ///
    /// This is a caller-visible input error, never a crash: serving loops
    /// report it per-request and continue.
    #[error("Expected {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },

    /// An embedding vector arrived with the wrong number of components.
    #[error("expected {expected} embedding dimensions, got {got}")]
    EmbeddingDim { expected: usize, got: usize },

    /// A hex-encoded digest string failed to parse.
    #[error("invalid digest hex: {0}")]
    InvalidDigest(String),
}
