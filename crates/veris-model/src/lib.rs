//! # veris-model — Ensemble Risk Scoring
//!
//! Turns a fixed-length [`FeatureVector`](veris_core::FeatureVector) into a
//! calibrated risk probability and a discrete severity tier.
//!
//! ## Components
//!
//! - [`gbdt`] — evaluation of gradient-boosted decision tree models loaded
//!   from their JSON dump files. Models are opaque, immutable artifacts:
//!   loaded once at process start, read-only thereafter.
//! - [`ensemble`] — the [`ProbabilityEstimator`] seam, the fixed 0.7/0.3
//!   recall/precision weighting, the severity ladder, and
//!   [`PredictionResult`] assembly.
//!
//! ## Concurrency
//!
//! Scoring is `&self` over immutable models, so one loaded
//! [`EnsembleScorer`] is safe to share across concurrent callers with no
//! locking.

pub mod ensemble;
pub mod error;
pub mod gbdt;

pub use ensemble::{
    EnsembleScorer, PredictionResult, ProbabilityEstimator, Severity, PRECISION_WEIGHT,
    RECALL_WEIGHT, SEVERITY_CRITICAL, SEVERITY_HIGH, VULNERABILITY_THRESHOLD,
};
pub use error::ModelError;
pub use gbdt::GbdtModel;
