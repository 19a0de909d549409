//! # Ensemble Scoring & Severity Tiers
//!
//! Combines the two independently trained classifiers behind the
//! [`ProbabilityEstimator`] seam into one weighted probability and a
//! discrete [`Severity`] tier.
//!
//! ## Weighting
//!
//! `probability = 0.7 * recall_proba + 0.3 * precision_proba` — fixed,
//! recall-biased: in this domain a missed vulnerability costs more than a
//! false alarm.
//!
//! ## Severity Ladder
//!
//! Descending thresholds: ≥ 0.50 CRITICAL, ≥ 0.15 HIGH, ≥ 0.007 LOW, else
//! SAFE. `is_vulnerable` flips at the LOW/SAFE boundary (0.007) — the most
//! sensitive setting, not the CRITICAL one.

use std::path::Path;

use serde::{Deserialize, Serialize};

use veris_core::FeatureVector;

use crate::error::ModelError;
use crate::gbdt::GbdtModel;

/// Weight of the recall-oriented model in the ensemble.
pub const RECALL_WEIGHT: f64 = 0.7;

/// Weight of the precision-oriented model in the ensemble.
pub const PRECISION_WEIGHT: f64 = 0.3;

/// Probability at and above which a text is flagged vulnerable.
/// Also the LOW/SAFE severity boundary.
pub const VULNERABILITY_THRESHOLD: f64 = 0.007;

/// HIGH severity boundary.
pub const SEVERITY_HIGH: f64 = 0.15;

/// CRITICAL severity boundary.
pub const SEVERITY_CRITICAL: f64 = 0.50;

/// File name of the recall-oriented model artifact.
pub const RECALL_MODEL_FILE: &str = "ensemble_recall_model.json";

/// File name of the precision-oriented model artifact.
pub const PRECISION_MODEL_FILE: &str = "ensemble_precision_model.json";

/// A binary classifier that yields P(vulnerable) for a feature vector.
///
/// The ensemble holds two fixed instances behind this seam — the
/// recall-oriented and the precision-oriented model — rather than two
/// distinct types.
pub trait ProbabilityEstimator: Send + Sync {
    /// Positive-class probability in [0, 1].
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ModelError>;
}

/// Discrete risk bucket derived from the probability ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Safe,
    Low,
    High,
    Critical,
}

impl Severity {
    /// Classify a probability into its tier, by descending threshold.
    pub fn classify(probability: f64) -> Self {
        if probability >= SEVERITY_CRITICAL {
            Severity::Critical
        } else if probability >= SEVERITY_HIGH {
            Severity::High
        } else if probability >= VULNERABILITY_THRESHOLD {
            Severity::Low
        } else {
            Severity::Safe
        }
    }

    /// Fixed operator-facing message for this tier.
    pub fn message(&self) -> &'static str {
        match self {
            Severity::Critical => "High confidence exploit detected. Immediate review required.",
            Severity::High => "Suspicious patterns found. Manual review recommended.",
            Severity::Low => "Minor risk or code complexity warning.",
            Severity::Safe => "No significant issues detected.",
        }
    }
}

/// One fresh, deterministic scoring outcome. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Weighted ensemble probability in [0, 1].
    pub probability: f64,
    /// Raw recall-oriented model probability.
    pub recall_score: f64,
    /// Raw precision-oriented model probability.
    pub precision_score: f64,
    /// True iff `probability >= VULNERABILITY_THRESHOLD`.
    pub is_vulnerable: bool,
    /// Severity tier (SAFE/LOW/HIGH/CRITICAL on the wire).
    pub severity: Severity,
    /// Fixed message for the tier.
    pub severity_message: String,
    /// The vulnerability threshold constant, echoed for callers.
    pub threshold: f64,
}

/// The two loaded ensemble members and the scoring entry point.
///
/// Loaded once at process start; scoring is `&self` and never mutates the
/// models, so a single instance serves concurrent callers without locking.
pub struct EnsembleScorer<M = GbdtModel> {
    recall: M,
    precision: M,
}

impl EnsembleScorer<GbdtModel> {
    /// Load both ensemble members from a models directory.
    ///
    /// Looks for [`RECALL_MODEL_FILE`] and [`PRECISION_MODEL_FILE`]. Any
    /// failure here is fatal to serving: callers report it and exit
    /// nonzero rather than entering the request loop.
    pub fn load(models_dir: &Path) -> Result<Self, ModelError> {
        let recall = GbdtModel::load(&models_dir.join(RECALL_MODEL_FILE))?;
        let precision = GbdtModel::load(&models_dir.join(PRECISION_MODEL_FILE))?;
        tracing::info!(dir = %models_dir.display(), "ensemble models loaded");
        Ok(Self { recall, precision })
    }
}

impl<M: ProbabilityEstimator> EnsembleScorer<M> {
    /// Build a scorer from two already-loaded estimators.
    pub fn new(recall: M, precision: M) -> Self {
        Self { recall, precision }
    }

    /// Score one feature vector.
    ///
    /// Deterministic: the same vector against the same loaded models always
    /// yields the same result.
    pub fn score(&self, features: &FeatureVector) -> Result<PredictionResult, ModelError> {
        let recall_score = self.recall.predict_proba(features)?;
        let precision_score = self.precision.predict_proba(features)?;

        let probability = RECALL_WEIGHT * recall_score + PRECISION_WEIGHT * precision_score;
        let severity = Severity::classify(probability);

        Ok(PredictionResult {
            probability,
            recall_score,
            precision_score,
            is_vulnerable: probability >= VULNERABILITY_THRESHOLD,
            severity,
            severity_message: severity.message().to_string(),
            threshold: VULNERABILITY_THRESHOLD,
        })
    }
}
