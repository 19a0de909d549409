//! # Gradient-Boosted Tree Evaluation
//!
//! Loads and evaluates the binary classifiers backing the ensemble. Each
//! model artifact is a JSON dump produced by the out-of-band training
//! conversion step:
//!
//! ```json
//! {
//!   "n_features": 68,
//!   "base_score": 0.0,
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 12, "threshold": 0.5, "left": 1, "right": 2,
//!           "default_left": true },
//!         { "leaf": -0.31 },
//!         { "leaf": 0.87 }
//!     ]}
//!   ]
//! }
//! ```
//!
//! Node 0 is the root of each tree. Evaluation routes `x[feature] <
//! threshold` to `left`, otherwise `right`; NaN inputs take the declared
//! default side. The positive-class probability is the logistic sigmoid of
//! `base_score` plus the sum of reached leaf values.
//!
//! Models are read-only after [`GbdtModel::load`]; evaluation never mutates
//! them, so a loaded model is safe to share across threads.

use std::path::Path;

use serde::Deserialize;

use veris_core::{FeatureVector, FEATURE_DIM};

use crate::ensemble::ProbabilityEstimator;
use crate::error::ModelError;

/// One node of a decision tree: an internal split or a leaf.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Internal split node.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        /// Side taken when the feature value is NaN.
        #[serde(default = "default_left_true")]
        default_left: bool,
    },
    /// Terminal node carrying an additive margin contribution.
    Leaf { leaf: f64 },
}

fn default_left_true() -> bool {
    true
}

/// One boosted tree: a flat node table rooted at index 0.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Walk the tree for one feature vector, returning the reached leaf.
    fn leaf_value(&self, x: &[f64]) -> Result<f64, ModelError> {
        let mut idx = 0usize;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { leaf }) => return Ok(*leaf),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                }) => {
                    let value = x.get(*feature).copied().unwrap_or(f64::NAN);
                    idx = if value.is_nan() {
                        if *default_left {
                            *left
                        } else {
                            *right
                        }
                    } else if value < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => return Err(ModelError::MalformedTree(idx)),
            }
        }
    }
}

/// A loaded gradient-boosted tree classifier.
///
/// Immutable after load; one of the two fixed ensemble members
/// (recall-oriented or precision-oriented).
#[derive(Debug, Clone, Deserialize)]
pub struct GbdtModel {
    /// Feature dimensionality the model was trained on.
    pub n_features: usize,
    /// Global margin offset applied before the sigmoid.
    #[serde(default)]
    pub base_score: f64,
    /// The boosted tree sequence.
    pub trees: Vec<Tree>,
}

impl GbdtModel {
    /// Load a model artifact from its JSON dump file.
    ///
    /// Fails when the file is unreadable, unparseable, or declares a
    /// feature width other than [`FEATURE_DIM`]. Load failures are fatal
    /// preconditions for serving — the caller exits nonzero.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model: GbdtModel =
            serde_json::from_str(&contents).map_err(|source| ModelError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if model.n_features != FEATURE_DIM {
            return Err(ModelError::DimensionMismatch {
                path: path.to_path_buf(),
                declared: model.n_features,
                expected: FEATURE_DIM,
            });
        }
        tracing::info!(
            path = %path.display(),
            trees = model.trees.len(),
            "loaded GBDT model"
        );
        Ok(model)
    }

    /// Raw additive margin: `base_score + Σ leaf values`.
    pub fn margin(&self, x: &[f64]) -> Result<f64, ModelError> {
        let mut margin = self.base_score;
        for tree in &self.trees {
            margin += tree.leaf_value(x)?;
        }
        Ok(margin)
    }
}

/// Logistic sigmoid, numerically stable for large-magnitude margins.
pub fn sigmoid(margin: f64) -> f64 {
    if margin >= 0.0 {
        1.0 / (1.0 + (-margin).exp())
    } else {
        let e = margin.exp();
        e / (1.0 + e)
    }
}

impl ProbabilityEstimator for GbdtModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        Ok(sigmoid(self.margin(features.as_slice())?))
    }
}

/// Test helper: model with a single constant-leaf tree, so the margin is
/// always `leaf` regardless of input.
#[cfg(test)]
pub(crate) fn constant_model(leaf: f64) -> GbdtModel {
    GbdtModel {
        n_features: FEATURE_DIM,
        base_score: 0.0,
        trees: vec![Tree {
            nodes: vec![TreeNode::Leaf { leaf }],
        }],
    }
}
