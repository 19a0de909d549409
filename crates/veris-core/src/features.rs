//! # Fixed-Dimension Vectors
//!
//! The two numeric vector shapes the stack moves around:
//!
//! - [`FeatureVector`] — the 68-component scorer input. Length is enforced
//!   at construction; a 67- or 69-length request is an input error, never
//!   silently repaired.
//! - [`EmbeddingVector`] — the 16-component circuit input derived from text
//!   by `veris-embed`.
//!
//! Both serialize as plain JSON arrays, matching the wire formats of the
//! scoring pipe and the proving engine's input files.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of components in a scorer feature vector.
pub const FEATURE_DIM: usize = 68;

/// Number of components in a circuit embedding vector.
pub const EMBEDDING_DIM: usize = 16;

/// An ordered sequence of exactly [`FEATURE_DIM`] floats.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Validate and wrap a raw feature sequence.
    ///
    /// Any length other than [`FEATURE_DIM`] is rejected with
    /// [`CoreError::FeatureCount`].
    pub fn new(values: Vec<f64>) -> Result<Self, CoreError> {
        if values.len() != FEATURE_DIM {
            return Err(CoreError::FeatureCount {
                expected: FEATURE_DIM,
                got: values.len(),
            });
        }
        Ok(Self(values))
    }

    /// All-zero vector. Used by tests and the null-input smoke path.
    pub fn zeros() -> Self {
        Self(vec![0.0; FEATURE_DIM])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for FeatureVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = Vec::<f64>::deserialize(deserializer)?;
        Self::new(values).map_err(serde::de::Error::custom)
    }
}

/// A 16-dimensional circuit input vector.
///
/// Slots 0..14 carry digest-seeded pseudo-random draws; slot 14 carries the
/// tanh-clamped sentiment signal; slot 15 carries the sentiment sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddingVector(#[serde(with = "serde_arrays")] [f64; EMBEDDING_DIM]);

impl EmbeddingVector {
    pub fn new(values: [f64; EMBEDDING_DIM]) -> Self {
        Self(values)
    }

    /// Validate and wrap a dynamically-sized sequence.
    pub fn from_slice(values: &[f64]) -> Result<Self, CoreError> {
        let arr: [f64; EMBEDDING_DIM] =
            values
                .try_into()
                .map_err(|_| CoreError::EmbeddingDim {
                    expected: EMBEDDING_DIM,
                    got: values.len(),
                })?;
        Ok(Self(arr))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn values(&self) -> [f64; EMBEDDING_DIM] {
        self.0
    }
}

impl std::ops::Index<usize> for EmbeddingVector {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

/// Serde helper for fixed-size float arrays (serde's derive stops at 32
/// elements for arrays behind references; spelling it out keeps the wire
/// format a plain JSON array).
mod serde_arrays {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::EMBEDDING_DIM;

    pub fn serialize<S>(values: &[f64; EMBEDDING_DIM], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(values.iter())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[f64; EMBEDDING_DIM], D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Vec::<f64>::deserialize(deserializer)?;
        v.try_into()
            .map_err(|v: Vec<f64>| D::Error::custom(format!("expected 16 values, got {}", v.len())))
    }
}
