//! # veris-core — Foundational Types for the VERIS Stack
//!
//! VERIS produces a verifiable risk score for a piece of text (typically an
//! autonomous agent's output) and binds that score to the text's content via
//! a zero-knowledge proof. This crate holds the types every other crate in
//! the workspace agrees on:
//!
//! - [`OutputDigest`] — the SHA-256 digest of the certified text. The digest
//!   both seeds the deterministic embedding draws and namespaces per-request
//!   transient proof files.
//! - [`FeatureVector`] — exactly [`FEATURE_DIM`] floats, the input to the
//!   ensemble scorer. Wrong lengths are rejected at construction; nothing is
//!   ever truncated or padded.
//! - [`EmbeddingVector`] — exactly [`EMBEDDING_DIM`] floats, the
//!   content-bound circuit input produced by `veris-embed`.
//! - [`CoreError`] — the structured error hierarchy shared across crates.
//!
//! ## Determinism Invariant
//!
//! Every type here is a pure function of its inputs. Identical text always
//! produces an identical `OutputDigest`, and therefore identical downstream
//! embeddings and transient file names.

pub mod digest;
pub mod error;
pub mod features;

pub use digest::OutputDigest;
pub use error::CoreError;
pub use features::{EmbeddingVector, FeatureVector, EMBEDDING_DIM, FEATURE_DIM};
