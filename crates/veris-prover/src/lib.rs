//! # veris-prover — Proof-Binding Pipeline
//!
//! Drives the staged proving protocol over an external proving engine and
//! guarantees on-disk hygiene regardless of outcome:
//!
//! ```text
//! START → EMBED → BUILD_INPUT → GEN_WITNESS → GEN_PROOF → LOCAL_VERIFY → DONE
//!                      │             │            │            │
//!                      └─────────────┴────────────┴────────────┴──→ CLEANUP
//! ```
//!
//! ## Modules
//!
//! - [`artifacts`] — the [`ArtifactStore`]: fixed locations of the durable
//!   proving materials (compiled circuit, keys, SRS, settings) and
//!   guard-scoped per-request [`TransientFiles`].
//! - [`engine`] — the [`ProvingEngine`] seam over the external prover.
//! - [`ezkl`] — [`EzklEngine`], which shells out to the `ezkl` CLI.
//! - [`mock`] — [`MockEngine`], a deterministic SHA-256-based stand-in with
//!   injectable stage failures, used by tests.
//! - [`pipeline`] — the [`ProofPipeline`] orchestrator, stage enum,
//!   request/result types, and the detached/deadline execution wrappers.
//!
//! ## Cleanup Invariant
//!
//! Transient files (`input_*`, `witness_*`, `proof_*`) are owned by a
//! [`TransientFiles`] guard whose `Drop` deletes them best-effort. Every
//! exit path of the pipeline — success, stage failure, panic — releases the
//! guard, so no request leaves droppings behind. Deletion failures are
//! logged, never propagated, and never mask the request's own outcome.

pub mod artifacts;
pub mod engine;
pub mod ezkl;
pub mod mock;
pub mod pipeline;

pub use artifacts::{ArtifactStore, TransientFiles};
pub use engine::{EngineError, ProvingEngine};
pub use ezkl::EzklEngine;
pub use mock::MockEngine;
pub use pipeline::{
    ProofPipeline, ProofRequest, ProofResult, ProofStage, ProverError,
};
