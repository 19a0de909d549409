//! # Proving-Engine Seam
//!
//! The external proving engine is an opaque collaborator: it compiles
//! nothing here, and the pipeline only ever drives it through file paths.
//! [`ProvingEngine`] is the trait boundary; [`crate::ezkl::EzklEngine`]
//! implements it over the real `ezkl` CLI and [`crate::mock::MockEngine`]
//! over deterministic hashing for tests.
//!
//! Engine calls are blocking and non-preemptible: once `prove` starts there
//! is no cancellation, only abandonment (see
//! [`crate::pipeline::ProofPipeline::generate_with_deadline`]).

use std::path::Path;

use thiserror::Error;

/// Errors surfaced by a proving engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine process could not be spawned at all.
    #[error("failed to spawn proving engine {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// A stage ran and reported failure.
    #[error("{stage} failed: {message}")]
    StageFailed { stage: &'static str, message: String },

    /// File I/O around an engine invocation failed.
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An engine-produced JSON artifact did not parse.
    #[error("malformed engine output: {0}")]
    MalformedOutput(#[from] serde_json::Error),
}

/// Driver interface over the external proving engine.
///
/// All operations are path-based: the engine reads and writes artifacts on
/// disk, and the pipeline owns path allocation and cleanup.
pub trait ProvingEngine: Send + Sync {
    /// Compute a witness from the circuit input file and compiled circuit.
    fn gen_witness(
        &self,
        input: &Path,
        compiled_circuit: &Path,
        witness: &Path,
    ) -> Result<(), EngineError>;

    /// Produce a proof from the witness, circuit, proving key, and SRS.
    fn prove(
        &self,
        witness: &Path,
        compiled_circuit: &Path,
        proving_key: &Path,
        proof: &Path,
        srs: &Path,
    ) -> Result<(), EngineError>;

    /// Verify a proof against the settings, verification key, and SRS.
    ///
    /// `Ok(false)` means the engine ran and rejected the proof — a valid,
    /// reportable outcome, not an error.
    fn verify(
        &self,
        proof: &Path,
        settings: &Path,
        verification_key: &Path,
        srs: &Path,
    ) -> Result<bool, EngineError>;

    /// Emit a standalone Solidity verifier contract. Setup-time only.
    fn create_evm_verifier(
        &self,
        verification_key: &Path,
        settings: &Path,
        output: &Path,
        srs: &Path,
    ) -> Result<(), EngineError>;
}
