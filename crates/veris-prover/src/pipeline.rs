//! # Proof Pipeline Orchestrator
//!
//! Drives one proof request through the staged protocol as an explicit
//! state machine:
//!
//! ```text
//! EMBED → BUILD_INPUT → GEN_WITNESS → GEN_PROOF → LOCAL_VERIFY → DONE
//! ```
//!
//! Stage order is strict; no stage is skipped. Any stage failure aborts
//! the request with the engine's error message. The [`TransientFiles`]
//! guard allocated at the top of [`ProofPipeline::generate`] is released
//! on every exit path, so cleanup is a property of scope rather than of
//! `match` arms.
//!
//! A proof that generates but fails local verification is NOT a pipeline
//! failure: the result is successful with `verified: false`. The contract
//! is "report whether the artifact verifies", not "only succeed when it
//! verifies".

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use veris_core::{EmbeddingVector, OutputDigest};
use veris_embed::embed_with_digest;

use crate::artifacts::{ArtifactStore, TransientFiles};
use crate::engine::{EngineError, ProvingEngine};
use crate::ezkl::EzklEngine;

/// Errors from pipeline construction and setup preconditions.
#[derive(Error, Debug)]
pub enum ProverError {
    /// A durable setup artifact is absent. Fatal: no request can succeed
    /// until the out-of-band setup phase has produced it.
    #[error("missing proving artifact: {0} (run circuit setup first)")]
    MissingArtifact(PathBuf),

    /// An engine invocation failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Filesystem I/O around the pipeline failed.
    #[error("pipeline I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An on-disk JSON artifact did not parse.
    #[error("malformed pipeline artifact: {0}")]
    Json(#[from] serde_json::Error),
}

/// The fallible stages of the proving protocol, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofStage {
    BuildInput,
    GenWitness,
    GenProof,
    LocalVerify,
}

impl fmt::Display for ProofStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProofStage::BuildInput => "BUILD_INPUT",
            ProofStage::GenWitness => "GEN_WITNESS",
            ProofStage::GenProof => "GEN_PROOF",
            ProofStage::LocalVerify => "LOCAL_VERIFY",
        };
        f.write_str(name)
    }
}

/// One proof request: the text to certify and an optional job identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofRequest {
    pub text: String,
    pub job_id: Option<String>,
}

impl ProofRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            job_id: None,
        }
    }

    pub fn with_job_id(text: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            job_id: Some(job_id.into()),
        }
    }
}

/// Wire shape of the circuit input file the proving engine expects.
#[derive(Debug, Serialize, Deserialize)]
struct InputRecord {
    input_data: Vec<Vec<f64>>,
}

/// Outcome of one proof request.
///
/// Serializes to exactly one of:
/// `{"success":true,"proof":…,"outputHash":…,"proofSizeBytes":…,
///   "generationTimeMs":…,"instanceCount":…,"verified":…}` or
/// `{"success":false,"error":…,"outputHash":…}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProofResult {
    Success {
        success: bool,
        proof: serde_json::Value,
        #[serde(rename = "outputHash")]
        output_hash: String,
        #[serde(rename = "proofSizeBytes")]
        proof_size_bytes: u64,
        #[serde(rename = "generationTimeMs")]
        generation_time_ms: u64,
        #[serde(rename = "instanceCount")]
        instance_count: usize,
        verified: bool,
    },
    Failure {
        success: bool,
        error: String,
        #[serde(rename = "outputHash")]
        output_hash: String,
    },
}

impl ProofResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProofResult::Success { .. })
    }

    pub fn output_hash(&self) -> &str {
        match self {
            ProofResult::Success { output_hash, .. } => output_hash,
            ProofResult::Failure { output_hash, .. } => output_hash,
        }
    }
}

/// What the stage loop hands back on completion.
struct StageOutput {
    proof: serde_json::Value,
    proof_size_bytes: u64,
    generation_time_ms: u64,
    instance_count: usize,
    verified: bool,
}

/// The per-process proof orchestrator.
///
/// Holds the resolved [`ArtifactStore`] and the proving engine; both are
/// initialized once at startup. `generate` is `&self` and requests own
/// their transient files exclusively, so one pipeline instance serves
/// concurrent requests.
#[derive(Debug)]
pub struct ProofPipeline<E: ProvingEngine = EzklEngine> {
    store: ArtifactStore,
    engine: E,
}

impl<E: ProvingEngine> ProofPipeline<E> {
    /// Build a pipeline, verifying the durable setup artifacts up front.
    ///
    /// Fails with [`ProverError::MissingArtifact`] when setup has not run —
    /// callers report this and exit nonzero rather than serving.
    pub fn new(store: ArtifactStore, engine: E) -> Result<Self, ProverError> {
        store.verify_setup()?;
        Ok(Self { store, engine })
    }

    /// The artifact store backing this pipeline.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Run one request through the full staged protocol.
    ///
    /// Never returns `Err`: every stage failure is folded into a
    /// [`ProofResult::Failure`] carrying the engine's message and the
    /// request's output hash, because the serving process must keep
    /// accepting requests after a failed one.
    pub fn generate(&self, request: &ProofRequest) -> ProofResult {
        let started = Instant::now();

        // EMBED — infallible, binds the request to its content digest.
        let (digest, embedding) = embed_with_digest(&request.text);
        tracing::info!(
            job_id = request.job_id.as_deref().unwrap_or("n/a"),
            output_hash = %digest.short_prefix(),
            text_len = request.text.len(),
            "generating fresh proof"
        );

        // The guard's Drop is the CLEANUP edge for both paths below.
        let transient = self.store.transient(&digest);

        match self.run_stages(started, &transient, &embedding) {
            Ok(out) => {
                tracing::info!(
                    output_hash = %digest.short_prefix(),
                    proof_size = out.proof_size_bytes,
                    elapsed_ms = out.generation_time_ms,
                    verified = out.verified,
                    "proof generated"
                );
                ProofResult::Success {
                    success: true,
                    proof: out.proof,
                    output_hash: digest.to_hex(),
                    proof_size_bytes: out.proof_size_bytes,
                    generation_time_ms: out.generation_time_ms,
                    instance_count: out.instance_count,
                    verified: out.verified,
                }
            }
            Err((stage, err)) => {
                tracing::error!(
                    output_hash = %digest.short_prefix(),
                    %stage,
                    error = %err,
                    "proof pipeline stage failed"
                );
                ProofResult::Failure {
                    success: false,
                    error: err.to_string(),
                    output_hash: digest.to_hex(),
                }
            }
        }
    }

    /// The strict stage loop. Advances through [`ProofStage`] in order;
    /// the first failure returns with the stage it occurred in.
    fn run_stages(
        &self,
        started: Instant,
        transient: &TransientFiles,
        embedding: &EmbeddingVector,
    ) -> Result<StageOutput, (ProofStage, ProverError)> {
        let mut stage = ProofStage::BuildInput;
        let mut generation_time_ms = 0u64;

        loop {
            match stage {
                ProofStage::BuildInput => {
                    self.build_input(transient.input(), embedding)
                        .map_err(|e| (stage, e))?;
                    stage = ProofStage::GenWitness;
                }
                ProofStage::GenWitness => {
                    tracing::debug!("generating witness");
                    self.engine
                        .gen_witness(
                            transient.input(),
                            &self.store.compiled_circuit(),
                            transient.witness(),
                        )
                        .map_err(|e| (stage, ProverError::Engine(e)))?;
                    stage = ProofStage::GenProof;
                }
                ProofStage::GenProof => {
                    tracing::debug!("generating proof (may take tens of seconds)");
                    self.engine
                        .prove(
                            transient.witness(),
                            &self.store.compiled_circuit(),
                            &self.store.proving_key(),
                            transient.proof(),
                            &self.store.srs(),
                        )
                        .map_err(|e| (stage, ProverError::Engine(e)))?;
                    generation_time_ms = started.elapsed().as_millis() as u64;
                    stage = ProofStage::LocalVerify;
                }
                ProofStage::LocalVerify => {
                    let verified = self
                        .engine
                        .verify(
                            transient.proof(),
                            &self.store.settings(),
                            &self.store.verification_key(),
                            &self.store.srs(),
                        )
                        .map_err(|e| (stage, ProverError::Engine(e)))?;

                    let (proof, proof_size_bytes, instance_count) = self
                        .read_proof_artifact(transient.proof())
                        .map_err(|e| (stage, e))?;

                    return Ok(StageOutput {
                        proof,
                        proof_size_bytes,
                        generation_time_ms,
                        instance_count,
                        verified,
                    });
                }
            }
        }
    }

    /// BUILD_INPUT: persist the embedding in the engine's input shape.
    fn build_input(&self, path: &Path, embedding: &EmbeddingVector) -> Result<(), ProverError> {
        let record = InputRecord {
            input_data: vec![embedding.as_slice().to_vec()],
        };
        std::fs::write(path, serde_json::to_string(&record)?)?;
        Ok(())
    }

    /// Load the finished proof: payload, on-disk size, instance count.
    fn read_proof_artifact(
        &self,
        path: &Path,
    ) -> Result<(serde_json::Value, u64, usize), ProverError> {
        let proof_size_bytes = std::fs::metadata(path)?.len();
        let proof: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        let instance_count = proof
            .get("instances")
            .and_then(|i| i.get(0))
            .and_then(|g| g.as_array())
            .map(|g| g.len())
            .unwrap_or(0);
        Ok((proof, proof_size_bytes, instance_count))
    }

    /// SOLIDITY_EXPORT: emit a standalone verifier contract.
    ///
    /// Setup-time operation, not part of the per-request hot path.
    pub fn export_evm_verifier(&self, output: &Path) -> Result<(), ProverError> {
        self.engine.create_evm_verifier(
            &self.store.verification_key(),
            &self.store.settings(),
            output,
            &self.store.srs(),
        )?;
        tracing::info!(output = %output.display(), "Solidity verifier exported");
        Ok(())
    }
}

impl<E: ProvingEngine + 'static> ProofPipeline<E> {
    /// Run a request as an independent unit of work.
    ///
    /// Proof generation blocks for seconds to tens of seconds, so each
    /// request runs on the blocking pool; concurrent requests do not
    /// serialize behind one another's proving time.
    pub fn generate_detached(
        self: &Arc<Self>,
        request: ProofRequest,
    ) -> tokio::task::JoinHandle<ProofResult> {
        let pipeline = Arc::clone(self);
        tokio::task::spawn_blocking(move || pipeline.generate(&request))
    }

    /// Run a request, abandoning the wait after `deadline`.
    ///
    /// The engine is non-preemptible: on timeout the underlying work runs
    /// to completion in the background and its late result is logged and
    /// discarded. `None` means the caller stopped waiting, not that the
    /// proof failed.
    pub async fn generate_with_deadline(
        self: &Arc<Self>,
        request: ProofRequest,
        deadline: Duration,
    ) -> Option<ProofResult> {
        let prefix = OutputDigest::of_text(&request.text).short_prefix();
        let mut handle = self.generate_detached(request);

        tokio::select! {
            joined = &mut handle => match joined {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::error!(output_hash = %prefix, error = %e, "proof task panicked");
                    None
                }
            },
            _ = tokio::time::sleep(deadline) => {
                tracing::warn!(
                    output_hash = %prefix,
                    "deadline elapsed; abandoning wait, engine runs to completion"
                );
                tokio::spawn(async move {
                    match handle.await {
                        Ok(result) => tracing::info!(
                            output_hash = %prefix,
                            success = result.is_success(),
                            "late proof result discarded"
                        ),
                        Err(e) => tracing::error!(error = %e, "abandoned proof task failed"),
                    }
                });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockEngine;

    fn setup_store(dir: &Path) -> ArtifactStore {
        for name in [
            crate::artifacts::COMPILED_CIRCUIT_FILE,
            crate::artifacts::SETTINGS_FILE,
            crate::artifacts::SRS_FILE,
            crate::artifacts::PROVING_KEY_FILE,
            crate::artifacts::VERIFICATION_KEY_FILE,
        ] {
            std::fs::write(dir.join(name), b"stub").unwrap();
        }
        ArtifactStore::new(dir)
    }

    #[test]
    fn new_rejects_missing_setup() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let err = ProofPipeline::new(store, MockEngine::new()).unwrap_err();
        assert!(matches!(err, ProverError::MissingArtifact(_)));
    }

    #[test]
    fn stage_display_names() {
        assert_eq!(ProofStage::BuildInput.to_string(), "BUILD_INPUT");
        assert_eq!(ProofStage::GenWitness.to_string(), "GEN_WITNESS");
        assert_eq!(ProofStage::GenProof.to_string(), "GEN_PROOF");
        assert_eq!(ProofStage::LocalVerify.to_string(), "LOCAL_VERIFY");
    }

    #[test]
    fn success_result_wire_shape() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ProofPipeline::new(setup_store(dir.path()), MockEngine::new()).unwrap();
        let result = pipeline.generate(&ProofRequest::new("agent output text"));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], true);
        for key in [
            "proof",
            "outputHash",
            "proofSizeBytes",
            "generationTimeMs",
            "instanceCount",
            "verified",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["instanceCount"], 16);
        assert_eq!(value["verified"], true);
        assert_eq!(
            value["outputHash"],
            OutputDigest::of_text("agent output text").to_hex()
        );
    }

    #[test]
    fn failure_result_wire_shape() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline =
            ProofPipeline::new(setup_store(dir.path()), MockEngine::failing_proof()).unwrap();
        let result = pipeline.generate(&ProofRequest::new("doomed"));

        assert!(!result.is_success());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["error"].as_str().unwrap().contains("prove failed"));
        assert_eq!(value["outputHash"], OutputDigest::of_text("doomed").to_hex());
        assert!(value.get("proof").is_none());
    }

    #[test]
    fn rejected_verification_is_success_with_verified_false() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline =
            ProofPipeline::new(setup_store(dir.path()), MockEngine::rejecting()).unwrap();
        let result = pipeline.generate(&ProofRequest::new("unverifiable"));

        assert!(result.is_success());
        match result {
            ProofResult::Success { verified, .. } => assert!(!verified),
            other => panic!("expected Success, got: {other:?}"),
        }
    }

    #[test]
    fn result_roundtrips_through_serde() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ProofPipeline::new(setup_store(dir.path()), MockEngine::new()).unwrap();
        let result = pipeline.generate(&ProofRequest::new("roundtrip"));

        let json = serde_json::to_string(&result).unwrap();
        let back: ProofResult = serde_json::from_str(&json).unwrap();
        assert!(back.is_success());
        assert_eq!(back.output_hash(), result.output_hash());
    }

    #[test]
    fn request_constructors() {
        let plain = ProofRequest::new("text");
        assert!(plain.job_id.is_none());
        let with_id = ProofRequest::with_job_id("text", "job-7");
        assert_eq!(with_id.job_id.as_deref(), Some("job-7"));
    }
}
