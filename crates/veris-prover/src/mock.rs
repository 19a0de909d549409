//! # Mock Proving Engine
//!
//! A deterministic, transparent [`ProvingEngine`] for development and
//! testing. Produces SHA-256-based "proofs" that are recomputable but
//! provide **no zero-knowledge guarantees**.
//!
//! ## How It Works
//!
//! - `gen_witness` echoes the input file's values into a witness record.
//! - `prove` writes a proof record whose `proof` field is the hex SHA-256
//!   of the witness bytes, with the witness inputs as its single instances
//!   group.
//! - `verify` recomputes the digest from the proof's embedded instances
//!   and, by default, reports the configured verdict.
//!
//! ## Failure Injection
//!
//! Pipeline tests need to fail specific stages on demand:
//! [`MockEngine::failing_witness`] and [`MockEngine::failing_proof`] abort
//! the corresponding stage with a fixed message, and
//! [`MockEngine::rejecting`] makes local verification return `false`
//! without erroring — the "successful generation, negative verification"
//! path.
//!
//! ## Security Warning
//!
//! **NOT PRIVATE.** Anyone can recompute a mock proof from the witness.
//! Mock artifacts must never leave a test or development environment.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::engine::{EngineError, ProvingEngine};

/// Witness record produced by the mock engine.
#[derive(Debug, Serialize, Deserialize)]
struct MockWitness {
    inputs: Vec<Vec<f64>>,
    outputs: Vec<Vec<f64>>,
}

/// Proof record produced by the mock engine.
#[derive(Debug, Serialize, Deserialize)]
struct MockProof {
    protocol: String,
    instances: Vec<Vec<f64>>,
    proof: String,
}

/// Circuit input record shape shared with the real engine.
#[derive(Debug, Serialize, Deserialize)]
struct InputRecord {
    input_data: Vec<Vec<f64>>,
}

/// Deterministic stand-in for the external proving engine.
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    fail_witness: bool,
    fail_proof: bool,
    reject_verification: bool,
}

impl MockEngine {
    /// A well-behaved engine: all stages succeed, verification passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose witness generation always fails.
    pub fn failing_witness() -> Self {
        Self {
            fail_witness: true,
            ..Self::default()
        }
    }

    /// Engine whose proof generation always fails.
    pub fn failing_proof() -> Self {
        Self {
            fail_proof: true,
            ..Self::default()
        }
    }

    /// Engine that generates proofs but rejects them at verification.
    pub fn rejecting() -> Self {
        Self {
            reject_verification: true,
            ..Self::default()
        }
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

impl ProvingEngine for MockEngine {
    fn gen_witness(
        &self,
        input: &Path,
        _compiled_circuit: &Path,
        witness: &Path,
    ) -> Result<(), EngineError> {
        if self.fail_witness {
            return Err(EngineError::StageFailed {
                stage: "gen-witness",
                message: "mock witness failure".to_string(),
            });
        }
        let contents = std::fs::read_to_string(input)?;
        let record: InputRecord = serde_json::from_str(&contents)?;
        let out = MockWitness {
            outputs: record.input_data.clone(),
            inputs: record.input_data,
        };
        std::fs::write(witness, serde_json::to_string(&out)?)?;
        Ok(())
    }

    fn prove(
        &self,
        witness: &Path,
        _compiled_circuit: &Path,
        _proving_key: &Path,
        proof: &Path,
        _srs: &Path,
    ) -> Result<(), EngineError> {
        if self.fail_proof {
            return Err(EngineError::StageFailed {
                stage: "prove",
                message: "mock proving failure".to_string(),
            });
        }
        let witness_bytes = std::fs::read(witness)?;
        let record: MockWitness = serde_json::from_slice(&witness_bytes)?;
        let out = MockProof {
            protocol: "mock-sha256".to_string(),
            instances: record.inputs,
            proof: sha256_hex(&witness_bytes),
        };
        std::fs::write(proof, serde_json::to_string(&out)?)?;
        Ok(())
    }

    fn verify(
        &self,
        proof: &Path,
        _settings: &Path,
        _verification_key: &Path,
        _srs: &Path,
    ) -> Result<bool, EngineError> {
        let contents = std::fs::read_to_string(proof)?;
        let record: MockProof = serde_json::from_str(&contents)?;
        // Structural check only: the payload must be a plausible digest.
        let well_formed =
            record.proof.len() == 64 && record.proof.chars().all(|c| c.is_ascii_hexdigit());
        Ok(well_formed && !self.reject_verification)
    }

    fn create_evm_verifier(
        &self,
        _verification_key: &Path,
        _settings: &Path,
        output: &Path,
        _srs: &Path,
    ) -> Result<(), EngineError> {
        std::fs::write(
            output,
            "// SPDX-License-Identifier: MIT\n// mock verifier stub\ncontract Verifier {}\n",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_input(dir: &Path) -> std::path::PathBuf {
        let input = dir.join("input.json");
        std::fs::write(
            &input,
            serde_json::to_string(&InputRecord {
                input_data: vec![vec![0.5; 16]],
            })
            .unwrap(),
        )
        .unwrap();
        input
    }

    #[test]
    fn witness_echoes_input_values() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let witness = dir.path().join("witness.json");

        let engine = MockEngine::new();
        engine
            .gen_witness(&input, Path::new("circuit"), &witness)
            .unwrap();

        let record: MockWitness =
            serde_json::from_str(&std::fs::read_to_string(&witness).unwrap()).unwrap();
        assert_eq!(record.inputs, vec![vec![0.5; 16]]);
        assert_eq!(record.outputs, record.inputs);
    }

    #[test]
    fn prove_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let witness = dir.path().join("witness.json");
        let proof_a = dir.path().join("proof_a.json");
        let proof_b = dir.path().join("proof_b.json");

        let engine = MockEngine::new();
        engine
            .gen_witness(&input, Path::new("c"), &witness)
            .unwrap();
        engine
            .prove(&witness, Path::new("c"), Path::new("pk"), &proof_a, Path::new("srs"))
            .unwrap();
        engine
            .prove(&witness, Path::new("c"), Path::new("pk"), &proof_b, Path::new("srs"))
            .unwrap();

        assert_eq!(
            std::fs::read(&proof_a).unwrap(),
            std::fs::read(&proof_b).unwrap()
        );
    }

    #[test]
    fn proof_carries_instances_and_hex_payload() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let witness = dir.path().join("witness.json");
        let proof = dir.path().join("proof.json");

        let engine = MockEngine::new();
        engine
            .gen_witness(&input, Path::new("c"), &witness)
            .unwrap();
        engine
            .prove(&witness, Path::new("c"), Path::new("pk"), &proof, Path::new("srs"))
            .unwrap();

        let record: MockProof =
            serde_json::from_str(&std::fs::read_to_string(&proof).unwrap()).unwrap();
        assert_eq!(record.instances[0].len(), 16);
        assert_eq!(record.proof.len(), 64);
    }

    #[test]
    fn verify_accepts_own_proof() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let witness = dir.path().join("witness.json");
        let proof = dir.path().join("proof.json");

        let engine = MockEngine::new();
        engine
            .gen_witness(&input, Path::new("c"), &witness)
            .unwrap();
        engine
            .prove(&witness, Path::new("c"), Path::new("pk"), &proof, Path::new("srs"))
            .unwrap();
        let verified = engine
            .verify(&proof, Path::new("s"), Path::new("vk"), Path::new("srs"))
            .unwrap();
        assert!(verified);
    }

    #[test]
    fn rejecting_engine_returns_false_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let witness = dir.path().join("witness.json");
        let proof = dir.path().join("proof.json");

        let engine = MockEngine::rejecting();
        engine
            .gen_witness(&input, Path::new("c"), &witness)
            .unwrap();
        engine
            .prove(&witness, Path::new("c"), Path::new("pk"), &proof, Path::new("srs"))
            .unwrap();
        let verified = engine
            .verify(&proof, Path::new("s"), Path::new("vk"), Path::new("srs"))
            .unwrap();
        assert!(!verified);
    }

    #[test]
    fn failing_witness_reports_stage() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let err = MockEngine::failing_witness()
            .gen_witness(&input, Path::new("c"), &dir.path().join("w.json"))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::StageFailed {
                stage: "gen-witness",
                ..
            }
        ));
    }

    #[test]
    fn failing_proof_reports_stage() {
        let dir = tempfile::tempdir().unwrap();
        let witness = dir.path().join("witness.json");
        std::fs::write(&witness, r#"{"inputs": [], "outputs": []}"#).unwrap();
        let err = MockEngine::failing_proof()
            .prove(
                &witness,
                Path::new("c"),
                Path::new("pk"),
                &dir.path().join("p.json"),
                Path::new("srs"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::StageFailed { stage: "prove", .. }
        ));
    }

    #[test]
    fn evm_verifier_stub_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("Verifier.sol");
        MockEngine::new()
            .create_evm_verifier(Path::new("vk"), Path::new("s"), &out, Path::new("srs"))
            .unwrap();
        assert!(std::fs::read_to_string(&out)
            .unwrap()
            .contains("contract Verifier"));
    }
}
