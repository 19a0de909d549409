//! # ezkl CLI Engine
//!
//! [`ProvingEngine`] implementation that shells out to the `ezkl` binary.
//! Each stage maps to one subcommand invocation:
//!
//! ```text
//! gen_witness  → ezkl gen-witness -D <input> -M <circuit> -O <witness>
//! prove        → ezkl prove -W <witness> -M <circuit> --pk-path <pk>
//!                     --proof-path <proof> --srs-path <srs>
//! verify       → ezkl verify --proof-path <proof> -S <settings>
//!                     --vk-path <vk> --srs-path <srs>
//! evm verifier → ezkl create-evm-verifier --vk-path <vk> -S <settings>
//!                     --sol-code-path <out> --srs-path <srs>
//! ```
//!
//! The engine's stdout/stderr never reach our stdout: output is captured
//! and folded into [`EngineError`] messages or trace events, keeping the
//! process's own stdout reserved for parseable results.
//!
//! Proof generation commonly takes tens of seconds; calls block for the
//! full duration and cannot be preempted. Callers that need a timeout
//! abandon the wait (the subprocess runs to completion in the background).

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::engine::{EngineError, ProvingEngine};

/// Drives the external `ezkl` CLI.
#[derive(Debug, Clone)]
pub struct EzklEngine {
    binary: PathBuf,
}

impl Default for EzklEngine {
    fn default() -> Self {
        Self::new("ezkl")
    }
}

impl EzklEngine {
    /// Use the given `ezkl` binary (name resolved via `PATH`, or absolute).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn run(&self, stage: &'static str, args: &[&str]) -> Result<Output, EngineError> {
        tracing::debug!(stage, ?args, "invoking ezkl");
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|source| EngineError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;
        tracing::trace!(
            stage,
            status = ?output.status.code(),
            "ezkl exited"
        );
        Ok(output)
    }

    fn run_expecting_success(
        &self,
        stage: &'static str,
        args: &[&str],
    ) -> Result<(), EngineError> {
        let output = self.run(stage, args)?;
        if output.status.success() {
            return Ok(());
        }
        Err(EngineError::StageFailed {
            stage,
            message: stderr_excerpt(&output),
        })
    }
}

/// Trim the engine's stderr down to a single reportable line.
fn stderr_excerpt(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let last_line = stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim()
        .to_string();
    if last_line.is_empty() {
        format!("exited with status {:?}", output.status.code())
    } else {
        last_line
    }
}

impl ProvingEngine for EzklEngine {
    fn gen_witness(
        &self,
        input: &Path,
        compiled_circuit: &Path,
        witness: &Path,
    ) -> Result<(), EngineError> {
        self.run_expecting_success(
            "gen-witness",
            &[
                "gen-witness",
                "-D",
                &input.display().to_string(),
                "-M",
                &compiled_circuit.display().to_string(),
                "-O",
                &witness.display().to_string(),
            ],
        )
    }

    fn prove(
        &self,
        witness: &Path,
        compiled_circuit: &Path,
        proving_key: &Path,
        proof: &Path,
        srs: &Path,
    ) -> Result<(), EngineError> {
        self.run_expecting_success(
            "prove",
            &[
                "prove",
                "-W",
                &witness.display().to_string(),
                "-M",
                &compiled_circuit.display().to_string(),
                "--pk-path",
                &proving_key.display().to_string(),
                "--proof-path",
                &proof.display().to_string(),
                "--srs-path",
                &srs.display().to_string(),
            ],
        )
    }

    fn verify(
        &self,
        proof: &Path,
        settings: &Path,
        verification_key: &Path,
        srs: &Path,
    ) -> Result<bool, EngineError> {
        let output = self.run(
            "verify",
            &[
                "verify",
                "--proof-path",
                &proof.display().to_string(),
                "-S",
                &settings.display().to_string(),
                "--vk-path",
                &verification_key.display().to_string(),
                "--srs-path",
                &srs.display().to_string(),
            ],
        )?;
        // The verifier signals rejection through its exit status. A nonzero
        // exit after a successful spawn is "proof did not verify", which the
        // pipeline reports as verified:false rather than a failure.
        if !output.status.success() {
            tracing::warn!(message = %stderr_excerpt(&output), "local verification negative");
        }
        Ok(output.status.success())
    }

    fn create_evm_verifier(
        &self,
        verification_key: &Path,
        settings: &Path,
        output: &Path,
        srs: &Path,
    ) -> Result<(), EngineError> {
        self.run_expecting_success(
            "create-evm-verifier",
            &[
                "create-evm-verifier",
                "--vk-path",
                &verification_key.display().to_string(),
                "-S",
                &settings.display().to_string(),
                "--sol-code-path",
                &output.display().to_string(),
                "--srs-path",
                &srs.display().to_string(),
            ],
        )
    }
}
