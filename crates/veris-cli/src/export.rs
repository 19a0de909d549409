//! # Solidity Verifier Export
//!
//! `veris export-verifier`: emits a standalone verifier contract from the
//! durable verification key, circuit settings, and reference string. A
//! setup-time operation for external-chain verification — never part of
//! the per-request path.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use veris_prover::{ArtifactStore, EzklEngine, MockEngine, ProofPipeline, ProvingEngine};

/// Arguments for `veris export-verifier`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Directory holding the durable proving artifacts.
    #[arg(long, default_value = "models")]
    pub artifacts_dir: PathBuf,

    /// Output path of the Solidity contract.
    #[arg(long, default_value = "Verifier.sol")]
    pub out: PathBuf,

    /// Path of the `ezkl` binary.
    #[arg(long, default_value = "ezkl")]
    pub engine_binary: PathBuf,

    /// Use the deterministic mock engine instead of `ezkl`.
    #[arg(long)]
    pub mock: bool,
}

/// Run the export.
pub fn run_export(args: &ExportArgs) -> Result<u8> {
    let store = ArtifactStore::new(&args.artifacts_dir);
    if args.mock {
        export_with_engine(args, store, MockEngine::new())
    } else {
        export_with_engine(args, store, EzklEngine::new(&args.engine_binary))
    }
}

fn export_with_engine<E: ProvingEngine>(
    args: &ExportArgs,
    store: ArtifactStore,
    engine: E,
) -> Result<u8> {
    let pipeline = ProofPipeline::new(store, engine)?;
    pipeline.export_evm_verifier(&args.out)?;
    tracing::info!(out = %args.out.display(), "verifier contract written");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veris_prover::artifacts::{
        COMPILED_CIRCUIT_FILE, PROVING_KEY_FILE, SETTINGS_FILE, SRS_FILE, VERIFICATION_KEY_FILE,
    };

    #[test]
    fn mock_export_writes_contract() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            COMPILED_CIRCUIT_FILE,
            SETTINGS_FILE,
            SRS_FILE,
            PROVING_KEY_FILE,
            VERIFICATION_KEY_FILE,
        ] {
            std::fs::write(dir.path().join(name), b"stub").unwrap();
        }
        let out = dir.path().join("Verifier.sol");
        let args = ExportArgs {
            artifacts_dir: dir.path().to_path_buf(),
            out: out.clone(),
            engine_binary: PathBuf::from("ezkl"),
            mock: true,
        };
        assert_eq!(run_export(&args).unwrap(), 0);
        assert!(out.exists());
    }

    #[test]
    fn export_requires_setup() {
        let dir = tempfile::tempdir().unwrap();
        let args = ExportArgs {
            artifacts_dir: dir.path().to_path_buf(),
            out: dir.path().join("Verifier.sol"),
            engine_binary: PathBuf::from("ezkl"),
            mock: true,
        };
        assert!(run_export(&args).is_err());
    }
}
