//! # One-Shot Proof Mode
//!
//! `veris prove <text> [job_id]`: runs one text through the full proof
//! pipeline and prints a single JSON `ProofResult` to stdout. Progress and
//! diagnostics go to stderr only.
//!
//! A failed proof still exits 0 with a `{"success":false,…}` record — the
//! caller parses the result, it does not inspect exit codes. Only a broken
//! setup (missing durable artifacts) exits nonzero, before any request
//! runs.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use veris_core::OutputDigest;
use veris_prover::{
    ArtifactStore, EzklEngine, MockEngine, ProofPipeline, ProofRequest, ProofResult,
    ProvingEngine,
};

/// Arguments for `veris prove`.
#[derive(Args, Debug)]
pub struct ProveArgs {
    /// The text to certify (typically an agent's output).
    pub text: String,

    /// Job identifier carried through logs. Auto-assigned when omitted.
    pub job_id: Option<String>,

    /// Directory holding the durable proving artifacts.
    #[arg(long, default_value = "models")]
    pub artifacts_dir: PathBuf,

    /// Path of the `ezkl` binary.
    #[arg(long, default_value = "ezkl")]
    pub engine_binary: PathBuf,

    /// Use the deterministic mock engine instead of `ezkl`.
    #[arg(long)]
    pub mock: bool,

    /// Abandon waiting after this many seconds; the engine runs to
    /// completion in the background and the late result is discarded.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Run one-shot proof mode.
pub fn run_prove(args: &ProveArgs) -> Result<u8> {
    let store = ArtifactStore::new(&args.artifacts_dir);
    if args.mock {
        run_with_engine(args, store, MockEngine::new())
    } else {
        run_with_engine(args, store, EzklEngine::new(&args.engine_binary))
    }
}

fn run_with_engine<E: ProvingEngine + 'static>(
    args: &ProveArgs,
    store: ArtifactStore,
    engine: E,
) -> Result<u8> {
    // Missing setup artifacts are fatal and precede any request handling.
    let pipeline = ProofPipeline::new(store, engine)?;

    let job_id = args
        .job_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let request = ProofRequest::with_job_id(args.text.clone(), job_id);

    let result = match args.timeout_secs {
        None => pipeline.generate(&request),
        Some(secs) => {
            let pipeline = Arc::new(pipeline);
            let deadline = Duration::from_secs(secs);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime
                .block_on(pipeline.generate_with_deadline(request, deadline))
                .unwrap_or_else(|| ProofResult::Failure {
                    success: false,
                    error: format!("proof generation abandoned after {secs}s"),
                    output_hash: OutputDigest::of_text(&args.text).to_hex(),
                })
        }
    };

    // The one JSON record this mode is allowed to write to stdout.
    println!("{}", serde_json::to_string(&result)?);
    Ok(0)
}
