//! # Pipe-Mode Scoring Loop
//!
//! Reads one JSON request per line from stdin indefinitely and writes one
//! JSON response per line to stdout, flushing after each. The loop never
//! terminates on a bad line: malformed JSON, a missing `features` key, or
//! a wrong feature count all produce an `{"error": …}` response and the
//! loop keeps going. Only startup-time model loading is fatal.
//!
//! Startup banner once both models load: `{"status":"ready","models":2}`.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};

use veris_core::FeatureVector;
use veris_model::EnsembleScorer;

/// Arguments for `veris serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Directory containing the two ensemble model artifacts.
    #[arg(long, default_value = "models")]
    pub models_dir: PathBuf,
}

/// One scoring request line.
///
/// A missing `features` key behaves like an empty list, which then fails
/// the length check with a precise message.
#[derive(Debug, Deserialize)]
struct ScoreRequest {
    #[serde(default)]
    features: Vec<f64>,
}

/// Error response line.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Startup banner line.
#[derive(Debug, Serialize)]
struct ReadyBanner {
    status: &'static str,
    models: usize,
}

/// Run pipe mode against real stdin/stdout.
///
/// Returns exit code 1 (after emitting a JSON error line) when model
/// loading fails; 0 when stdin closes normally.
pub fn run_serve(args: &ServeArgs) -> Result<u8> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    let scorer = match EnsembleScorer::load(&args.models_dir) {
        Ok(scorer) => scorer,
        Err(e) => {
            tracing::error!(error = %e, "model loading failed");
            let mut out = stdout.lock();
            write_line(
                &mut out,
                &ErrorResponse {
                    error: format!("Failed to load models: {e}"),
                },
            )?;
            return Ok(1);
        }
    };

    serve_loop(&scorer, stdin.lock(), stdout.lock())?;
    Ok(0)
}

/// The transport loop, generic over streams for testability.
pub fn serve_loop<R, W>(
    scorer: &EnsembleScorer,
    reader: R,
    mut writer: W,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    write_line(
        &mut writer,
        &ReadyBanner {
            status: "ready",
            models: 2,
        },
    )?;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = respond(scorer, line);
        writer.write_all(response.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    Ok(())
}

/// Compute the single-line JSON response for one request line.
///
/// Every failure mode folds into a complete `{"error": …}` record; the
/// caller never sees a half-written or absent response.
fn respond(scorer: &EnsembleScorer, line: &str) -> String {
    let request: ScoreRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            return encode(&ErrorResponse {
                error: format!("Invalid JSON: {e}"),
            });
        }
    };

    let features = match FeatureVector::new(request.features) {
        Ok(features) => features,
        Err(e) => {
            return encode(&ErrorResponse { error: e.to_string() });
        }
    };

    match scorer.score(&features) {
        Ok(prediction) => encode(&prediction),
        Err(e) => encode(&ErrorResponse { error: e.to_string() }),
    }
}

fn encode<T: Serialize>(value: &T) -> String {
    // Serialization of our own response types cannot fail; fall back to a
    // fixed record rather than panicking the loop if it ever does.
    serde_json::to_string(value)
        .unwrap_or_else(|_| r#"{"error":"internal serialization failure"}"#.to_string())
}

fn write_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<()> {
    writer.write_all(encode(value).as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
