//! # veris CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Tracing goes to stderr so stdout stays reserved for the single-purpose
//! JSON protocols of `serve` and `prove`.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use veris_cli::export::{run_export, ExportArgs};
use veris_cli::prove::{run_prove, ProveArgs};
use veris_cli::serve::{run_serve, ServeArgs};

/// VERIS — verifiable risk scoring for agent outputs.
///
/// Scores text-derived feature vectors with a recall/precision ensemble
/// and certifies texts with content-bound zero-knowledge proofs.
#[derive(Parser, Debug)]
#[command(name = "veris", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pipe mode: JSON scoring requests on stdin, predictions on stdout.
    Serve(ServeArgs),

    /// One-shot mode: generate a content-bound proof for a text.
    Prove(ProveArgs),

    /// Emit a standalone Solidity verifier contract (setup-time).
    ExportVerifier(ExportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // stderr only: stdout belongs to the JSON result protocols.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => run_serve(&args),
        Commands::Prove(args) => run_prove(&args),
        Commands::ExportVerifier(args) => run_export(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["veris", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.models_dir, PathBuf::from("models"));
            }
            other => panic!("expected Serve, got: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_serve_with_models_dir() {
        let cli =
            Cli::try_parse_from(["veris", "serve", "--models-dir", "/opt/models"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.models_dir, PathBuf::from("/opt/models"));
            }
            other => panic!("expected Serve, got: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_prove_text_only() {
        let cli = Cli::try_parse_from(["veris", "prove", "some agent output"]).unwrap();
        match cli.command {
            Commands::Prove(args) => {
                assert_eq!(args.text, "some agent output");
                assert!(args.job_id.is_none());
                assert!(!args.mock);
                assert!(args.timeout_secs.is_none());
            }
            other => panic!("expected Prove, got: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_prove_with_job_id() {
        let cli = Cli::try_parse_from(["veris", "prove", "text", "job-42"]).unwrap();
        match cli.command {
            Commands::Prove(args) => {
                assert_eq!(args.job_id.as_deref(), Some("job-42"));
            }
            other => panic!("expected Prove, got: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_prove_all_options() {
        let cli = Cli::try_parse_from([
            "veris",
            "prove",
            "text",
            "job-1",
            "--artifacts-dir",
            "/opt/artifacts",
            "--engine-binary",
            "/usr/local/bin/ezkl",
            "--mock",
            "--timeout-secs",
            "120",
        ])
        .unwrap();
        match cli.command {
            Commands::Prove(args) => {
                assert_eq!(args.artifacts_dir, PathBuf::from("/opt/artifacts"));
                assert_eq!(args.engine_binary, PathBuf::from("/usr/local/bin/ezkl"));
                assert!(args.mock);
                assert_eq!(args.timeout_secs, Some(120));
            }
            other => panic!("expected Prove, got: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_export_verifier() {
        let cli = Cli::try_parse_from([
            "veris",
            "export-verifier",
            "--out",
            "contracts/Verifier.sol",
        ])
        .unwrap();
        match cli.command {
            Commands::ExportVerifier(args) => {
                assert_eq!(args.out, PathBuf::from("contracts/Verifier.sol"));
            }
            other => panic!("expected ExportVerifier, got: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli0 = Cli::try_parse_from(["veris", "serve"]).unwrap();
        assert_eq!(cli0.verbose, 0);
        let cli2 = Cli::try_parse_from(["veris", "-vv", "serve"]).unwrap();
        assert_eq!(cli2.verbose, 2);
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["veris"]).is_err());
    }

    #[test]
    fn cli_parse_prove_requires_text() {
        assert!(Cli::try_parse_from(["veris", "prove"]).is_err());
    }
}
