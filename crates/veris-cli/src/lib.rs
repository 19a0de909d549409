//! # veris-cli — The `veris` Command-Line Interface
//!
//! Transport layer over the scoring and proving cores. Two calling
//! conventions, both pure transport — neither alters the precedence or
//! content of what the cores produce:
//!
//! - `veris serve` — persistent pipe mode: one JSON scoring request per
//!   stdin line, one JSON response per stdout line, flushed per line.
//!   A malformed line yields an error response and the loop continues.
//! - `veris prove <text> [job_id]` — one-shot proof mode: a single JSON
//!   `ProofResult` on stdout; all diagnostics on stderr.
//!
//! `veris export-verifier` is the setup-time Solidity export, outside the
//! steady-state request path.
//!
//! ## Stream Discipline
//!
//! stdout carries exactly one well-formed JSON record per response and
//! nothing else; tracing output goes to stderr so callers can parse
//! stdout unconditionally.

pub mod export;
pub mod prove;
pub mod serve;
