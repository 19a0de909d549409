//! # Artifact Store
//!
//! On-disk lifecycle management for proving materials.
//!
//! Two file populations with opposite lifecycles share the artifacts root:
//!
//! - **Durable** materials produced once by the out-of-band setup phase and
//!   only ever read here: compiled circuit, proving/verification keys,
//!   structured reference string, circuit settings. Their absence is a
//!   fatal precondition, checked by [`ArtifactStore::verify_setup`] before
//!   any request runs.
//! - **Transient** per-request files (input, witness, proof) named by the
//!   request digest's short prefix so concurrent requests never collide.
//!   They are owned by a [`TransientFiles`] guard and deleted on drop —
//!   success, failure, or panic.

use std::path::{Path, PathBuf};

use veris_core::OutputDigest;

use crate::pipeline::ProverError;

/// File name of the compiled circuit.
pub const COMPILED_CIRCUIT_FILE: &str = "model.compiled";

/// File name of the circuit settings/metadata.
pub const SETTINGS_FILE: &str = "settings.json";

/// File name of the structured reference string.
pub const SRS_FILE: &str = "kzg.srs";

/// File name of the proving key.
pub const PROVING_KEY_FILE: &str = "pk.key";

/// File name of the verification key.
pub const VERIFICATION_KEY_FILE: &str = "vk.key";

/// Resolves fixed on-disk locations for proving materials.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at the given artifacts directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The artifacts root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the compiled circuit.
    pub fn compiled_circuit(&self) -> PathBuf {
        self.root.join(COMPILED_CIRCUIT_FILE)
    }

    /// Path of the circuit settings file.
    pub fn settings(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    /// Path of the structured reference string.
    pub fn srs(&self) -> PathBuf {
        self.root.join(SRS_FILE)
    }

    /// Path of the proving key.
    pub fn proving_key(&self) -> PathBuf {
        self.root.join(PROVING_KEY_FILE)
    }

    /// Path of the verification key.
    pub fn verification_key(&self) -> PathBuf {
        self.root.join(VERIFICATION_KEY_FILE)
    }

    /// Check that every durable setup artifact exists.
    ///
    /// Reports the first missing file as [`ProverError::MissingArtifact`].
    /// This is a startup precondition, distinct from per-request pipeline
    /// failures: a missing key means setup never ran, and no request can
    /// succeed until it does.
    pub fn verify_setup(&self) -> Result<(), ProverError> {
        for path in [
            self.compiled_circuit(),
            self.settings(),
            self.srs(),
            self.proving_key(),
            self.verification_key(),
        ] {
            if !path.is_file() {
                return Err(ProverError::MissingArtifact(path));
            }
        }
        Ok(())
    }

    /// Allocate the transient file set for one request.
    ///
    /// Paths are namespaced by the digest's 8-char prefix; two concurrent
    /// requests over different texts therefore never share paths. The
    /// returned guard owns the files exclusively for the request's
    /// lifetime.
    pub fn transient(&self, digest: &OutputDigest) -> TransientFiles {
        let prefix = digest.short_prefix();
        TransientFiles {
            input: self.root.join(format!("input_{prefix}.json")),
            witness: self.root.join(format!("witness_{prefix}.json")),
            proof: self.root.join(format!("proof_{prefix}.json")),
        }
    }
}

/// Per-request input/witness/proof file set, deleted on drop.
///
/// The guard is the structural CLEANUP edge of the proof state machine:
/// holding it for exactly the duration of one request makes
/// cleanup-on-every-exit a property of scope, not of control flow.
#[derive(Debug)]
pub struct TransientFiles {
    input: PathBuf,
    witness: PathBuf,
    proof: PathBuf,
}

impl TransientFiles {
    /// Path of the per-request circuit input file.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Path of the per-request witness file.
    pub fn witness(&self) -> &Path {
        &self.witness
    }

    /// Path of the per-request proof file.
    pub fn proof(&self) -> &Path {
        &self.proof
    }

    /// Best-effort removal of whichever files exist.
    ///
    /// Deletion failures are logged and swallowed: cleanup must never mask
    /// the request's own success or error.
    fn remove_all(&self) {
        for path in [&self.input, &self.witness, &self.proof] {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to remove transient proof file"
                    );
                }
            }
        }
    }
}

impl Drop for TransientFiles {
    fn drop(&mut self) {
        self.remove_all();
    }
}
