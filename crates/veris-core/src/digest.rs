//! # Output Digest
//!
//! SHA-256 content digest of the text being certified. The digest is the
//! single binding point between a piece of text and everything derived from
//! it: the embedding RNG seed, the transient proof file namespace, and the
//! `outputHash` field reported in every proof result.
//!
//! ## Invariant
//!
//! `OutputDigest::of_text` is a pure function of the text's UTF-8 bytes.
//! Two requests over identical text share a digest; two requests over
//! different text get distinct digests (collision resistance of SHA-256),
//! which is what guarantees their transient files never collide.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Length of the digest in bytes (SHA-256).
pub const DIGEST_LEN: usize = 32;

/// Number of hex characters used to namespace per-request transient files.
pub const SHORT_PREFIX_LEN: usize = 8;

/// SHA-256 digest of certified text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputDigest([u8; DIGEST_LEN]);

impl OutputDigest {
    /// Compute the digest of a piece of text.
    pub fn of_text(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Construct from raw digest bytes.
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Full lowercase hex encoding (64 characters).
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// First [`SHORT_PREFIX_LEN`] hex characters.
    ///
    /// Transient proof files are named `input_<prefix>.json` etc., so
    /// concurrent requests over different texts never share file paths.
    pub fn short_prefix(&self) -> String {
        self.to_hex()[..SHORT_PREFIX_LEN].to_string()
    }

    /// Big-endian u32 of the first 4 digest bytes.
    ///
    /// Seeds the embedding RNG, making the pseudo-random base vector a
    /// reproducible function of the text content.
    pub fn seed(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CoreError> {
        if hex.len() != DIGEST_LEN * 2 {
            return Err(CoreError::InvalidDigest(format!(
                "expected {} hex chars, got {}",
                DIGEST_LEN * 2,
                hex.len()
            )));
        }
        let mut bytes = [0u8; DIGEST_LEN];
        for (i, chunk) in bytes.iter_mut().enumerate() {
            let pair = &hex[i * 2..i * 2 + 2];
            *chunk = u8::from_str_radix(pair, 16)
                .map_err(|_| CoreError::InvalidDigest(format!("non-hex pair: {pair:?}")))?;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for OutputDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for OutputDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputDigest({})", self.to_hex())
    }
}

impl TryFrom<String> for OutputDigest {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<OutputDigest> for String {
    fn from(d: OutputDigest) -> Self {
        d.to_hex()
    }
}
