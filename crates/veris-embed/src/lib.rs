//! # veris-embed — Content-Bound Text Embeddings
//!
//! Maps arbitrary text to a deterministic 16-dimensional
//! [`EmbeddingVector`] cryptographically bound to the text's SHA-256
//! digest. The embedding is the circuit input of the proof pipeline:
//! because it is a pure function of the text, a verifier that trusts the
//! derivation can check that a proof's public instances belong to a
//! specific output.
//!
//! ## Derivation
//!
//! 1. `digest = SHA-256(text)`.
//! 2. Seed a `StdRng` from the big-endian u32 of the digest's first 4
//!    bytes and draw 16 independent standard-normal values.
//! 3. Scan the fixed sentiment lexicon ([`lexicon`]) over the lowercased
//!    text: +0.3 per bullish word present, −0.3 per bearish word present.
//! 4. Overwrite slot 14 with `tanh(sentiment)` and slot 15 with the
//!    sentiment sign (−1.0 / 0.0 / +1.0).
//!
//! No normalization beyond the tanh-clamped slot; the base draws are
//! intentionally unbounded.
//!
//! ## Guarantees
//!
//! - Deterministic: identical text yields a bit-identical vector.
//! - Total: never fails, including on empty text (zero-sentiment vector).

pub mod lexicon;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use veris_core::{EmbeddingVector, OutputDigest, EMBEDDING_DIM};

pub use lexicon::{sentiment_signal, BEARISH_WORDS, BULLISH_WORDS, WORD_WEIGHT};

/// Slot overwritten with `tanh(sentiment)`.
pub const SENTIMENT_SLOT: usize = 14;

/// Slot overwritten with the sentiment sign.
pub const SIGN_SLOT: usize = 15;

/// Embed text into its deterministic circuit input vector.
///
/// Convenience wrapper over [`embed_with_digest`] for callers that do not
/// need the digest.
pub fn embed(text: &str) -> EmbeddingVector {
    embed_with_digest(text).1
}

/// Embed text, returning both the content digest and the vector.
///
/// The proof pipeline uses the digest for transient-file namespacing and
/// result reporting, so it is computed exactly once here.
pub fn embed_with_digest(text: &str) -> (OutputDigest, EmbeddingVector) {
    let digest = OutputDigest::of_text(text);

    let mut rng = StdRng::seed_from_u64(u64::from(digest.seed()));
    let mut values = [0.0f64; EMBEDDING_DIM];
    for v in values.iter_mut() {
        *v = StandardNormal.sample(&mut rng);
    }

    let sentiment = lexicon::sentiment_signal(text);
    values[SENTIMENT_SLOT] = sentiment.tanh();
    values[SIGN_SLOT] = if sentiment > 0.0 {
        1.0
    } else if sentiment < 0.0 {
        -1.0
    } else {
        0.0
    };

    tracing::debug!(
        digest = %digest.short_prefix(),
        sentiment,
        "embedded text into circuit input"
    );

    (digest, EmbeddingVector::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn embed_is_deterministic() {
        let text = "the agent reported steady growth in Q3";
        let a = embed(text);
        let b = embed(text);
        // Bit-identical, not merely approximately equal.
        for i in 0..EMBEDDING_DIM {
            assert_eq!(a[i].to_bits(), b[i].to_bits(), "slot {i} differs");
        }
    }

    #[test]
    fn embed_with_digest_agrees_with_embed() {
        let text = "same text, two entry points";
        let (digest, e) = embed_with_digest(text);
        assert_eq!(digest, OutputDigest::of_text(text));
        assert_eq!(e, embed(text));
    }

    #[test]
    fn different_text_changes_base_draws() {
        let a = embed("output one");
        let b = embed("output two");
        // Different digests seed different RNG streams; with overwhelming
        // probability at least one base slot differs.
        assert!(
            (0..SENTIMENT_SLOT).any(|i| a[i] != b[i]),
            "base slots unexpectedly identical"
        );
    }

    #[test]
    fn empty_text_is_valid_and_neutral() {
        let e = embed("");
        assert_eq!(e[SENTIMENT_SLOT], 0.0);
        assert_eq!(e[SIGN_SLOT], 0.0);
    }

    #[test]
    fn neutral_text_has_zero_sentiment_slots() {
        let e = embed("completely neutral phrasing");
        assert_eq!(e[SENTIMENT_SLOT], 0.0);
        assert_eq!(e[SIGN_SLOT], 0.0);
    }

    #[test]
    fn bullish_and_bearish_texts_have_opposite_signs() {
        let bullish = embed("huge growth and gains, bullish outlook");
        let bearish = embed("massive decline and losses, bearish outlook");

        assert!(bullish[SENTIMENT_SLOT] > 0.0);
        assert_eq!(bullish[SIGN_SLOT], 1.0);

        assert!(bearish[SENTIMENT_SLOT] < 0.0);
        assert_eq!(bearish[SIGN_SLOT], -1.0);

        assert_ne!(bullish[SENTIMENT_SLOT], bearish[SENTIMENT_SLOT]);
        assert_ne!(bullish[SIGN_SLOT], bearish[SIGN_SLOT]);
    }

    #[test]
    fn one_extra_bullish_word_moves_both_sentiment_slots() {
        let base = embed("the plan");
        let bullish = embed("the growth plan");
        assert_ne!(base[SENTIMENT_SLOT], bullish[SENTIMENT_SLOT]);
        assert_ne!(base[SIGN_SLOT], bullish[SIGN_SLOT]);
        assert!((bullish[SENTIMENT_SLOT] - 0.3f64.tanh()).abs() < 1e-12);
    }

    #[test]
    fn sentiment_slot_is_tanh_clamped() {
        // Every bullish word at once: sentiment = 2.1, slot 14 = tanh(2.1).
        let text = BULLISH_WORDS.join(" ");
        let e = embed(&text);
        assert!((e[SENTIMENT_SLOT] - (0.3f64 * 7.0).tanh()).abs() < 1e-12);
        assert!(e[SENTIMENT_SLOT] < 1.0);
    }

    #[test]
    fn seed_comes_from_digest_prefix() {
        // Two texts with equal sentiment but different digests must differ
        // in the base draws.
        let a = embed("alpha");
        let b = embed("bravo");
        assert_eq!(a[SIGN_SLOT], b[SIGN_SLOT]);
        assert_ne!(a.as_slice()[..SENTIMENT_SLOT], b.as_slice()[..SENTIMENT_SLOT]);
    }

    proptest! {
        #[test]
        fn embed_never_panics_and_is_stable(text in ".*") {
            let a = embed(&text);
            let b = embed(&text);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn sign_slot_is_ternary(text in ".*") {
            let e = embed(&text);
            prop_assert!(e[SIGN_SLOT] == -1.0 || e[SIGN_SLOT] == 0.0 || e[SIGN_SLOT] == 1.0);
        }

        #[test]
        fn sentiment_slot_is_clamped(text in ".*") {
            let e = embed(&text);
            prop_assert!(e[SENTIMENT_SLOT] > -1.0 && e[SENTIMENT_SLOT] < 1.0);
        }
    }
}
