//! # Sentiment Lexicon
//!
//! Fixed bullish/bearish word lists and the additive sentiment signal
//! computed over them. The scan is a case-insensitive substring presence
//! check: each listed word contributes its ±0.3 increment at most once per
//! text, regardless of how many times it occurs. Accumulation is unbounded
//! and unnormalized; the embedder tanh-clamps one slot downstream.
//!
//! This is intentionally simplistic and is preserved bit-for-bit for
//! compatibility with already-issued proofs. Substring matching means
//! "gains" hits "gain" and "profitable" hits "profit".

/// Words that push the sentiment signal up (+0.3 each when present).
pub const BULLISH_WORDS: [&str; 7] = [
    "growth", "increase", "profit", "bullish", "rise", "gain", "positive",
];

/// Words that push the sentiment signal down (−0.3 each when present).
pub const BEARISH_WORDS: [&str; 7] = [
    "decline", "decrease", "loss", "bearish", "fall", "drop", "negative",
];

/// Per-word increment magnitude.
pub const WORD_WEIGHT: f64 = 0.3;

/// Compute the raw sentiment signal for a piece of text.
///
/// Empty or lexicon-free text yields exactly `0.0`.
pub fn sentiment_signal(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let mut sentiment = 0.0;
    for word in BULLISH_WORDS {
        if lower.contains(word) {
            sentiment += WORD_WEIGHT;
        }
    }
    for word in BEARISH_WORDS {
        if lower.contains(word) {
            sentiment -= WORD_WEIGHT;
        }
    }
    sentiment
}
