//! Text feature extraction and small vector helpers.
//!
//! Text is mapped to floats by slicing a SHA-256 digest, not by any learned
//! embedding. The scheme lives behind [`FeatureExtractor`] so callers bind to
//! the interface, not the hashing trick.

use sha2::{Digest, Sha256};

use crate::constants::EPSILON;

/// Maps free text to at most `n` floats in [0, 1).
///
/// Implementations must be deterministic across runs and processes: the same
/// text always yields the same features.
pub trait FeatureExtractor {
    fn features(&self, text: &str, n: usize) -> Vec<f64>;
}

/// Default extractor: 4-byte big-endian windows of the SHA-256 digest,
/// scaled by 2⁻³². A digest yields at most 8 features.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashFeatures;

impl FeatureExtractor for HashFeatures {
    fn features(&self, text: &str, n: usize) -> Vec<f64> {
        let digest = Sha256::digest(text.as_bytes());
        digest
            .chunks_exact(4)
            .take(n)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]) as f64 / (1u64 << 32) as f64)
            .collect()
    }
}

/// Cosine similarity in [-1, 1]. Mismatched lengths or a near-zero norm
/// yield 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a * norm_b < EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance; 0.0 for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}
