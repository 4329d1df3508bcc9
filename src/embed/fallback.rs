//! Substitute vectors used when the provider can't be asked or can't answer.

use super::Embedding;

const MIN_COMPONENT: f32 = 0.001;
const MAX_COMPONENT: f32 = 0.1;

/// Deterministic stand-in for a real embedding, derived from a BLAKE3 hash of
/// the text. Every component lies in `[0.001, 0.1]`, so the vector is never
/// zero and the same text always maps to the same vector.
pub fn synthetic(text: &str, dimensions: usize) -> Embedding {
    let mut bytes = vec![0u8; dimensions];
    let mut hasher = blake3::Hasher::new();
    hasher.update(text.as_bytes());
    hasher.finalize_xof().fill(&mut bytes);

    bytes
        .iter()
        .map(|&b| MIN_COMPONENT + (b as f32 / 255.0) * (MAX_COMPONENT - MIN_COMPONENT))
        .collect()
}

/// All-zero vector; any similarity against it is 0.
pub fn zeros(dimensions: usize) -> Embedding {
    vec![0.0; dimensions]
}
