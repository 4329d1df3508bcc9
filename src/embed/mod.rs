pub mod client;
pub mod fallback;
pub mod mistral;

use anyhow::Result;

pub use client::EmbeddingClient;

pub type Embedding = Vec<f32>;

/// A provider that turns text into vectors. Implementations block; the
/// async [`EmbeddingClient`] moves them onto the blocking pool.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Embedding>;
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
    fn dimensions(&self) -> usize;
    fn model_name(&self) -> &str;
}

/// Why an embedding call produced substitute vectors.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// No provider credential configured; vectors are synthetic.
    MissingCredential,
    /// The provider call failed; vectors are all zero.
    ProviderError(String),
}

/// Outcome of one batched embedding call. Always holds one vector per input
/// text, in input order.
#[derive(Debug, Clone)]
pub enum Embeddings {
    Provided(Vec<Embedding>),
    Fallback {
        vectors: Vec<Embedding>,
        reason: FallbackReason,
    },
}

impl Embeddings {
    pub fn vectors(&self) -> &[Embedding] {
        match self {
            Embeddings::Provided(vectors) => vectors,
            Embeddings::Fallback { vectors, .. } => vectors,
        }
    }

    pub fn into_vectors(self) -> Vec<Embedding> {
        match self {
            Embeddings::Provided(vectors) => vectors,
            Embeddings::Fallback { vectors, .. } => vectors,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Embeddings::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Embeddings::Provided(_) => None,
            Embeddings::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Cosine of the angle between `a` and `b`.
///
/// Empty or mismatched inputs, zero-magnitude vectors and non-finite results
/// score 0 instead of failing, so a ranking always has a number to work with.
/// The result is not clamped and can be negative.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    // f64 accumulators: squares of large f32 components overflow f32.
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let (mag_a, mag_b) = (norm_a.sqrt(), norm_b.sqrt());
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    let cos = dot / (mag_a * mag_b);
    if cos.is_finite() { cos } else { 0.0 }
}
