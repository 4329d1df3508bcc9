use std::sync::Arc;

use tracing::{debug, warn};

use super::mistral::MistralEmbedder;
use super::{fallback, Embedder, Embeddings, FallbackReason};
use crate::config::{EmbedBackend, EmbedConfig};

/// Async front for an [`Embedder`] that never fails.
///
/// Without a provider every text gets a synthetic vector. When the provider
/// errors, every text gets a zero vector. Either way the caller receives
/// exactly one vector per text, in order.
#[derive(Clone)]
pub struct EmbeddingClient {
    provider: Option<Arc<dyn Embedder>>,
    dimensions: usize,
}

impl EmbeddingClient {
    pub fn new(provider: Arc<dyn Embedder>) -> Self {
        let dimensions = provider.dimensions();
        Self {
            provider: Some(provider),
            dimensions,
        }
    }

    /// A client with no credential: every call returns synthetic vectors.
    pub fn offline(dimensions: usize) -> Self {
        Self {
            provider: None,
            dimensions,
        }
    }

    /// Build from config, reading the API key from the configured
    /// environment variable. A missing or blank key yields an offline client.
    pub fn from_config(config: &EmbedConfig) -> Self {
        match &config.backend {
            EmbedBackend::Mistral {
                model,
                url,
                api_key_env,
            } => match std::env::var(api_key_env).ok().filter(|k| !k.trim().is_empty()) {
                Some(key) => Self::new(Arc::new(MistralEmbedder::new(
                    url,
                    model,
                    key,
                    config.dimensions,
                ))),
                None => {
                    warn!(
                        env = %api_key_env,
                        "embedding credential not set; semantic scores will use synthetic vectors"
                    );
                    Self::offline(config.dimensions)
                }
            },
            EmbedBackend::None => Self::offline(config.dimensions),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Embed all texts with one provider call.
    pub async fn embed(&self, texts: Vec<String>) -> Embeddings {
        let count = texts.len();

        let Some(provider) = &self.provider else {
            warn!(count, "no embedding credential configured; using synthetic vectors");
            let vectors = texts
                .iter()
                .map(|t| fallback::synthetic(t, self.dimensions))
                .collect();
            return Embeddings::Fallback {
                vectors,
                reason: FallbackReason::MissingCredential,
            };
        };

        let provider = Arc::clone(provider);
        let joined = tokio::task::spawn_blocking(move || {
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            provider.embed_batch(&refs)
        })
        .await;

        let error = match joined {
            Ok(Ok(vectors)) if vectors.len() == count => {
                debug!(count, "embedded batch");
                return Embeddings::Provided(vectors);
            }
            Ok(Ok(vectors)) => format!(
                "provider returned {} vectors for {count} texts",
                vectors.len()
            ),
            Ok(Err(e)) => format!("{e:#}"),
            Err(e) => format!("embedding task failed: {e}"),
        };

        warn!(%error, count, "embedding provider failed; using zero vectors");
        Embeddings::Fallback {
            vectors: vec![fallback::zeros(self.dimensions); count],
            reason: FallbackReason::ProviderError(error),
        }
    }
}
