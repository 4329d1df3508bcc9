use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::{Embedder, Embedding};

pub const DEFAULT_URL: &str = "https://api.mistral.ai";
pub const DEFAULT_MODEL: &str = "mistral-embed";
pub const DEFAULT_DIMENSIONS: usize = 1024;

pub struct MistralEmbedder {
    base_url: String,
    model: String,
    api_key: String,
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

impl MistralEmbedder {
    pub fn new(base_url: &str, model: &str, api_key: impl Into<String>, dimensions: usize) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.into(),
            dimensions,
        }
    }

    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self::new(DEFAULT_URL, DEFAULT_MODEL, api_key, DEFAULT_DIMENSIONS)
    }
}

impl Embedder for MistralEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding> {
        self.embed_batch(&[text])?
            .pop()
            .context("mistral returned no embedding")
    }

    /// One request for the whole batch. Items come back in request order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/embeddings", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let result = ureq::post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send_json(&body);

        let mut response = match result {
            Ok(r) => r,
            Err(ureq::Error::StatusCode(code)) => {
                bail!("mistral returned HTTP {code}");
            }
            Err(e) => {
                return Err(anyhow::anyhow!(e).context("mistral embedding request failed"));
            }
        };

        let resp: EmbeddingResponse = response
            .body_mut()
            .read_json()
            .context("parsing mistral response")?;

        into_vectors(resp, texts.len())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn into_vectors(resp: EmbeddingResponse, expected: usize) -> Result<Vec<Embedding>> {
    if resp.data.len() != expected {
        bail!(
            "mistral returned {} embeddings for {expected} inputs",
            resp.data.len()
        );
    }
    Ok(resp.data.into_iter().map(|item| item.embedding).collect())
}
