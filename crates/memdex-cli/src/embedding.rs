//! OpenAI embedding generator used by `similar` and `add`

use async_trait::async_trait;
use memdex::{EmbeddingGenerator, MemoryError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Embedding generator backed by the OpenAI embeddings endpoint
#[derive(Clone)]
pub struct OpenAiEmbedding {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbedding {
    /// A missing key is only reported when an embedding is requested
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            base_url: OPENAI_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl EmbeddingGenerator for OpenAiEmbedding {
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            MemoryError::Embedding("OPENAI_API_KEY is not set".to_string())
        })?;

        let request = EmbeddingRequest {
            input: text,
            model: &self.model,
        };

        debug!(model = %self.model, chars = text.len(), "Requesting embedding");
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MemoryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(MemoryError::Embedding(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| MemoryError::Serialization(e.to_string()))?;

        embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| MemoryError::Embedding("No embedding returned".to_string()))
    }
}
