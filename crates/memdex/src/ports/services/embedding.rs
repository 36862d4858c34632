//! Embedding Generator Port
//!
//! Abstract interface for text embedding generation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::MemoryError;

/// Service interface for turning query text into a vector
#[async_trait]
pub trait EmbeddingGenerator: Send + Sync {
    /// Generate the embedding vector for `text`
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>, MemoryError>;
}

#[async_trait]
impl<T: EmbeddingGenerator + ?Sized> EmbeddingGenerator for Arc<T> {
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        (**self).generate_embedding(text).await
    }
}
