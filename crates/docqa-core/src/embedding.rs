//! Embedding client trait

use async_trait::async_trait;

use crate::Result;

/// Trait for embedding services (e.g. Azure OpenAI embeddings)
///
/// Implementations convert text into fixed-dimension vectors. Internal
/// transport batching must be invisible to callers: the result always has
/// one vector per input text, in input order.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embed a batch of texts, order-preserving and same length as the input
    ///
    /// Transient transport failures are retried internally; once retries are
    /// exhausted the call fails with `Error::EmbeddingService` and no partial
    /// result is returned.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// The fixed dimensionality of every vector this client produces
    fn dimension(&self) -> usize;
}
