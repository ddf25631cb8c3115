//! Text-completion service trait

use async_trait::async_trait;

use crate::Result;

/// Trait for text-completion services (e.g. Azure OpenAI chat completions)
///
/// The retrieval core never calls this itself: it produces a grounded prompt
/// and the surrounding service layer hands that prompt to an implementation
/// of this trait.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generate an answer for a fully composed prompt
    ///
    /// Fails with `Error::GenerationService` after internal retries are
    /// exhausted.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
