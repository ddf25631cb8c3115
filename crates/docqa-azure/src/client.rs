//! Azure OpenAI client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use docqa_core::{
    CompletionService, EmbeddingClient, Error, Result, RetryPolicy, retry_with_backoff,
};

use crate::config::AzureOpenAiConfig;

/// Azure OpenAI client providing embeddings and chat completions
pub struct AzureOpenAiClient {
    config: AzureOpenAiConfig,
    retry: RetryPolicy,
    client: Client,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingResponse {
    pub(crate) data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingItem {
    pub(crate) index: usize,
    pub(crate) embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl AzureOpenAiClient {
    /// Create a new client from configuration
    pub fn new(config: AzureOpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            config,
            retry: RetryPolicy::default(),
            client,
        })
    }

    /// Create a new client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = AzureOpenAiConfig::from_env()?;
        Self::new(config)
    }

    /// Override the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            deployment,
            operation,
            self.config.api_version
        )
    }

    /// One embeddings request for a single transport batch
    async fn request_embeddings(&self, batch: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = self.deployment_url(&self.config.embedding_deployment, "embeddings");

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .json(&EmbeddingRequest { input: batch })
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(map_status_error(status, &body, |detail| {
                Error::EmbeddingService(detail)
            }));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        correlate_embeddings(body.data, batch.len(), self.config.embedding_dimension)
    }

    async fn request_completion(&self, prompt: &str) -> Result<String> {
        let url = self.deployment_url(&self.config.chat_deployment, "chat/completions");

        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: 1000,
            temperature: 0.3,
            top_p: 0.95,
        };

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(map_status_error(status, &body, |detail| {
                Error::GenerationService(detail)
            }));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::GenerationService("empty completion response".to_string()))
    }
}

/// Re-order response items by their service-reported index and validate
/// count and dimensionality
///
/// Correlation is batch-local: ordering never relies on arrival order, so
/// interleaved calls at the transport layer cannot cross wires.
pub(crate) fn correlate_embeddings(
    mut data: Vec<EmbeddingItem>,
    input_len: usize,
    dimension: usize,
) -> Result<Vec<Vec<f32>>> {
    if data.len() != input_len {
        return Err(Error::EmbeddingService(format!(
            "service returned {} embeddings for {} inputs",
            data.len(),
            input_len
        )));
    }

    data.sort_by_key(|item| item.index);

    for item in &data {
        if item.embedding.len() != dimension {
            return Err(Error::DimensionMismatch {
                expected: dimension,
                actual: item.embedding.len(),
            });
        }
    }

    Ok(data.into_iter().map(|item| item.embedding).collect())
}

fn map_request_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(err.to_string())
    } else {
        Error::Network(err.to_string())
    }
}

/// Server-side overload and transient statuses map to retryable errors,
/// everything else surfaces as a service error immediately
fn map_status_error(
    status: reqwest::StatusCode,
    body: &str,
    service_error: impl Fn(String) -> Error,
) -> Error {
    let detail = format!("request failed with status {}: {}", status, body);
    if status.is_server_error()
        || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
    {
        Error::Network(detail)
    } else {
        service_error(detail)
    }
}

/// Map an exhausted transient failure to the service-level error kind
fn exhausted(err: Error, service_error: impl Fn(String) -> Error) -> Error {
    if err.is_transient() {
        service_error(format!("retries exhausted: {}", err))
    } else {
        err
    }
}

#[async_trait]
impl EmbeddingClient for AzureOpenAiClient {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.config.max_batch_size) {
            let vectors = retry_with_backoff(&self.retry, || self.request_embeddings(batch))
                .await
                .map_err(|err| exhausted(err, Error::EmbeddingService))?;
            all.extend(vectors);
        }

        tracing::debug!(
            inputs = texts.len(),
            batches = texts.len().div_ceil(self.config.max_batch_size),
            "embedded texts"
        );
        Ok(all)
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dimension
    }
}

#[async_trait]
impl CompletionService for AzureOpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        retry_with_backoff(&self.retry, || self.request_completion(prompt))
            .await
            .map_err(|err| exhausted(err, Error::GenerationService))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn item(index: usize, value: f32) -> EmbeddingItem {
        EmbeddingItem {
            index,
            embedding: vec![value, value],
        }
    }

    #[test]
    fn test_correlate_reorders_by_service_index() {
        let data = vec![item(2, 2.0), item(0, 0.0), item(1, 1.0)];
        let vectors = correlate_embeddings(data, 3, 2).unwrap();
        assert_eq!(
            vectors,
            vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0, 2.0]]
        );
    }

    #[test]
    fn test_correlate_rejects_count_mismatch() {
        let data = vec![item(0, 0.0)];
        let err = correlate_embeddings(data, 2, 2).unwrap_err();
        assert!(matches!(err, Error::EmbeddingService(_)));
    }

    #[test]
    fn test_correlate_rejects_dimension_mismatch() {
        let data = vec![EmbeddingItem {
            index: 0,
            embedding: vec![0.0; 1024],
        }];
        let err = correlate_embeddings(data, 1, 1536).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 1536,
                actual: 1024
            }
        ));
    }

    #[test]
    fn test_status_error_classification() {
        let transient =
            map_status_error(StatusCode::TOO_MANY_REQUESTS, "slow down", Error::EmbeddingService);
        assert!(transient.is_transient());

        let transient =
            map_status_error(StatusCode::INTERNAL_SERVER_ERROR, "oops", Error::EmbeddingService);
        assert!(transient.is_transient());

        let permanent =
            map_status_error(StatusCode::BAD_REQUEST, "bad input", Error::EmbeddingService);
        assert!(matches!(permanent, Error::EmbeddingService(_)));
    }

    #[test]
    fn test_exhausted_maps_transient_to_service_error() {
        let err = exhausted(
            Error::Timeout("embedding request".to_string()),
            Error::EmbeddingService,
        );
        assert!(matches!(err, Error::EmbeddingService(_)));

        let err = exhausted(
            Error::InvalidQuery("bad".to_string()),
            Error::EmbeddingService,
        );
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn test_deployment_url_trims_trailing_slash() {
        let config = AzureOpenAiConfig::new(
            "key".to_string(),
            "https://example.openai.azure.com/".to_string(),
        );
        let client = AzureOpenAiClient::new(config).unwrap();

        assert_eq!(
            client.deployment_url("text-embedding-ada-002", "embeddings"),
            "https://example.openai.azure.com/openai/deployments/text-embedding-ada-002/embeddings?api-version=2024-02-01"
        );
    }
}
