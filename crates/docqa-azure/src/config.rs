//! Azure OpenAI configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use docqa_core::{Error, Result};

/// Configuration for the Azure OpenAI client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureOpenAiConfig {
    pub api_key: String,
    pub endpoint: String,
    pub api_version: String,
    pub chat_deployment: String,
    pub embedding_deployment: String,
    /// Dimensionality of the embedding model's vectors
    pub embedding_dimension: usize,
    /// Maximum texts per embeddings request; larger inputs are split
    pub max_batch_size: usize,
    /// Per-request timeout; a timeout is retried like any transient failure
    pub request_timeout: Duration,
}

impl AzureOpenAiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("AZURE_OPENAI_API_KEY").map_err(|_| {
            Error::Configuration("AZURE_OPENAI_API_KEY environment variable not found".to_string())
        })?;

        let endpoint = env::var("AZURE_OPENAI_ENDPOINT").map_err(|_| {
            Error::Configuration("AZURE_OPENAI_ENDPOINT environment variable not found".to_string())
        })?;

        let api_version =
            env::var("AZURE_OPENAI_API_VERSION").unwrap_or_else(|_| "2024-02-01".to_string());

        let chat_deployment =
            env::var("AZURE_OPENAI_DEPLOYMENT_NAME").unwrap_or_else(|_| "gpt-4".to_string());

        let embedding_deployment = env::var("AZURE_OPENAI_EMBEDDING_DEPLOYMENT")
            .unwrap_or_else(|_| "text-embedding-ada-002".to_string());

        Ok(Self {
            api_key,
            endpoint,
            api_version,
            chat_deployment,
            embedding_deployment,
            embedding_dimension: 1536,
            max_batch_size: 16,
            request_timeout: Duration::from_secs(60),
        })
    }

    /// Create configuration with explicit values and default policy
    pub fn new(api_key: String, endpoint: String) -> Self {
        Self {
            api_key,
            endpoint,
            api_version: "2024-02-01".to_string(),
            chat_deployment: "gpt-4".to_string(),
            embedding_deployment: "text-embedding-ada-002".to_string(),
            embedding_dimension: 1536,
            max_batch_size: 16,
            request_timeout: Duration::from_secs(60),
        }
    }
}
