//! Snapshot tests for the Azure OpenAI client

#[cfg(test)]
mod snapshot_tests {
    use crate::AzureOpenAiConfig;
    use insta::assert_snapshot;
    use std::time::Duration;

    #[test]
    fn test_config_snapshot() {
        let config = AzureOpenAiConfig {
            api_key: "test_api_key_redacted".to_string(),
            endpoint: "https://example.openai.azure.com".to_string(),
            api_version: "2024-02-01".to_string(),
            chat_deployment: "gpt-4".to_string(),
            embedding_deployment: "text-embedding-ada-002".to_string(),
            embedding_dimension: 1536,
            max_batch_size: 16,
            request_timeout: Duration::from_secs(60),
        };

        assert_snapshot!(
            serde_json::to_string_pretty(&config).unwrap(),
            @r###"
        {
          "api_key": "test_api_key_redacted",
          "endpoint": "https://example.openai.azure.com",
          "api_version": "2024-02-01",
          "chat_deployment": "gpt-4",
          "embedding_deployment": "text-embedding-ada-002",
          "embedding_dimension": 1536,
          "max_batch_size": 16,
          "request_timeout": {
            "secs": 60,
            "nanos": 0
          }
        }
        "###
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = AzureOpenAiConfig::new(
            "key".to_string(),
            "https://example.openai.azure.com".to_string(),
        );

        assert_eq!(config.embedding_dimension, 1536);
        assert_eq!(config.max_batch_size, 16);
        assert_eq!(config.api_version, "2024-02-01");
        assert_eq!(config.embedding_deployment, "text-embedding-ada-002");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }
}
