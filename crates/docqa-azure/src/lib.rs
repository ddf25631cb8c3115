//! Azure OpenAI client for DocQA
//!
//! Implements the `docqa-core` embedding and completion traits over the
//! Azure OpenAI REST API, with transparent request batching, bounded
//! retry-with-backoff, and per-request timeouts.

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::AzureOpenAiClient;
pub use config::AzureOpenAiConfig;
