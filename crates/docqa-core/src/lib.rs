//! Core traits and types for DocQA (single-document question answering)
//!
//! This crate defines the fundamental traits and types used across the DocQA
//! system. It provides capability-facing interfaces for embedding services,
//! text-completion services, and text extractors, making the retrieval
//! pipeline test-friendly and extensible.

pub mod completion;
pub mod embedding;
pub mod error;
pub mod extractor;
pub mod retry;
pub mod types;

pub use completion::CompletionService;
pub use embedding::EmbeddingClient;
pub use error::{Error, Result};
pub use extractor::{PlainTextExtractor, TextExtractor};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use types::*;
