//! Tokenizer adapter over the cl100k_base BPE encoding

use std::sync::Arc;
use tiktoken_rs::{CoreBPE, cl100k_base};

use docqa_core::{Error, Result};

/// Adapter exposing deterministic count/encode/decode over `cl100k_base`,
/// the encoding used by the embedding and chat models.
///
/// Loading the encoding is expensive, so the adapter is cheaply cloneable
/// and one instance is shared by the chunker, composer, and orchestrator.
#[derive(Clone)]
pub struct TokenizerAdapter {
    bpe: Arc<CoreBPE>,
}

impl TokenizerAdapter {
    /// Load the cl100k_base encoding
    pub fn new() -> Result<Self> {
        let bpe = cl100k_base().map_err(|e| Error::Tokenization(e.to_string()))?;
        Ok(Self { bpe: Arc::new(bpe) })
    }

    /// Number of tokens in the text
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Encode text into token ids
    pub fn encode(&self, text: &str) -> Vec<usize> {
        self.bpe.encode_ordinary(text)
    }

    /// Decode token ids back into text
    ///
    /// Fails with `Error::Tokenization` when the token sequence does not
    /// decode to valid text; characters are never silently dropped.
    pub fn decode(&self, tokens: &[usize]) -> Result<String> {
        self.bpe
            .decode(tokens.to_vec())
            .map_err(|e| Error::Tokenization(e.to_string()))
    }
}
