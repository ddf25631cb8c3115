//! Token-window chunker with configurable overlap

use docqa_core::{Chunk, Error, Result};

use crate::tokenizer::TokenizerAdapter;

/// Splits text into overlapping windows of at most `chunk_size` tokens,
/// advancing the window start by `chunk_size - overlap` tokens each step.
///
/// `cl100k_base` is a byte-level BPE, so a nominal window boundary can land
/// in the middle of a multi-byte character. Both window edges are aligned to
/// the nearest character-safe token boundary, preferring to shrink the
/// window; a window only grows past `chunk_size` when a single character
/// spans more tokens than the window can hold.
///
/// Chunking is fully deterministic: the same text and configuration always
/// produce the same chunk sequence.
pub struct Chunker {
    tokenizer: TokenizerAdapter,
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker, validating that `overlap < chunk_size` and both are
    /// positive
    pub fn new(tokenizer: TokenizerAdapter, chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Configuration(
                "chunk_size must be positive".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(Error::Configuration(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            tokenizer,
            chunk_size,
            overlap,
        })
    }

    /// Split text into chunks
    ///
    /// Empty or whitespace-only input yields zero chunks; the orchestrator
    /// treats that as an ingest failure. A text shorter than `chunk_size`
    /// tokens yields exactly one chunk.
    pub fn split(&self, text: &str) -> Result<Vec<Chunk>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tokens = self.tokenizer.encode(text);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < tokens.len() {
            let nominal_end = (start + self.chunk_size).min(tokens.len());
            let (end, chunk_text) = self.aligned_window(&tokens, start, nominal_end)?;

            chunks.push(Chunk {
                id: chunks.len(),
                text: chunk_text,
                token_count: end - start,
                source_offset: start,
            });

            if end >= tokens.len() {
                break;
            }
            start = self.aligned_next_start(&tokens, start, end)?;
        }

        Ok(chunks)
    }

    /// Find the largest character-aligned window end at or near `nominal`,
    /// returning the end and the decoded window text
    ///
    /// `start` is known to be character-aligned, so a window decodes exactly
    /// when its end is aligned too. The full-tail window always decodes, so
    /// the shrink scan cannot run off the end of the stream.
    fn aligned_window(
        &self,
        tokens: &[usize],
        start: usize,
        nominal: usize,
    ) -> Result<(usize, String)> {
        for end in (start + 1..=nominal).rev().take(4) {
            if let Ok(text) = self.tokenizer.decode(&tokens[start..end]) {
                return Ok((end, text));
            }
        }
        // a character wider than the window itself; take it in whole
        for end in nominal + 1..=(nominal + 4).min(tokens.len()) {
            if let Ok(text) = self.tokenizer.decode(&tokens[start..end]) {
                return Ok((end, text));
            }
        }
        Err(Error::Tokenization(format!(
            "no character-aligned window boundary near token offset {}",
            nominal
        )))
    }

    /// Next window start: `end - overlap`, nudged to the nearest aligned
    /// boundary
    ///
    /// Candidates never exceed `end`, so consecutive windows stay contiguous
    /// or overlapping; shrinking the stride only increases the overlap.
    fn aligned_next_start(&self, tokens: &[usize], start: usize, end: usize) -> Result<usize> {
        let floor = start + 1;
        let nominal = end.saturating_sub(self.overlap).max(floor);

        let mut candidates = Vec::with_capacity(7);
        for delta in 0..=3 {
            if nominal >= floor + delta {
                candidates.push(nominal - delta);
            }
            if delta > 0 && nominal + delta <= end {
                candidates.push(nominal + delta);
            }
        }

        for candidate in candidates {
            if candidate == end || self.tokenizer.decode(&tokens[start..candidate]).is_ok() {
                return Ok(candidate);
            }
        }
        Err(Error::Tokenization(format!(
            "no character-aligned window boundary near token offset {}",
            nominal
        )))
    }
}
