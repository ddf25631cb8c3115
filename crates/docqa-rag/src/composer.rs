//! Grounded prompt assembly under a token budget

use docqa_core::{Chunk, ComposedPrompt, Error, Result, ScoredChunk, UsedChunk};

use crate::tokenizer::TokenizerAdapter;

const PROMPT_INSTRUCTIONS: &str = "You are an AI assistant that answers questions about an uploaded document.\n\
Answer the question using only the document excerpts below.\n\
If the excerpts do not contain the relevant information, say so clearly.\n\
Cite the excerpt identifiers you relied on.";

/// Builds the grounded prompt from retrieved chunks
///
/// Chunks are included greedily in ascending-distance order until the token
/// budget would be exceeded. The generation call itself is an external
/// collaborator; this type only produces the prompt text.
pub struct AnswerComposer {
    tokenizer: TokenizerAdapter,
}

impl AnswerComposer {
    pub fn new(tokenizer: TokenizerAdapter) -> Self {
        Self { tokenizer }
    }

    /// Compose the prompt for a query from its retrieval results
    ///
    /// The single best match is always included: when it alone exceeds the
    /// budget its text is truncated to fit and flagged, never omitted.
    pub fn compose(
        &self,
        query: &str,
        results: &[ScoredChunk],
        max_context_tokens: usize,
    ) -> Result<ComposedPrompt> {
        if results.is_empty() {
            return Err(Error::InvalidQuery(
                "no retrieved chunks to compose a prompt from".to_string(),
            ));
        }
        if max_context_tokens == 0 {
            return Err(Error::Configuration(
                "max_context_tokens must be positive".to_string(),
            ));
        }

        let mut used_chunks = Vec::new();
        let mut budget_used = 0;

        for (i, scored) in results.iter().enumerate() {
            let chunk = &scored.chunk;

            if budget_used + chunk.token_count <= max_context_tokens {
                used_chunks.push(UsedChunk {
                    chunk: chunk.clone(),
                    truncated: false,
                });
                budget_used += chunk.token_count;
            } else if i == 0 {
                used_chunks.push(UsedChunk {
                    chunk: self.truncate_chunk(chunk, max_context_tokens)?,
                    truncated: true,
                });
                break;
            } else {
                // greedy assembly stops at the first chunk that does not fit
                break;
            }
        }

        let prompt = Self::render_prompt(query, &used_chunks);
        Ok(ComposedPrompt {
            prompt,
            used_chunks,
        })
    }

    fn truncate_chunk(&self, chunk: &Chunk, max_tokens: usize) -> Result<Chunk> {
        let tokens = self.tokenizer.encode(&chunk.text);
        let keep = max_tokens.min(tokens.len());
        let text = self.tokenizer.decode(&tokens[..keep])?;

        Ok(Chunk {
            id: chunk.id,
            text,
            token_count: keep,
            source_offset: chunk.source_offset,
        })
    }

    fn render_prompt(query: &str, used_chunks: &[UsedChunk]) -> String {
        let mut prompt = String::from(PROMPT_INSTRUCTIONS);
        prompt.push_str("\n\nContext from the document:\n\n");

        for used in used_chunks {
            prompt.push_str(&format!("[chunk {}]\n{}\n\n", used.chunk.id, used.chunk.text));
        }

        prompt.push_str(&format!("Question: {}", query));
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> AnswerComposer {
        AnswerComposer::new(TokenizerAdapter::new().unwrap())
    }

    fn scored(id: usize, text: &str, token_count: usize, distance: f32) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk {
                id,
                text: text.to_string(),
                token_count,
                source_offset: 0,
            },
            distance,
        }
    }

    #[test]
    fn test_includes_chunks_until_budget() {
        let composer = composer();
        let results = vec![
            scored(0, "first excerpt", 3, 0.1),
            scored(1, "second excerpt", 3, 0.2),
            scored(2, "third excerpt", 3, 0.3),
        ];

        let composed = composer.compose("what is this?", &results, 6).unwrap();

        assert_eq!(composed.used_chunks.len(), 2);
        assert!(composed.used_chunks.iter().all(|u| !u.truncated));
        assert!(composed.prompt.contains("[chunk 0]\nfirst excerpt"));
        assert!(composed.prompt.contains("[chunk 1]\nsecond excerpt"));
        assert!(!composed.prompt.contains("third excerpt"));
        assert!(composed.prompt.ends_with("Question: what is this?"));
    }

    #[test]
    fn test_oversized_best_match_is_truncated_not_dropped() {
        let composer = composer();
        let tokenizer = TokenizerAdapter::new().unwrap();

        let long_text = "alpha beta gamma delta epsilon zeta eta theta".repeat(4);
        let token_count = tokenizer.count(&long_text);
        let results = vec![scored(0, &long_text, token_count, 0.05)];

        let budget = 5;
        assert!(token_count > budget);
        let composed = composer.compose("summarize", &results, budget).unwrap();

        assert_eq!(composed.used_chunks.len(), 1);
        let used = &composed.used_chunks[0];
        assert!(used.truncated);
        assert_eq!(used.chunk.token_count, budget);
        assert!(long_text.starts_with(&used.chunk.text));
        assert!(composed.prompt.contains(&used.chunk.text));
    }

    #[test]
    fn test_empty_results_are_rejected() {
        let err = composer().compose("anything", &[], 100).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn test_deterministic_prompt() {
        let composer = composer();
        let results = vec![scored(0, "stable excerpt", 2, 0.1)];

        let a = composer.compose("q", &results, 100).unwrap();
        let b = composer.compose("q", &results, 100).unwrap();
        assert_eq!(a.prompt, b.prompt);
    }

    #[test]
    fn test_prompt_layout() {
        let composer = composer();
        let results = vec![scored(7, "the only excerpt", 4, 0.1)];

        let composed = composer.compose("where is it?", &results, 100).unwrap();

        assert!(composed.prompt.starts_with("You are an AI assistant"));
        assert!(composed.prompt.contains("Context from the document:\n\n[chunk 7]\nthe only excerpt\n\n"));
        assert!(composed.prompt.ends_with("Question: where is it?"));
    }
}
