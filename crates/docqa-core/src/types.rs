//! Common types used across the DocQA system

use serde::{Deserialize, Serialize};
use std::fmt;

/// A token-bounded slice of the document, the atomic unit of retrieval.
///
/// `id` is a dense zero-based index assigned at ingest time; it matches the
/// chunk's position in the vector index. `source_offset` is the offset (in
/// tokens) of the chunk's first token within the document's token stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: usize,
    pub text: String,
    pub token_count: usize,
    pub source_offset: usize,
}

/// A chunk scored against a query, lower distance means a better match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// Squared L2 distance between the query vector and the chunk vector
    pub distance: f32,
}

impl ScoredChunk {
    /// Convert distance to a similarity score in (0, 1], higher is better
    pub fn similarity(&self) -> f32 {
        (-self.distance).exp()
    }
}

/// Chunk id and distance pair returned to the caller for citation display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMatch {
    pub chunk_id: usize,
    pub distance: f32,
}

/// A chunk selected into the grounded prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsedChunk {
    pub chunk: Chunk,
    /// True when the chunk text was cut down to fit the context budget
    pub truncated: bool,
}

/// Output of the answer composer: the grounded prompt plus the chunks it used
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposedPrompt {
    pub prompt: String,
    pub used_chunks: Vec<UsedChunk>,
}

/// Everything a query returns to the surrounding service layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Grounded prompt to hand to the completion service
    pub prompt: String,
    /// Chunks embedded in the prompt, in inclusion order
    pub used_chunks: Vec<UsedChunk>,
    /// All retrieved matches, ascending by distance
    pub matches: Vec<ChunkMatch>,
}

/// Processing state of the single active document session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Processing,
    Ready,
    Error,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Processing => "processing",
            SessionStatus::Ready => "ready",
            SessionStatus::Error => "error",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_similarity_monotonic_in_distance() {
        let near = ScoredChunk {
            chunk: Chunk {
                id: 0,
                text: "near".to_string(),
                token_count: 1,
                source_offset: 0,
            },
            distance: 0.1,
        };
        let far = ScoredChunk {
            chunk: Chunk {
                id: 1,
                text: "far".to_string(),
                token_count: 1,
                source_offset: 1,
            },
            distance: 2.5,
        };

        assert!(near.similarity() > far.similarity());
        assert!(near.similarity() <= 1.0);
        assert!(far.similarity() > 0.0);
    }

    #[test]
    fn test_chunk_snapshot() {
        let chunk = Chunk {
            id: 3,
            text: "the quick brown fox".to_string(),
            token_count: 4,
            source_offset: 2400,
        };

        assert_yaml_snapshot!(chunk, @r###"
        ---
        id: 3
        text: the quick brown fox
        token_count: 4
        source_offset: 2400
        "###);
    }

    #[test]
    fn test_session_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!(SessionStatus::Ready.to_string(), "ready");
    }
}
