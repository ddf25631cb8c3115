//! RAG (Retrieval-Augmented Generation) pipeline for DocQA
//!
//! This crate implements the retrieval core: token-aware chunking, vector
//! indexing with nearest-neighbor search, context assembly under a token
//! budget, and the session-scoped orchestrator tying them together. The
//! embedding and completion services are external collaborators reached
//! through the `docqa-core` traits.

mod chunker;
mod composer;
mod engine;
mod index;
mod session;
mod text;
mod tokenizer;


pub use chunker::Chunker;
pub use composer::AnswerComposer;
pub use engine::{EngineConfig, RagEngine};
pub use index::VectorIndex;
pub use session::{DocumentInfo, IndexedDocument, SessionInfo};
pub use tokenizer::TokenizerAdapter;

// Re-export core types for convenience
pub use docqa_core::{
    Chunk, ChunkMatch, ComposedPrompt, EmbeddingClient, Error, QueryOutcome, Result, ScoredChunk,
    SessionStatus, UsedChunk,
};
