//! Retrieval orchestrator owning the single document session

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use docqa_core::{
    ChunkMatch, EmbeddingClient, Error, QueryOutcome, Result, SessionStatus,
};

use crate::chunker::Chunker;
use crate::composer::AnswerComposer;
use crate::index::VectorIndex;
use crate::session::{DocumentInfo, IndexedDocument, Session, SessionInfo};
use crate::text;
use crate::tokenizer::TokenizerAdapter;

/// Policy constants for the retrieval pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Chunk window size in tokens
    pub chunk_size: usize,
    /// Token overlap between consecutive chunks
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per query
    pub top_k: usize,
    /// Token budget for the context section of the grounded prompt
    pub max_context_tokens: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 4,
            max_context_tokens: 3000,
        }
    }
}

/// Orchestrates ingest (chunk, embed, index) and query (embed, search,
/// compose) over exactly one active document session
///
/// The session is an explicit value replaced atomically under one lock;
/// the lock is never held across a call to the embedding service. State
/// machine: `Idle -> Processing -> Ready` on successful ingest,
/// `Processing -> Error` on ingest failure, and `Ready|Error|Idle -> Idle`
/// on reset. The session only leaves `Processing` through the in-flight
/// ingest's own commit, so reset and ingest are rejected while one is
/// running.
pub struct RagEngine<E: EmbeddingClient> {
    embedder: Arc<E>,
    chunker: Chunker,
    composer: AnswerComposer,
    config: EngineConfig,
    session: RwLock<Session>,
}

impl<E: EmbeddingClient> RagEngine<E> {
    /// Create an engine with the given embedding client and policy config
    pub fn new(embedder: Arc<E>, config: EngineConfig) -> Result<Self> {
        let tokenizer = TokenizerAdapter::new()?;
        let chunker = Chunker::new(tokenizer.clone(), config.chunk_size, config.chunk_overlap)?;
        let composer = AnswerComposer::new(tokenizer);

        Ok(Self {
            embedder,
            chunker,
            composer,
            config,
            session: RwLock::new(Session::new()),
        })
    }

    /// Ingest already-extracted raw text, replacing any previous document
    ///
    /// Atomic from the caller's perspective: on any failure the session
    /// lands in `Error` with no half-built index retained.
    pub async fn ingest(&self, raw_text: &str) -> Result<SessionStatus> {
        self.begin_processing()?;

        match self.run_ingest(raw_text).await {
            Ok(document) => {
                let chunk_count = document.index.len();
                self.commit(SessionStatus::Ready, Some(Arc::new(document)))?;
                tracing::info!(chunk_count, "ingest complete, session ready");
                Ok(SessionStatus::Ready)
            }
            Err(err) => {
                self.commit(SessionStatus::Error, None)?;
                tracing::warn!(error = %err, "ingest failed, session in error state");
                Err(err)
            }
        }
    }

    /// Answer a query against the ready session
    ///
    /// Works on an immutable snapshot of the indexed document, so a
    /// concurrent reset or re-ingest only affects later calls. A failed
    /// query never mutates session state.
    pub async fn query(&self, query_text: &str) -> Result<QueryOutcome> {
        if query_text.trim().is_empty() {
            return Err(Error::InvalidQuery("query text is empty".to_string()));
        }

        let document = self.snapshot()?;

        let texts = [query_text.to_string()];
        let mut vectors = self.embedder.embed_batch(&texts).await?;
        if vectors.len() != 1 {
            return Err(Error::EmbeddingService(format!(
                "expected 1 query vector, got {}",
                vectors.len()
            )));
        }
        let query_vector = vectors.remove(0);

        let results = document.index.search(&query_vector, self.config.top_k)?;
        tracing::debug!(matches = results.len(), "retrieved chunks for query");

        let composed =
            self.composer
                .compose(query_text, &results, self.config.max_context_tokens)?;

        let matches = results
            .iter()
            .map(|scored| ChunkMatch {
                chunk_id: scored.chunk.id,
                distance: scored.distance,
            })
            .collect();

        Ok(QueryOutcome {
            prompt: composed.prompt,
            used_chunks: composed.used_chunks,
            matches,
        })
    }

    /// Drop the active document and return to `Idle`; idempotent
    ///
    /// Rejected while an ingest is `Processing`, like a concurrent ingest:
    /// accepting it would let the ingest's commit silently overwrite the
    /// reset moments later.
    pub fn reset(&self) -> Result<SessionStatus> {
        let mut session = self.write_session()?;
        if session.status == SessionStatus::Processing {
            return Err(Error::SessionNotReady(SessionStatus::Processing));
        }
        session.status = SessionStatus::Idle;
        session.document = None;
        Ok(SessionStatus::Idle)
    }

    /// Current status plus a summary of the active document, if any
    pub fn status(&self) -> Result<SessionInfo> {
        let session = self.read_session()?;
        Ok(SessionInfo {
            status: session.status,
            document: session.document.as_deref().map(DocumentInfo::from),
        })
    }

    async fn run_ingest(&self, raw_text: &str) -> Result<IndexedDocument> {
        let cleaned = text::clean(raw_text);

        let chunks = self.chunker.split(&cleaned)?;
        if chunks.is_empty() {
            return Err(Error::EmptyDocument);
        }
        tracing::info!(chunk_count = chunks.len(), "document chunked");

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(Error::EmbeddingService(format!(
                "expected {} vectors, got {}",
                chunks.len(),
                vectors.len()
            )));
        }

        let entries = chunks.into_iter().zip(vectors).collect();
        let index = VectorIndex::build(entries, self.embedder.dimension())?;

        Ok(IndexedDocument {
            id: Uuid::new_v4(),
            index,
            ingested_at: Utc::now(),
        })
    }

    /// Transition to `Processing`, rejecting concurrent ingests
    fn begin_processing(&self) -> Result<()> {
        let mut session = self.write_session()?;
        if session.status == SessionStatus::Processing {
            return Err(Error::SessionNotReady(SessionStatus::Processing));
        }
        session.status = SessionStatus::Processing;
        session.document = None;
        Ok(())
    }

    fn commit(&self, status: SessionStatus, document: Option<Arc<IndexedDocument>>) -> Result<()> {
        let mut session = self.write_session()?;
        session.status = status;
        session.document = document;
        Ok(())
    }

    /// Clone the ready snapshot out of the lock
    fn snapshot(&self) -> Result<Arc<IndexedDocument>> {
        let session = self.read_session()?;
        match (session.status, session.document.as_ref()) {
            (SessionStatus::Ready, Some(document)) => Ok(Arc::clone(document)),
            (status, _) => Err(Error::SessionNotReady(status)),
        }
    }

    fn read_session(&self) -> Result<std::sync::RwLockReadGuard<'_, Session>> {
        self.session
            .read()
            .map_err(|e| Error::Internal(format!("session lock poisoned: {}", e)))
    }

    fn write_session(&self) -> Result<std::sync::RwLockWriteGuard<'_, Session>> {
        self.session
            .write()
            .map_err(|e| Error::Internal(format!("session lock poisoned: {}", e)))
    }
}
