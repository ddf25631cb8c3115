//! Session state for the single active document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use docqa_core::SessionStatus;

use crate::index::VectorIndex;

/// One fully ingested document: its chunks live inside the vector index
///
/// Immutable once built. Queries hold an `Arc` to this snapshot, so a
/// concurrent reset or re-ingest never disturbs an in-flight query.
pub struct IndexedDocument {
    pub id: Uuid,
    pub index: VectorIndex,
    pub ingested_at: DateTime<Utc>,
}

/// Mutable session record owned by the orchestrator, replaced wholesale on
/// every transition
pub(crate) struct Session {
    pub status: SessionStatus,
    pub document: Option<Arc<IndexedDocument>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
            document: None,
        }
    }
}

/// Status surface handed to the external layer (polling endpoint, UI)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub status: SessionStatus,
    pub document: Option<DocumentInfo>,
}

/// Summary of the active document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: Uuid,
    pub chunk_count: usize,
    pub ingested_at: DateTime<Utc>,
}

impl From<&IndexedDocument> for DocumentInfo {
    fn from(doc: &IndexedDocument) -> Self {
        Self {
            id: doc.id,
            chunk_count: doc.index.len(),
            ingested_at: doc.ingested_at,
        }
    }
}
