//! In-memory flat vector index with L2 nearest-neighbor search

use docqa_core::{Chunk, Error, Result, ScoredChunk};

/// Flat index over one document's chunk vectors
///
/// Membership is immutable after `build`: the single-document session model
/// never adds entries incrementally, it rebuilds from scratch. Distances are
/// squared Euclidean (L2), matching the embedding model's training
/// objective; callers wanting cosine similarity pre-normalize their vectors.
#[derive(Debug)]
pub struct VectorIndex {
    dimension: usize,
    chunks: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Build a fresh index from all entries at once
    ///
    /// Every vector must have the configured dimensionality; a mismatch
    /// fails fast instead of producing a garbage distance later.
    pub fn build(entries: Vec<(Chunk, Vec<f32>)>, dimension: usize) -> Result<Self> {
        let mut chunks = Vec::with_capacity(entries.len());
        let mut vectors = Vec::with_capacity(entries.len());

        for (chunk, vector) in entries {
            if vector.len() != dimension {
                return Err(Error::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            chunks.push(chunk);
            vectors.push(vector);
        }

        Ok(Self {
            dimension,
            chunks,
            vectors,
        })
    }

    /// Return up to `k` entries by ascending squared L2 distance to the
    /// query vector, ties broken by ascending chunk id
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(Error::InvalidQuery("k must be positive".to_string()));
        }
        if query.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(f32, usize)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, vector)| (squared_l2(query, vector), i))
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(self.chunks[a.1].id.cmp(&self.chunks[b.1].id)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(distance, i)| ScoredChunk {
                chunk: self.chunks[i].clone(),
                distance,
            })
            .collect())
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Configured vector dimensionality
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// All indexed chunks, in id order
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
