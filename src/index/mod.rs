// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Entity embedding index
//!
//! Wraps a fixed, pre-trained entity embedding snapshot behind an HNSW graph
//! for fast approximate nearest-neighbor search. The snapshot is loaded once
//! at startup and shared read-only across all requests; nothing mutates the
//! index after construction.
//!
//! ## Snapshot format
//!
//! A bincode-encoded `Vec<EntityVector>` produced offline from the trained
//! embedding model. All vectors must share one dimensionality and contain
//! only finite values.

use anyhow::{anyhow, Context, Result};
use hnsw_rs::hnsw::{Hnsw, Neighbour};
use hnsw_rs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// A single entity embedding from the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityVector {
    /// Wikidata identifier (e.g. "Q42")
    pub qid: String,

    /// Embedding vector
    pub vector: Vec<f32>,
}

/// Errors from nearest-neighbor queries.
///
/// Format validation happens at the boundary; the index only reports
/// vocabulary misses.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The identifier is not part of the loaded vocabulary
    #[error("{qid} is not in the vocabulary")]
    NotFound {
        /// The identifier that was looked up
        qid: String,
    },
}

/// Read-only nearest-neighbor index over the entity embedding space.
///
/// Owns the vocabulary (QID -> row id) and the normalized vectors. Queries
/// return cosine similarity scores in the HNSW result order; callers must not
/// expect a re-sort beyond what the graph produces.
pub struct EmbeddingIndex {
    hnsw: Hnsw<'static, f32, DistCosine>,

    /// Maps QIDs to row ids. Membership checks are O(1) against this map.
    vocab: HashMap<String, usize>,

    /// Row-ordered entities with unit-normalized vectors
    entities: Vec<EntityVector>,

    dimensions: usize,
}

impl EmbeddingIndex {
    /// Load the embedding snapshot from disk and build the search graph.
    ///
    /// Expensive; call exactly once per process. A failure here is the only
    /// unrecoverable startup condition.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read embedding snapshot {}", path.display()))?;
        let vectors: Vec<EntityVector> = bincode::deserialize(&bytes)
            .with_context(|| format!("Failed to decode embedding snapshot {}", path.display()))?;

        Self::from_vectors(vectors)
    }

    /// Build the index from in-memory vectors.
    ///
    /// # Errors
    ///
    /// Returns an error if vectors disagree on dimensionality, contain
    /// non-finite values, or repeat a QID.
    pub fn from_vectors(vectors: Vec<EntityVector>) -> Result<Self> {
        if vectors.is_empty() {
            return Ok(Self {
                hnsw: Hnsw::new(16, 1, 4, 200, DistCosine),
                vocab: HashMap::new(),
                entities: Vec::new(),
                dimensions: 0,
            });
        }

        let dimensions = vectors[0].vector.len();
        if dimensions == 0 {
            return Err(anyhow!("Entity vectors cannot be zero-dimensional"));
        }

        for entity in &vectors {
            if entity.vector.len() != dimensions {
                return Err(anyhow!(
                    "Entity {} has wrong dimensions: expected {}, got {}",
                    entity.qid,
                    dimensions,
                    entity.vector.len()
                ));
            }
            if entity.vector.iter().any(|&v| !v.is_finite()) {
                return Err(anyhow!(
                    "Entity {} contains NaN or Infinity values",
                    entity.qid
                ));
            }
        }

        // Layer count scales with log2 of the dataset, clamped to a sane range
        let max_nb_connection = 16;
        let ef_construction = 200;
        let nb_layer = if vectors.len() > 1 {
            ((vectors.len() as f32).log2().ceil() as usize).clamp(4, 16)
        } else {
            4
        };

        let mut hnsw: Hnsw<f32, DistCosine> = Hnsw::new(
            max_nb_connection,
            vectors.len(),
            nb_layer,
            ef_construction,
            DistCosine,
        );

        let mut vocab = HashMap::with_capacity(vectors.len());
        let mut entities = Vec::with_capacity(vectors.len());

        for (row_id, entity) in vectors.into_iter().enumerate() {
            if vocab.insert(entity.qid.clone(), row_id).is_some() {
                return Err(anyhow!("Duplicate entity {} in snapshot", entity.qid));
            }

            // Normalize for cosine similarity
            let normalized = normalize_vector(&entity.vector);
            hnsw.insert((&normalized, row_id));

            entities.push(EntityVector {
                qid: entity.qid,
                vector: normalized,
            });
        }

        hnsw.set_searching_mode(true);

        Ok(Self {
            hnsw,
            vocab,
            entities,
            dimensions,
        })
    }

    /// O(1) vocabulary membership check.
    pub fn contains(&self, qid: &str) -> bool {
        self.vocab.contains_key(qid)
    }

    /// Up to `k` nearest neighbors of `qid`, ranked by descending cosine
    /// similarity with the seed itself excluded.
    ///
    /// Returns `(score, qid)` pairs in the graph's own result order.
    /// Callers are expected to have checked `contains` first; this method
    /// does not re-validate identifier format.
    pub fn nearest(&self, qid: &str, k: usize) -> Result<Vec<(f32, String)>, IndexError> {
        let row_id = *self.vocab.get(qid).ok_or_else(|| IndexError::NotFound {
            qid: qid.to_string(),
        })?;

        if k == 0 {
            return Ok(Vec::new());
        }

        let query = &self.entities[row_id].vector;

        // Ask for one extra slot since the seed comes back as its own
        // closest neighbor. ef_search >= k, typically 2x.
        let ef_search = ((k + 1) * 2).max(50);
        let neighbours: Vec<Neighbour> = self.hnsw.search(query, k + 1, ef_search);

        let mut results = Vec::with_capacity(k);
        for neighbour in neighbours {
            if neighbour.d_id == row_id {
                continue;
            }
            // HNSW returns cosine distance; similarity = 1 - distance
            let score = 1.0 - neighbour.distance;
            results.push((score, self.entities[neighbour.d_id].qid.clone()));
            if results.len() == k {
                break;
            }
        }

        Ok(results)
    }

    /// Number of entities in the vocabulary.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when the snapshot held no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Embedding dimensionality.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Normalize a vector to unit length for cosine similarity.
///
/// Zero vectors are returned unchanged.
fn normalize_vector(vector: &[f32]) -> Vec<f32> {
    let magnitude: f32 = vector.iter().map(|&x| x * x).sum::<f32>().sqrt();

    if magnitude == 0.0 || !magnitude.is_finite() {
        return vector.to_vec();
    }

    vector.iter().map(|&x| x / magnitude).collect()
}
