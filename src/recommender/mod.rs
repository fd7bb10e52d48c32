// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Nearest-neighbor recommendations
//!
//! Composes the query validator and the embedding index into a ranked,
//! threshold-filtered neighbor list. The seed entity always leads the list
//! with a perfect score, regardless of how the model itself would rank it.

pub mod validate;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::index::{EmbeddingIndex, IndexError};

/// A recommended entity with its similarity to the seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Wikidata identifier
    pub qid: String,
    /// Cosine similarity to the seed; the seed itself carries exactly 1.0
    pub score: f32,
}

/// Produces neighbor lists from the shared embedding index.
///
/// Holds no per-request state; the index is load-once and read-only, so one
/// recommender serves all requests concurrently.
pub struct Recommender {
    index: Arc<EmbeddingIndex>,
}

impl Recommender {
    pub fn new(index: Arc<EmbeddingIndex>) -> Self {
        Self { index }
    }

    /// Recommend up to `n` neighbors of `qid`, seed prepended.
    ///
    /// `qid` must already have passed format and membership validation; this
    /// method does not re-validate. Non-seed entries are kept only when
    /// `score > threshold` (strictly); the seed's 1.0 is never filtered.
    /// Output length is between 1 and `n + 1`, in index ranking order.
    pub fn recommend(
        &self,
        qid: &str,
        n: usize,
        threshold: f32,
    ) -> Result<Vec<Neighbor>, IndexError> {
        let neighbors = self.index.nearest(qid, n)?;

        let mut results = Vec::with_capacity(neighbors.len() + 1);
        results.push(Neighbor {
            qid: qid.to_string(),
            score: 1.0,
        });

        for (score, neighbor_qid) in neighbors {
            if score > threshold {
                results.push(Neighbor {
                    qid: neighbor_qid,
                    score,
                });
            }
        }

        Ok(results)
    }
}
