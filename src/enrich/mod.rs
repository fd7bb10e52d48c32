// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Metadata enrichment pipeline
//!
//! Takes a recommended neighbor list and attaches human-readable titles,
//! labels and descriptions from an external entity lookup. Identifiers are
//! partitioned into fixed-size batches, one external call per batch, issued
//! concurrently; results are reassembled in the original item order.
//!
//! A failed batch gets one bounded retry and then degrades to placeholder
//! fields for its own identifiers only; enrichment never fails a request.

pub mod client;
pub mod lookup;
pub mod types;

pub use client::WikidataClient;
pub use lookup::EntityLookup;
pub use types::{EnrichError, EnrichedNeighbor, EntityRecord, EntityRecordMap, PLACEHOLDER};

use std::sync::Arc;
use tracing::{debug, warn};

use crate::recommender::Neighbor;

/// Default number of identifiers per external lookup call.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Batches neighbor lists through an [`EntityLookup`] and merges the results.
///
/// Holds no per-request state; the caller's input slice is never modified.
pub struct MetadataEnricher {
    lookup: Arc<dyn EntityLookup>,
    batch_size: usize,
    retry_attempts: u32,
}

impl MetadataEnricher {
    /// Create an enricher over the given lookup source.
    ///
    /// `retry_attempts` is the number of additional tries after a failed
    /// batch call (0 disables retries).
    pub fn new(lookup: Arc<dyn EntityLookup>, batch_size: usize, retry_attempts: u32) -> Self {
        Self {
            lookup,
            batch_size: batch_size.max(1),
            retry_attempts,
        }
    }

    /// Enrich `items` with metadata for `lang`.
    ///
    /// Output has exactly the same length and order as `items`; every field
    /// that cannot be resolved becomes [`PLACEHOLDER`]. Batches run
    /// concurrently with no ordering dependency between them.
    pub async fn enrich(&self, items: &[Neighbor], lang: &str) -> Vec<EnrichedNeighbor> {
        if items.is_empty() {
            return Vec::new();
        }

        let locale = wiki_locale(lang);
        debug!(
            "Enriching {} items via {} in batches of {}",
            items.len(),
            self.lookup.name(),
            self.batch_size
        );

        let batches: Vec<_> = items
            .chunks(self.batch_size)
            .map(|batch| self.enrich_batch(batch, &locale))
            .collect();

        // Chunks are consecutive, so flattening in batch order restores the
        // original item order.
        futures::future::join_all(batches)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Enrich one batch: a single lookup call with bounded retries, then a
    /// merge that degrades missing identifiers to placeholders.
    async fn enrich_batch(&self, batch: &[Neighbor], locale: &str) -> Vec<EnrichedNeighbor> {
        let ids: Vec<String> = batch.iter().map(|item| item.qid.clone()).collect();

        let mut records = None;
        for attempt in 0..=self.retry_attempts {
            match self.lookup.lookup(&ids, locale).await {
                Ok(map) => {
                    records = Some(map);
                    break;
                }
                Err(e) => warn!(
                    "Entity lookup failed for batch of {} (attempt {}/{}): {}",
                    ids.len(),
                    attempt + 1,
                    self.retry_attempts + 1,
                    e
                ),
            }
        }

        // All retries exhausted: this batch degrades, others are unaffected
        let records = records.unwrap_or_default();

        batch
            .iter()
            .map(|item| EnrichedNeighbor::merge(item, records.get(&item.qid)))
            .collect()
    }
}

/// Derive the wiki-language code from a user-supplied language tag.
///
/// Any trailing domain suffix is stripped ("en.wikipedia.org" -> "en") and
/// the result is lowercased. Empty input falls back to "en".
pub fn wiki_locale(lang: &str) -> String {
    let locale = lang
        .split('.')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if locale.is_empty() {
        "en".to_string()
    } else {
        locale
    }
}
