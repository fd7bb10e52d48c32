// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for metadata enrichment

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::recommender::Neighbor;

/// Placeholder used when the external source has no value for a field.
pub const PLACEHOLDER: &str = "-";

/// A neighbor extended with display metadata.
///
/// Every field degrades independently to [`PLACEHOLDER`] when the lookup has
/// nothing for that identifier or locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedNeighbor {
    /// Wikidata identifier
    pub qid: String,
    /// Similarity score, carried through unmodified
    pub score: f32,
    /// Sitelink title for the requested wiki, spaces replaced by underscores
    pub title: String,
    /// English label
    pub label: String,
    /// English description
    pub description: String,
}

/// Raw per-entity metadata as returned by a lookup, before placeholder
/// defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityRecord {
    /// Sitelink title for the requested wiki, verbatim
    pub title: Option<String>,
    /// English label
    pub label: Option<String>,
    /// English description
    pub description: Option<String>,
}

/// Metadata keyed by QID for one batch of identifiers.
pub type EntityRecordMap = HashMap<String, EntityRecord>;

/// Errors from the external metadata lookup.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// API error from the lookup endpoint
    #[error("Entity lookup API error: {status} - {message}")]
    ApiError {
        /// HTTP status code (0 when the request never completed)
        status: u16,
        /// Error message
        message: String,
    },

    /// Lookup request timed out
    #[error("Entity lookup timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// The endpoint answered with something other than the expected shape
    #[error("Invalid lookup response: {message}")]
    InvalidResponse {
        /// Reason the response could not be used
        message: String,
    },
}

impl EnrichedNeighbor {
    /// Merge a lookup record onto a neighbor, applying placeholder defaults
    /// at every missing level. `qid` and `score` are carried through
    /// unmodified.
    pub fn merge(item: &Neighbor, record: Option<&EntityRecord>) -> Self {
        let title = record
            .and_then(|r| r.title.as_deref())
            .map(|t| t.replace(' ', "_"))
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let label = record
            .and_then(|r| r.label.clone())
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let description = record
            .and_then(|r| r.description.clone())
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        Self {
            qid: item.qid.clone(),
            score: item.score,
            title,
            label,
            description,
        }
    }
}
