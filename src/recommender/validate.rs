// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Query parameter validation
//!
//! Untrusted input is normalized and checked here before it reaches the
//! recommender. Identifier format and vocabulary membership are distinct
//! failures with distinct messages: a malformed QID needs a spelling fix,
//! a well-formed unknown QID needs a different seed.

use regex::Regex;
use thiserror::Error;

use crate::index::EmbeddingIndex;

const QID_PATTERN: &str = "^Q[0-9]+$";

/// Validation failures surfaced verbatim to API clients.
///
/// The Display strings match the established API contract, including the
/// leading "Error: " prefix.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Input does not match the QID pattern `Q<digits>`
    #[error("Error: poorly formatted 'qid' field. {input} does not match 'Q#...'")]
    Format {
        /// The uppercased raw input
        input: String,
    },

    /// Well-formed QID absent from the embedding vocabulary
    #[error("Error: {qid} is not included in the model")]
    UnknownEntity {
        /// The identifier that failed the membership check
        qid: String,
    },
}

/// Validates and normalizes query parameters.
pub struct QueryValidator {
    qid_pattern: Regex,
}

impl QueryValidator {
    pub fn new() -> Self {
        Self {
            qid_pattern: Regex::new(QID_PATTERN).expect("Failed to compile QID pattern"),
        }
    }

    /// Uppercase the raw input and check it against `^Q[0-9]+$`.
    ///
    /// Missing or empty input is a format error.
    pub fn validate_format(&self, raw: Option<&str>) -> Result<String, ValidationError> {
        let qid = raw.unwrap_or_default().trim().to_uppercase();

        if self.qid_pattern.is_match(&qid) {
            Ok(qid)
        } else {
            Err(ValidationError::Format { input: qid })
        }
    }

    /// Check a well-formed QID against the index vocabulary.
    pub fn validate_membership(
        &self,
        index: &EmbeddingIndex,
        qid: &str,
    ) -> Result<(), ValidationError> {
        if index.contains(qid) {
            Ok(())
        } else {
            Err(ValidationError::UnknownEntity {
                qid: qid.to_string(),
            })
        }
    }
}

impl Default for QueryValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a count parameter, falling back to `default` on anything
/// unparseable and clamping to `max`. Never fails.
pub fn clamp_count(raw: Option<&str>, default: usize, max: usize) -> usize {
    match raw.map(str::trim).and_then(|v| v.parse::<usize>().ok()) {
        Some(n) => n.min(max),
        None => default,
    }
}

/// Parse a similarity threshold, falling back to `default` on anything
/// unparseable. Never fails.
pub fn parse_threshold(raw: Option<&str>, default: f32) -> f32 {
    raw.map(str::trim)
        .and_then(|v| v.parse::<f32>().ok())
        .unwrap_or(default)
}
