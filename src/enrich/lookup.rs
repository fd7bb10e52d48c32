// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Entity lookup trait
//!
//! Seam between the enricher and the external knowledge base, so tests can
//! inject a mock source and the batching logic stays independent of the wire
//! protocol.

use async_trait::async_trait;

use super::types::{EnrichError, EntityRecordMap};

/// A source of display metadata for entity identifiers.
#[async_trait]
pub trait EntityLookup: Send + Sync {
    /// Fetch metadata for one batch of identifiers in a single external call.
    ///
    /// `locale` is the wiki-language code used to select the sitelink
    /// (`{locale}wiki`). Identifiers absent from the result map are treated
    /// as having no metadata; implementations must not fail the whole batch
    /// over one unknown identifier.
    async fn lookup(&self, ids: &[String], locale: &str) -> Result<EntityRecordMap, EnrichError>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}
