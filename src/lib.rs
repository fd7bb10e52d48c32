// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod enrich;
pub mod index;
pub mod recommender;

pub use api::{create_app, start_server, ApiError, AppState};
pub use config::NodeConfig;
pub use enrich::{
    EnrichError, EnrichedNeighbor, EntityLookup, EntityRecord, MetadataEnricher, WikidataClient,
};
pub use index::{EmbeddingIndex, EntityVector, IndexError};
pub use recommender::validate::{QueryValidator, ValidationError};
pub use recommender::{Neighbor, Recommender};
