// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use std::{env, sync::Arc};

use wikirec_node::{
    api::{start_server, AppState},
    config::NodeConfig,
    enrich::{MetadataEnricher, WikidataClient},
    index::EmbeddingIndex,
    recommender::{validate::QueryValidator, Recommender},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = NodeConfig::from_env();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // The embedding snapshot is the one unrecoverable startup dependency
    tracing::info!("Loading embedding index from {}", config.embeddings_path);
    let index = match EmbeddingIndex::load(&config.embeddings_path) {
        Ok(index) => Arc::new(index),
        Err(e) => {
            tracing::error!("Failed to load embedding index: {:#}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Embedding index ready: {} entities, {} dimensions",
        index.len(),
        index.dimensions()
    );

    let lookup = Arc::new(WikidataClient::new(
        config.wikidata_api_url.clone(),
        &config.user_agent,
        config.request_timeout_ms,
    ));

    let state = AppState {
        validator: Arc::new(QueryValidator::new()),
        recommender: Arc::new(Recommender::new(Arc::clone(&index))),
        enricher: Arc::new(MetadataEnricher::new(
            lookup,
            config.batch_size,
            config.retry_attempts,
        )),
        index,
        config: Arc::new(config),
    };

    start_server(state).await
}
