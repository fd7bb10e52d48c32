// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP boundary
//!
//! Parses query parameters into the recommender's and enricher's input
//! shapes and serializes results to JSON. Numeric parameters are accepted as
//! raw strings so malformed values degrade to defaults instead of framework
//! rejections.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::errors::ApiError;
use crate::config::NodeConfig;
use crate::enrich::{EnrichedNeighbor, MetadataEnricher};
use crate::index::EmbeddingIndex;
use crate::recommender::validate::{clamp_count, parse_threshold, QueryValidator};
use crate::recommender::{Neighbor, Recommender};

/// Shared per-process state; everything here is load-once and read-only.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<EmbeddingIndex>,
    pub validator: Arc<QueryValidator>,
    pub recommender: Arc<Recommender>,
    pub enricher: Arc<MetadataEnricher>,
    pub config: Arc<NodeConfig>,
}

/// Raw query parameters for `GET /api/v1/reader`.
#[derive(Debug, Deserialize)]
pub struct ReaderParams {
    qid: Option<String>,
    n: Option<String>,
    threshold: Option<String>,
}

/// Raw query parameters for `GET /api/v1/list-reader`.
#[derive(Debug, Deserialize)]
pub struct ListReaderParams {
    qid: Option<String>,
    lang: Option<String>,
    k: Option<String>,
}

/// One item of the list-reader response.
///
/// Label and description are computed during enrichment but deliberately not
/// exposed here, preserving the established response shape.
#[derive(Debug, Serialize)]
pub struct ListReaderItem {
    pub qid: String,
    pub title: String,
    pub score: f32,
}

impl From<EnrichedNeighbor> for ListReaderItem {
    fn from(item: EnrichedNeighbor) -> Self {
        Self {
            qid: item.qid,
            title: item.title,
            score: item.score,
        }
    }
}

/// Build the router. Separated from [`start_server`] so tests can drive it
/// directly.
pub fn create_app(state: AppState) -> Router {
    // CORS applies to the API surface only, any origin
    let api = Router::new()
        .route("/api/v1/reader", get(reader_handler))
        .route("/api/v1/list-reader", get(list_reader_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    Router::new()
        .merge(api)
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let port = state.config.api_port;
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "entities": state.index.len(),
        "dimensions": state.index.dimensions(),
    }))
}

/// `GET /api/v1/reader?qid=<QID>&n=<int>&threshold=<float>`
///
/// Returns a JSON array of `{qid, score}`; the seed leads with score 1.0.
async fn reader_handler(
    State(state): State<AppState>,
    Query(params): Query<ReaderParams>,
) -> Result<Json<Vec<Neighbor>>, ApiError> {
    let qid = state.validator.validate_format(params.qid.as_deref())?;
    state.validator.validate_membership(&state.index, &qid)?;

    let n = clamp_count(
        params.n.as_deref(),
        state.config.default_n,
        state.config.max_n,
    );
    let threshold = parse_threshold(params.threshold.as_deref(), 0.0);

    let neighbors = state
        .recommender
        .recommend(&qid, n, threshold)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(neighbors))
}

/// `GET /api/v1/list-reader?qid=<QID>&lang=<code>&k=<int>`
///
/// Returns a JSON array of `{qid, title, score}` enriched via the external
/// lookup. Enrichment failures degrade to placeholder titles, never to an
/// error response.
async fn list_reader_handler(
    State(state): State<AppState>,
    Query(params): Query<ListReaderParams>,
) -> Result<Json<Vec<ListReaderItem>>, ApiError> {
    let qid = state.validator.validate_format(params.qid.as_deref())?;
    state.validator.validate_membership(&state.index, &qid)?;

    let k = clamp_count(
        params.k.as_deref(),
        state.config.default_k,
        state.config.max_k,
    );
    let lang = params.lang.as_deref().unwrap_or("en");

    let neighbors = state
        .recommender
        .recommend(&qid, k, 0.0)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let enriched = state.enricher.enrich(&neighbors, lang).await;

    Ok(Json(enriched.into_iter().map(ListReaderItem::from).collect()))
}
