// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Endpoint tests for GET /api/v1/reader
//!
//! These tests verify that:
//! - A valid seed returns the seed first with score 1.0
//! - Lowercase seeds are uppercased before lookup
//! - Malformed and unknown seeds return 400 with the `{"Error": ...}` body
//! - Non-numeric `n` falls back to the default, oversized `n` clamps
//! - `threshold` filters non-seed neighbors only

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::util::ServiceExt;

use async_trait::async_trait;
use wikirec_node::{
    api::{create_app, AppState},
    config::NodeConfig,
    enrich::{EnrichError, EntityLookup, EntityRecordMap, MetadataEnricher},
    index::{EmbeddingIndex, EntityVector},
    recommender::{validate::QueryValidator, Recommender},
};

/// Lookup stub; the reader endpoint never calls it.
struct NullLookup;

#[async_trait]
impl EntityLookup for NullLookup {
    async fn lookup(&self, _ids: &[String], _locale: &str) -> Result<EntityRecordMap, EnrichError> {
        Ok(HashMap::new())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// Helper: AppState over a small in-memory index
fn setup_state() -> AppState {
    let index = Arc::new(
        EmbeddingIndex::from_vectors(vec![
            EntityVector {
                qid: "Q1".to_string(),
                vector: vec![1.0, 0.0, 0.0],
            },
            EntityVector {
                qid: "Q2".to_string(),
                vector: vec![0.95, 0.05, 0.0],
            },
            EntityVector {
                qid: "Q3".to_string(),
                vector: vec![0.7, 0.3, 0.0],
            },
            EntityVector {
                qid: "Q4".to_string(),
                vector: vec![0.0, 1.0, 0.0],
            },
        ])
        .unwrap(),
    );

    AppState {
        validator: Arc::new(QueryValidator::new()),
        recommender: Arc::new(Recommender::new(Arc::clone(&index))),
        enricher: Arc::new(MetadataEnricher::new(Arc::new(NullLookup), 20, 0)),
        index,
        config: Arc::new(NodeConfig::default()),
    }
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let app = create_app(setup_state());
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_reader_returns_seed_first() {
    let (status, body) = get("/api/v1/reader?qid=Q1").await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("response should be an array");
    assert!(!items.is_empty());
    assert_eq!(items[0]["qid"], "Q1");
    assert_eq!(items[0]["score"], 1.0);
}

#[tokio::test]
async fn test_reader_uppercases_seed() {
    let (status, body) = get("/api/v1/reader?qid=q1&n=5&threshold=0").await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items[0]["qid"], "Q1");
    // Seed plus up to 5 neighbors
    assert!(items.len() <= 6);
}

#[tokio::test]
async fn test_reader_scores_non_increasing_after_seed() {
    let (_, body) = get("/api/v1/reader?qid=Q1&n=10").await;

    let items = body.as_array().unwrap();
    let scores: Vec<f64> = items[1..]
        .iter()
        .map(|i| i["score"].as_f64().unwrap())
        .collect();
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[tokio::test]
async fn test_reader_missing_qid_is_format_error() {
    let (status, body) = get("/api/v1/reader").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["Error"].as_str().unwrap();
    assert!(message.contains("poorly formatted 'qid' field"));
}

#[tokio::test]
async fn test_reader_malformed_qid_message() {
    let (status, body) = get("/api/v1/reader?qid=42").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["Error"],
        "Error: poorly formatted 'qid' field. 42 does not match 'Q#...'"
    );
}

#[tokio::test]
async fn test_reader_unknown_qid_message() {
    let (status, body) = get("/api/v1/reader?qid=Q999999999").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Error"], "Error: Q999999999 is not included in the model");
}

#[tokio::test]
async fn test_reader_non_numeric_n_falls_back() {
    let (status, body) = get("/api/v1/reader?qid=Q1&n=abc").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().len() <= 11);
}

#[tokio::test]
async fn test_reader_n_limits_results() {
    let (status, body) = get("/api/v1/reader?qid=Q1&n=2").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().len() <= 3);
}

#[tokio::test]
async fn test_reader_threshold_keeps_seed_only() {
    let (status, body) = get("/api/v1/reader?qid=Q1&threshold=0.999").await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["qid"], "Q1");
}

#[tokio::test]
async fn test_reader_threshold_filters_neighbors() {
    let (_, body) = get("/api/v1/reader?qid=Q1&n=10&threshold=0.5").await;

    let items = body.as_array().unwrap();
    for item in &items[1..] {
        assert!(item["score"].as_f64().unwrap() > 0.5);
    }
}

#[tokio::test]
async fn test_health_reports_index_shape() {
    let (status, body) = get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["entities"], 4);
    assert_eq!(body["dimensions"], 3);
}
