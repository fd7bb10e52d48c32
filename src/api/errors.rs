// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! API error rendering
//!
//! Validation failures keep the established `{"Error": <message>}` body for
//! client compatibility, but carry an explicit 4xx status instead of riding
//! inside a 200. Internally errors stay tagged; only this layer turns them
//! into strings.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::recommender::validate::ValidationError;

/// Errors surfaced by the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request parameter validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unexpected failure inside the node
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "Error": self.to_string() });
        (self.status_code(), axum::response::Json(body)).into_response()
    }
}
