// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration

use std::env;

use crate::enrich::DEFAULT_BATCH_SIZE;

/// Configuration for the recommendation node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Port for the HTTP API
    pub api_port: u16,
    /// Path to the bincode embedding snapshot
    pub embeddings_path: String,
    /// Wikidata API endpoint
    pub wikidata_api_url: String,
    /// User-Agent sent on lookup requests (Wikimedia API etiquette)
    pub user_agent: String,
    /// Per-lookup timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Identifiers per lookup call
    pub batch_size: usize,
    /// Additional tries after a failed batch call
    pub retry_attempts: u32,
    /// Default neighbor count for the reader endpoint
    pub default_n: usize,
    /// Maximum neighbor count for the reader endpoint
    pub max_n: usize,
    /// Default neighbor count for the list-reader endpoint
    pub default_k: usize,
    /// Maximum neighbor count for the list-reader endpoint
    pub max_k: usize,
}

impl NodeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            embeddings_path: env::var("EMBEDDINGS_PATH")
                .unwrap_or_else(|_| "./resources/embeddings.bin".to_string()),
            wikidata_api_url: env::var("WIKIDATA_API_URL")
                .unwrap_or_else(|_| "https://www.wikidata.org/w/api.php".to_string()),
            user_agent: env::var("WIKIDATA_USER_AGENT")
                .unwrap_or_else(|_| "wikirec-node/0.1".to_string()),
            request_timeout_ms: env::var("LOOKUP_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10000),
            batch_size: env::var("ENRICH_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BATCH_SIZE),
            retry_attempts: env::var("ENRICH_RETRY_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            default_n: 10,
            max_n: 100,
            default_k: 100,
            max_k: 100,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.embeddings_path.is_empty() {
            return Err("Embeddings path must not be empty".to_string());
        }
        if self.batch_size == 0 {
            return Err("Batch size must be greater than 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("Lookup timeout must be greater than 0".to_string());
        }
        if self.max_n == 0 || self.max_k == 0 {
            return Err("Neighbor limits must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            api_port: 8080,
            embeddings_path: "./resources/embeddings.bin".to_string(),
            wikidata_api_url: "https://www.wikidata.org/w/api.php".to_string(),
            user_agent: "wikirec-node/0.1".to_string(),
            request_timeout_ms: 10000,
            batch_size: DEFAULT_BATCH_SIZE,
            retry_attempts: 1,
            default_n: 10,
            max_n: 100,
            default_k: 100,
            max_k: 100,
        }
    }
}
