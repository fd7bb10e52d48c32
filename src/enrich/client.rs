// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wikidata `wbgetentities` client
//!
//! Fetches sitelinks, labels and descriptions for a batch of QIDs in one
//! call. Identifiers are pipe-joined; the sitelink is filtered to the
//! requested wiki and labels/descriptions to English, matching what the API
//! surface exposes.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use super::lookup::EntityLookup;
use super::types::{EnrichError, EntityRecord, EntityRecordMap};

/// Client for the Wikidata entity lookup API.
pub struct WikidataClient {
    client: Client,
    api_url: String,
    timeout_ms: u64,
}

impl WikidataClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `api_url` - Endpoint, normally `https://www.wikidata.org/w/api.php`
    /// * `user_agent` - User-Agent header, required by Wikimedia API etiquette
    /// * `timeout_ms` - Per-request timeout in milliseconds
    pub fn new(api_url: impl Into<String>, user_agent: &str, timeout_ms: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(user_agent)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: api_url.into(),
            timeout_ms,
        }
    }
}

#[async_trait]
impl EntityLookup for WikidataClient {
    async fn lookup(&self, ids: &[String], locale: &str) -> Result<EntityRecordMap, EnrichError> {
        if ids.is_empty() {
            return Ok(EntityRecordMap::new());
        }

        let ids_param = ids.join("|");
        let site = format!("{locale}wiki");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "wbgetentities"),
                ("ids", ids_param.as_str()),
                ("props", "sitelinks|labels|descriptions"),
                ("languages", "en"),
                ("sitefilter", site.as_str()),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnrichError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    EnrichError::ApiError {
                        status: 0,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EnrichError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let data: WbGetEntitiesResponse =
            response
                .json()
                .await
                .map_err(|e| EnrichError::InvalidResponse {
                    message: format!("JSON parse error: {}", e),
                })?;

        // The API reports its own errors inside a 200 body
        if let Some(error) = data.error {
            return Err(EnrichError::ApiError {
                status: status.as_u16(),
                message: format!("{}: {}", error.code, error.info),
            });
        }

        Ok(collect_records(data.entities.unwrap_or_default(), &site))
    }

    fn name(&self) -> &'static str {
        "wikidata"
    }
}

/// Flatten the nested response into one record per entity.
///
/// Every level is optional: an entity can miss the sitelink for the requested
/// wiki, the English label, or the English description independently (missing
/// entities come back as a bare `{"id": ..., "missing": ""}` stub). Absent
/// levels become `None` here and placeholders at merge time.
fn collect_records(entities: HashMap<String, WbEntity>, site: &str) -> EntityRecordMap {
    entities
        .into_iter()
        .map(|(qid, entity)| {
            let record = EntityRecord {
                title: entity.sitelinks.get(site).map(|s| s.title.clone()),
                label: entity.labels.get("en").map(|t| t.value.clone()),
                description: entity.descriptions.get("en").map(|t| t.value.clone()),
            };
            (qid, record)
        })
        .collect()
}

#[derive(Debug, serde::Deserialize)]
struct WbGetEntitiesResponse {
    entities: Option<HashMap<String, WbEntity>>,
    error: Option<WbApiError>,
}

#[derive(Debug, serde::Deserialize)]
struct WbApiError {
    code: String,
    info: String,
}

#[derive(Debug, Default, serde::Deserialize)]
struct WbEntity {
    #[serde(default)]
    sitelinks: HashMap<String, WbSitelink>,
    #[serde(default)]
    labels: HashMap<String, WbTerm>,
    #[serde(default)]
    descriptions: HashMap<String, WbTerm>,
}

#[derive(Debug, serde::Deserialize)]
struct WbSitelink {
    title: String,
}

#[derive(Debug, serde::Deserialize)]
struct WbTerm {
    value: String,
}
