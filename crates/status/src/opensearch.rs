//! OpenSearch/Elasticsearch-backed status store over HTTP.
//!
//! Issues one `_msearch` request per fetch; sub-response `i` belongs to
//! `container_ids[i]`, mirroring the order the body was built in.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use vigil_core::config::StatusStoreConfig;
use vigil_core::{SortOrder, StatusIndex, StatusRecord};

use crate::query::build_msearch_body;
use crate::traits::{QueryError, StatusStore};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status store client speaking the `_msearch` protocol.
pub struct OpenSearchStore {
    http: reqwest::Client,
    base_url: String,
    index: String,
    username: Option<String>,
    password: Option<String>,
}

impl OpenSearchStore {
    /// Build a client from the status store configuration.
    pub fn from_config(config: &StatusStoreConfig) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            index: config.index.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl StatusStore for OpenSearchStore {
    async fn fetch(
        &self,
        container_ids: &[String],
        from: DateTime<Utc>,
        till: DateTime<Utc>,
        limit: usize,
        order: SortOrder,
    ) -> Result<StatusIndex, QueryError> {
        if container_ids.is_empty() {
            return Ok(StatusIndex::new());
        }

        let body = build_msearch_body(&self.index, container_ids, from, till, limit, order);

        let mut request = self
            .http
            .post(format!("{}/_msearch", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body);

        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let index = decode_index(container_ids, &text)?;

        tracing::info!(
            containers = container_ids.len(),
            records = index.values().map(Vec::len).sum::<usize>(),
            "status records retrieved"
        );

        Ok(index)
    }
}

// ── Response decoding ───────────────────────────────────────────────

#[derive(Deserialize)]
struct MsearchResponse {
    responses: Vec<SubResponse>,
}

#[derive(Deserialize)]
struct SubResponse {
    #[serde(default)]
    hits: Hits,
}

#[derive(Deserialize, Default)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: StatusRecord,
}

/// Map sub-responses back onto the requested ids, positionally.
///
/// Every requested id is seeded with an empty Vec so containers without
/// hits still appear in the index. Sub-responses beyond the requested ids
/// (a misbehaving store) are ignored.
fn decode_index(container_ids: &[String], body: &str) -> Result<StatusIndex, QueryError> {
    let parsed: MsearchResponse =
        serde_json::from_str(body).map_err(|e| QueryError::Decode(e.to_string()))?;

    let mut index: StatusIndex = container_ids
        .iter()
        .map(|id| (id.clone(), Vec::new()))
        .collect();

    for (i, sub) in parsed.responses.into_iter().enumerate() {
        let Some(id) = container_ids.get(i) else {
            break;
        };
        let records = index.get_mut(id).expect("index pre-seeded with all ids");
        records.extend(sub.hits.hits.into_iter().map(|hit| hit.source));
    }

    Ok(index)
}
