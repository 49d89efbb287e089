//! [`SequenceStore`] backed by the Notion REST API.
//!
//! Two endpoints are used:
//!
//! - `POST /databases/{id}/query` sorted descending on the sequence property
//!   with `page_size = 1` to read the current maximum.
//! - `POST /pages` to append a page with a blank title and the next sequence
//!   number.
//!
//! Non-success responses are decoded as Notion error objects and surfaced as
//! [`Error::Api`]. There are no retries; one failed call fails the request.

use crate::{Error, PageDraft, Result, SequenceStore};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// API version pinned in the `Notion-Version` header.
pub const NOTION_VERSION: &str = "2022-06-28";

#[derive(Clone)]
pub struct NotionClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl core::fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    results: Vec<PageObject>,
}

#[derive(Deserialize)]
struct PageObject {
    #[serde(default)]
    properties: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

impl NotionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client rooted at `base_url` instead of the public API.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    async fn post(&self, endpoint: &str, body: &Value) -> Result<Response> {
        let response = self
            .http
            .post(format!("{}/{endpoint}", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await?;
        Err(match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => Error::Api {
                status: status.as_u16(),
                code: body.code,
                message: body.message,
            },
            Err(_) => Error::Api {
                status: status.as_u16(),
                code: status
                    .canonical_reason()
                    .unwrap_or("unknown")
                    .to_ascii_lowercase()
                    .replace(' ', "_"),
                message: text,
            },
        })
    }
}

#[async_trait]
impl SequenceStore for NotionClient {
    #[tracing::instrument(skip(self))]
    async fn highest_sequence(
        &self,
        database_id: &str,
        sequence_property: &str,
    ) -> Result<Option<i64>> {
        let body = json!({
            "sorts": [{ "property": sequence_property, "direction": "descending" }],
            "page_size": 1,
        });
        let response = self
            .post(&format!("databases/{database_id}/query"), &body)
            .await?;
        let text = response.text().await?;
        let query: QueryResponse = serde_json::from_str(&text)?;

        match query.results.first() {
            None => Ok(None),
            Some(page) => sequence_value(page, sequence_property).map(Some),
        }
    }

    #[tracing::instrument(skip(self, draft), fields(sequence = draft.sequence))]
    async fn create_page(&self, database_id: &str, draft: &PageDraft) -> Result<()> {
        let mut properties = serde_json::Map::new();
        properties.insert(
            draft.title_property.clone(),
            json!({ "title": [{ "text": { "content": "" } }] }),
        );
        properties.insert(
            draft.sequence_property.clone(),
            json!({ "number": draft.sequence }),
        );
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });

        self.post("pages", &body).await?;
        Ok(())
    }
}

fn sequence_value(page: &PageObject, sequence_property: &str) -> Result<i64> {
    let number = page
        .properties
        .get(sequence_property)
        .and_then(|prop| prop.get("number"))
        .filter(|n| !n.is_null())
        .ok_or_else(|| Error::InvalidSequence {
            reason: format!("property '{sequence_property}' has no number on the highest page"),
        })?;

    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&f) => {
            Ok(f as i64)
        }
        _ => Err(Error::InvalidSequence {
            reason: format!("property '{sequence_property}' holds non-integer value {number}"),
        }),
    }
}
