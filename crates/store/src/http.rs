// HTTP client for the hosted post store's query API

use crate::{CommentRecord, PostRecord, PostStore, StoreError};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use skilllinkup_core::{Locale, StoreConfig};
use std::time::Duration;

/// Delay before the first retry; later retries wait proportionally longer
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Post store reached over `POST {base_url}/api/query`
pub struct HttpPostStore {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

/// Query API response wrapper
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum QueryResponse {
    Success {
        value: serde_json::Value,
    },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl HttpPostStore {
    /// Create new post store client
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }

    /// Run a query, retrying transient failures up to `max_retries` times
    async fn query<T: DeserializeOwned>(
        &self,
        path: &str,
        args: serde_json::Value,
    ) -> Result<T, StoreError> {
        let mut attempt = 0;
        loop {
            match self.query_once(path, &args).await {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(path, attempt, error = %e, "retrying post store query");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                result => return result,
            }
        }
    }

    async fn query_once<T: DeserializeOwned>(
        &self,
        path: &str,
        args: &serde_json::Value,
    ) -> Result<T, StoreError> {
        let url = format!("{}/api/query", self.base_url);
        let body = json!({ "path": path, "args": args, "format": "json" });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", path, e)))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(StoreError::Unavailable(format!("{}: HTTP {}", path, status)));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", path, e)))?;

        if !status.is_success() {
            return Err(StoreError::Rejected(format!(
                "{}: HTTP {}: {}",
                path, status, response_text
            )));
        }

        let parsed: QueryResponse = serde_json::from_str(&response_text)
            .map_err(|e| StoreError::Decode(format!("{}: {}", path, e)))?;

        match parsed {
            QueryResponse::Success { value } => serde_json::from_value(value)
                .map_err(|e| StoreError::Decode(format!("{}: {}", path, e))),
            QueryResponse::Error { error_message } => {
                Err(StoreError::Rejected(format!("{}: {}", path, error_message)))
            }
        }
    }
}

#[async_trait]
impl PostStore for HttpPostStore {
    async fn get_by_slug(
        &self,
        slug: &str,
        locale: Locale,
    ) -> Result<Option<PostRecord>, StoreError> {
        self.query(
            "posts:getBySlug",
            json!({ "slug": slug, "locale": locale.as_str() }),
        )
        .await
    }

    async fn list(&self, locale: Locale, limit: usize) -> Result<Vec<PostRecord>, StoreError> {
        self.query(
            "posts:list",
            json!({ "locale": locale.as_str(), "limit": limit }),
        )
        .await
    }

    async fn comments_by_post(&self, post_id: &str) -> Result<Vec<CommentRecord>, StoreError> {
        self.query("comments:getByPost", json!({ "postId": post_id }))
            .await
    }
}
