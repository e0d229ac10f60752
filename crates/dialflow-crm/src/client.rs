// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the customer search API.
//!
//! Provides [`CrmClient`], which handles request construction, bearer
//! authentication, and transient error retry. Implements
//! [`CustomerDirectory`] for the engine's queue fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use dialflow_config::model::CrmConfig;
use dialflow_core::types::{CustomerPage, FilterSnapshot};
use dialflow_core::{CustomerDirectory, DialflowError};

use crate::types::{ApiErrorResponse, SearchRequest, SearchResponse};

/// Path of the paginated customer search endpoint.
const SEARCH_PATH: &str = "/api/v1/customers/search";

/// HTTP client for the CRM backend.
///
/// Manages authentication headers, connection pooling, and a single retry
/// for transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct CrmClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl CrmClient {
    /// Creates a new CRM API client from configuration.
    pub fn new(config: &CrmConfig) -> Result<Self, DialflowError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                DialflowError::Config(format!("invalid CRM api_key header value: {e}"))
            })?;
            headers.insert("authorization", value);
        }
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DialflowError::Fetch {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    async fn search_page(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchResponse, DialflowError> {
        let url = format!("{}{SEARCH_PATH}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, page = request.page, "retrying customer search after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| DialflowError::Fetch {
                    message: format!("customer search request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, page = request.page, attempt, "customer search response");

            if status.is_success() {
                let body = response.text().await.map_err(|e| DialflowError::Fetch {
                    message: format!("failed to read search response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| DialflowError::Fetch {
                    message: format!("failed to parse search response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(DialflowError::Fetch {
                    message: format!("CRM API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!("CRM API error ({}): {}", api_err.error.type_, api_err.error.message)
            } else {
                format!("CRM API returned {status}: {body}")
            };
            return Err(DialflowError::Fetch {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| DialflowError::Fetch {
            message: "customer search failed after retries".into(),
            source: None,
        }))
    }
}

#[async_trait]
impl CustomerDirectory for CrmClient {
    async fn search(
        &self,
        snapshot: &FilterSnapshot,
        page: u32,
        page_size: u32,
    ) -> Result<CustomerPage, DialflowError> {
        let request = SearchRequest::from_snapshot(snapshot, page, page_size);
        let response = self.search_page(&request).await?;
        Ok(CustomerPage {
            records: response.customers.into_iter().map(Into::into).collect(),
            has_more: response.has_more,
        })
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
