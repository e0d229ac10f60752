// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the call-provider API.
//!
//! Provides [`TelephonyClient`], which lists the agent's provider profiles
//! and submits call requests. Implements [`TelephonyGateway`] for the
//! engine's call dispatcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use dialflow_config::model::TelephonyConfig;
use dialflow_core::types::{CallProviderProfile, CallReceipt};
use dialflow_core::{DialflowError, TelephonyGateway};

use crate::types::{ApiErrorResponse, PlaceCallRequest, PlaceCallResponse, WireProfile};

/// Path of the provider-profile listing endpoint.
const PROFILES_PATH: &str = "/api/v1/voice/profiles";
/// Path of the call-placement endpoint.
const CALLS_PATH: &str = "/api/v1/voice/calls";

/// HTTP client for the call-provider backend.
#[derive(Debug, Clone)]
pub struct TelephonyClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl TelephonyClient {
    /// Creates a new call-provider API client from configuration.
    pub fn new(config: &TelephonyConfig) -> Result<Self, DialflowError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                DialflowError::Config(format!("invalid telephony api_key header value: {e}"))
            })?;
            headers.insert("authorization", value);
        }
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DialflowError::CallRequest {
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

    fn error_from_body(status: reqwest::StatusCode, body: &str) -> DialflowError {
        let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(body) {
            format!(
                "call provider API error ({}): {}",
                api_err.error.type_, api_err.error.message
            )
        } else {
            format!("call provider API returned {status}: {body}")
        };
        DialflowError::CallRequest {
            message,
            source: None,
        }
    }
}

#[async_trait]
impl TelephonyGateway for TelephonyClient {
    async fn list_profiles(&self) -> Result<Vec<CallProviderProfile>, DialflowError> {
        let url = format!("{}{PROFILES_PATH}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying profile listing after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self.client.get(&url).send().await.map_err(|e| {
                DialflowError::CallRequest {
                    message: format!("profile listing request failed: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;

            let status = response.status();
            debug!(status = %status, attempt, "profile listing response");

            if status.is_success() {
                let profiles: Vec<WireProfile> =
                    response.json().await.map_err(|e| DialflowError::CallRequest {
                        message: format!("failed to parse profile listing: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(profiles.into_iter().map(Into::into).collect());
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(Self::error_from_body(status, &body));
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(Self::error_from_body(status, &body));
        }

        Err(last_error.unwrap_or_else(|| DialflowError::CallRequest {
            message: "profile listing failed after retries".into(),
            source: None,
        }))
    }

    async fn place_call(
        &self,
        profile_id: &str,
        integration_code: u16,
        phone_number: &str,
    ) -> Result<CallReceipt, DialflowError> {
        let url = format!("{}{CALLS_PATH}", self.base_url);
        let request = PlaceCallRequest {
            provider_profile_id: profile_id.to_string(),
            integration_code,
            phone_number: phone_number.to_string(),
        };

        // Call placement is never retried: a duplicate request would ring
        // the customer twice.
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DialflowError::CallRequest {
                message: format!("call placement request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, profile_id, "call placement response");

        if status.is_success() {
            let receipt: PlaceCallResponse =
                response.json().await.map_err(|e| DialflowError::CallRequest {
                    message: format!("failed to parse call receipt: {e}"),
                    source: Some(Box::new(e)),
                })?;
            return Ok(receipt.into());
        }

        let body = response.text().await.unwrap_or_default();
        Err(Self::error_from_body(status, &body))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
