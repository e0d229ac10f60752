// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the customer search API.

use serde::{Deserialize, Serialize};

use dialflow_core::types::{
    CustomFieldFilter, CustomerId, CustomerRecord, FilterSnapshot, SortDirection,
};
use std::collections::BTreeMap;

/// Request body for `POST /api/v1/customers/search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub filters: BTreeMap<String, serde_json::Value>,
    pub custom_fields: Vec<CustomFieldFilter>,
    pub sort: BTreeMap<String, SortDirection>,
    pub page: u32,
    pub page_size: u32,
}

impl SearchRequest {
    pub fn from_snapshot(snapshot: &FilterSnapshot, page: u32, page_size: u32) -> Self {
        Self {
            filters: snapshot.filters.clone(),
            custom_fields: snapshot.custom_fields.clone(),
            sort: snapshot.sort.clone(),
            page,
            page_size,
        }
    }
}

/// Response body for the customer search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub customers: Vec<WireCustomer>,
    #[serde(default)]
    pub has_more: bool,
}

/// A customer record as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct WireCustomer {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<WirePhone>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A phone entry on a wire customer. Backends differ on the field name; both
/// spellings appear in production payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct WirePhone {
    #[serde(alias = "e164")]
    pub number: String,
}

impl From<WireCustomer> for CustomerRecord {
    fn from(wire: WireCustomer) -> Self {
        CustomerRecord {
            id: CustomerId(wire.id),
            first_name: wire.first_name,
            last_name: wire.last_name,
            email: wire.email,
            phone_numbers: wire
                .phone_numbers
                .into_iter()
                .map(|p| p.number)
                .filter(|n| !n.trim().is_empty())
                .collect(),
            avatar_url: wire.avatar_url,
        }
    }
}

/// Error body shape returned by the CRM backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub type_: String,
    pub message: String,
}
