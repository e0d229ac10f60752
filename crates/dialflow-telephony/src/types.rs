// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the call-provider API.

use serde::{Deserialize, Serialize};

use dialflow_core::types::{CallProviderProfile, CallReceipt, ProviderKind};

/// A provider profile as the backend serializes it.
///
/// The backend historically emitted the default flag under two spellings;
/// `default` is accepted as an alias so older payloads still parse, but the
/// canonical flag is `is_default`.
#[derive(Debug, Clone, Deserialize)]
pub struct WireProfile {
    pub id: String,
    pub provider_type: ProviderKind,
    #[serde(default, alias = "default")]
    pub is_default: bool,
    #[serde(default)]
    pub display_name: String,
}

impl From<WireProfile> for CallProviderProfile {
    fn from(wire: WireProfile) -> Self {
        CallProviderProfile {
            id: wire.id,
            kind: wire.provider_type,
            is_default: wire.is_default,
            display_name: wire.display_name,
        }
    }
}

/// Request body for `POST /api/v1/voice/calls`.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceCallRequest {
    pub provider_profile_id: String,
    pub integration_code: u16,
    pub phone_number: String,
}

/// Response body for a successful call placement.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceCallResponse {
    pub call_id: String,
    pub provider_profile_id: String,
}

impl From<PlaceCallResponse> for CallReceipt {
    fn from(wire: PlaceCallResponse) -> Self {
        CallReceipt {
            call_id: wire.call_id,
            provider_profile_id: wire.provider_profile_id,
        }
    }
}

/// Error body shape returned by the call-provider backend.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_is_default_parses() {
        let json = serde_json::json!({
            "id": "prof_1",
            "provider_type": "twilio",
            "is_default": true,
            "display_name": "Main line"
        });
        let wire: WireProfile = serde_json::from_value(json).unwrap();
        assert!(wire.is_default);
        assert_eq!(wire.provider_type, ProviderKind::Twilio);
    }

    #[test]
    fn legacy_default_key_parses_as_alias() {
        let json = serde_json::json!({
            "id": "prof_2",
            "provider_type": "vonage",
            "default": true
        });
        let wire: WireProfile = serde_json::from_value(json).unwrap();
        assert!(wire.is_default, "legacy `default` key must map to is_default");
    }

    #[test]
    fn missing_default_flag_is_false() {
        let json = serde_json::json!({ "id": "prof_3", "provider_type": "plivo" });
        let wire: WireProfile = serde_json::from_value(json).unwrap();
        assert!(!wire.is_default);
    }
}
