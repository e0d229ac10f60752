// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types used across adapter traits and the Dialflow engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a customer record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer record as seen by the dial queue.
///
/// Records admitted into the queue always have at least one phone number;
/// that invariant is enforced by the queue fetcher at append time, never by
/// the session controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_numbers: Vec<String>,
    pub avatar_url: Option<String>,
}

impl CustomerRecord {
    /// Full display label: "first last" when any name part exists, otherwise
    /// the contact email address, otherwise the raw id.
    pub fn display_label(&self) -> String {
        let name = match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        };
        let name = name.trim().to_string();
        if !name.is_empty() {
            return name;
        }
        if let Some(email) = &self.email
            && !email.trim().is_empty()
        {
            return email.clone();
        }
        self.id.0.clone()
    }
}

/// The persisted projection of the currently displayed customer.
///
/// Carries the full (untruncated) label; truncation is a display concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub label: String,
    pub avatar_url: Option<String>,
}

impl From<&CustomerRecord> for CustomerSummary {
    fn from(record: &CustomerRecord) -> Self {
        Self {
            id: record.id.clone(),
            label: record.display_label(),
            avatar_url: record.avatar_url.clone(),
        }
    }
}

/// Sort direction for a single sort key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A single custom-field filter criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomFieldQuery {
    /// Free-text query against the field value.
    Text(String),
    /// Structured (non-query) criterion, passed through to the backend verbatim.
    Structured(serde_json::Value),
}

/// A filter on one custom field, keyed by the field's backend id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldFilter {
    pub field_id: String,
    pub query: CustomFieldQuery,
}

/// Immutable copy of the filter/sort criteria taken at session start.
///
/// Captured once per `start()`; live filter changes while a session is
/// running do not affect it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    /// Standard search filters keyed by filter name.
    #[serde(default)]
    pub filters: BTreeMap<String, serde_json::Value>,
    /// Ordered custom-field filters.
    #[serde(default)]
    pub custom_fields: Vec<CustomFieldFilter>,
    /// Sort order keyed by column name.
    #[serde(default)]
    pub sort: BTreeMap<String, SortDirection>,
}

/// One raw page of customer records from the directory, before phone filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerPage {
    pub records: Vec<CustomerRecord>,
    /// Whether the backend reports further pages past this one.
    pub has_more: bool,
}

/// Durable session state, persisted on every mutation.
///
/// Writers must persist full replacement values; partial writes would lose
/// updates between browsing contexts sharing the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    /// Whether a dialing session is active on this device.
    pub active: bool,
    /// Highest page number fetched for the current session, 1-based.
    pub page_cursor: u32,
    /// Position of the currently displayed record within the concatenated
    /// queue (0-based). Monotonically non-decreasing while a session is
    /// active; when `current` is unset it is the position to dial next.
    pub index: u64,
    /// The currently displayed customer, if any.
    pub current: Option<CustomerSummary>,
}

impl Default for PersistedSession {
    fn default() -> Self {
        Self {
            active: false,
            page_cursor: 1,
            index: 0,
            current: None,
        }
    }
}

/// Known outbound-call provider integrations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Twilio,
    Plivo,
    Vonage,
    Telnyx,
    RingCentral,
}

impl ProviderKind {
    /// Fixed lookup table mapping a provider integration to the numeric code
    /// the call-placement API expects.
    pub fn integration_code(self) -> u16 {
        match self {
            ProviderKind::Twilio => 1,
            ProviderKind::Plivo => 2,
            ProviderKind::Vonage => 3,
            ProviderKind::Telnyx => 4,
            ProviderKind::RingCentral => 5,
        }
    }
}

/// An agent's outbound-call provider profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallProviderProfile {
    pub id: String,
    pub kind: ProviderKind,
    /// Exactly one profile, if any, is treated as default for dispatch.
    pub is_default: bool,
    pub display_name: String,
}

/// Receipt returned by a successful call placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallReceipt {
    pub call_id: String,
    pub provider_profile_id: String,
}

/// A change notification emitted by the durable store.
///
/// `origin` identifies the writing context; subscribers compare it against
/// their own store origin to distinguish external writes from their own.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreEvent {
    pub origin: String,
    pub session: PersistedSession,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(first: Option<&str>, last: Option<&str>, email: Option<&str>) -> CustomerRecord {
        CustomerRecord {
            id: CustomerId("cus_1".into()),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            email: email.map(String::from),
            phone_numbers: vec!["+15550100".into()],
            avatar_url: None,
        }
    }

    #[test]
    fn display_label_joins_name_parts() {
        assert_eq!(
            record(Some("Ada"), Some("Lovelace"), None).display_label(),
            "Ada Lovelace"
        );
        assert_eq!(record(Some("Ada"), None, None).display_label(), "Ada");
        assert_eq!(record(None, Some("Lovelace"), None).display_label(), "Lovelace");
    }

    #[test]
    fn display_label_falls_back_to_email_then_id() {
        assert_eq!(
            record(None, None, Some("ada@example.com")).display_label(),
            "ada@example.com"
        );
        assert_eq!(record(None, None, None).display_label(), "cus_1");
    }

    #[test]
    fn persisted_session_default_is_inactive_at_origin() {
        let session = PersistedSession::default();
        assert!(!session.active);
        assert_eq!(session.page_cursor, 1);
        assert_eq!(session.index, 0);
        assert!(session.current.is_none());
    }

    #[test]
    fn integration_codes_are_distinct() {
        use std::collections::HashSet;
        let kinds = [
            ProviderKind::Twilio,
            ProviderKind::Plivo,
            ProviderKind::Vonage,
            ProviderKind::Telnyx,
            ProviderKind::RingCentral,
        ];
        let codes: HashSet<u16> = kinds.iter().map(|k| k.integration_code()).collect();
        assert_eq!(codes.len(), kinds.len(), "integration codes must be unique");
    }

    #[test]
    fn provider_kind_serde_round_trip() {
        let json = serde_json::to_string(&ProviderKind::RingCentral).unwrap();
        assert_eq!(json, "\"ring_central\"");
        let parsed: ProviderKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ProviderKind::RingCentral);
    }

    proptest::proptest! {
        #[test]
        fn display_label_is_never_empty(
            first in proptest::option::of("[A-Za-z ]{0,8}"),
            last in proptest::option::of("[A-Za-z ]{0,8}"),
            email in proptest::option::of("[a-z]{1,8}@example\\.com"),
        ) {
            let record = CustomerRecord {
                id: CustomerId("cus_p".into()),
                first_name: first,
                last_name: last,
                email,
                phone_numbers: vec![],
                avatar_url: None,
            };
            // The id is the fallback of last resort, so a label always exists.
            proptest::prop_assert!(!record.display_label().trim().is_empty());
        }
    }

    #[test]
    fn filter_snapshot_serde_round_trip() {
        let mut snapshot = FilterSnapshot::default();
        snapshot
            .filters
            .insert("status".into(), serde_json::json!("lead"));
        snapshot.custom_fields.push(CustomFieldFilter {
            field_id: "cf_42".into(),
            query: CustomFieldQuery::Text("vip".into()),
        });
        snapshot.sort.insert("created_at".into(), SortDirection::Desc);

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: FilterSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
