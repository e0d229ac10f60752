// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixture builders for common domain values.

use dialflow_core::types::{CallProviderProfile, CustomerId, CustomerRecord, ProviderKind};

/// Builds a customer record with the given id and phone numbers.
///
/// The first/last name are derived from the id so display labels stay
/// distinguishable in assertions.
pub fn customer(id: &str, phones: &[&str]) -> CustomerRecord {
    CustomerRecord {
        id: CustomerId(id.to_string()),
        first_name: Some(format!("First-{id}")),
        last_name: Some(format!("Last-{id}")),
        email: Some(format!("{id}@example.com")),
        phone_numbers: phones.iter().map(|p| p.to_string()).collect(),
        avatar_url: None,
    }
}

/// Builds a customer record with no name parts, only an email.
pub fn customer_email_only(id: &str, email: &str, phones: &[&str]) -> CustomerRecord {
    CustomerRecord {
        id: CustomerId(id.to_string()),
        first_name: None,
        last_name: None,
        email: Some(email.to_string()),
        phone_numbers: phones.iter().map(|p| p.to_string()).collect(),
        avatar_url: None,
    }
}

/// Builds a provider profile.
pub fn profile(id: &str, kind: ProviderKind, is_default: bool) -> CallProviderProfile {
    CallProviderProfile {
        id: id.to_string(),
        kind,
        is_default,
        display_name: format!("{kind} ({id})"),
    }
}
