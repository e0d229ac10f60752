// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compact display labels for call UI surfaces.
//!
//! The in-call banner has room for roughly one short first name, so labels
//! are cut at a fixed character budget with an ellipsis. Truncation counts
//! characters, not bytes, so multi-byte names are never split mid-character.

use dialflow_core::types::CustomerSummary;

/// Character budget before truncation kicks in.
pub const NAME_DISPLAY_LIMIT: usize = 9;

/// Shortens a label to at most [`NAME_DISPLAY_LIMIT`] characters, appending
/// `...` when anything was cut.
pub fn short_label(label: &str) -> String {
    let mut chars = label.chars();
    let head: String = chars.by_ref().take(NAME_DISPLAY_LIMIT).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// The banner label for the currently displayed customer.
pub fn banner_label(summary: &CustomerSummary) -> String {
    short_label(&summary.label)
}

/// Compact projection of the current customer for in-call surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerCard {
    pub label: String,
    pub avatar_url: Option<String>,
}

/// Builds the banner card: truncated label plus avatar. Read-only; the
/// untruncated label stays in the persisted summary.
pub fn banner_card(summary: &CustomerSummary) -> BannerCard {
    BannerCard {
        label: short_label(&summary.label),
        avatar_url: summary.avatar_url.clone(),
    }
}
