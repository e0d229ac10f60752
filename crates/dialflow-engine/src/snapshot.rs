// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filter snapshot capture.
//!
//! A session dials against the criteria in effect at the moment it starts.
//! The snapshot is captured once, persisted, and never re-read from live
//! filter state for the lifetime of the session.

use tracing::debug;

use dialflow_core::types::FilterSnapshot;
use dialflow_core::{DialflowError, SessionStore};

/// Resolves the snapshot a new session should dial against.
///
/// Precedence: the caller's live criteria, then the last persisted snapshot,
/// then an empty (match-everything) snapshot. Whatever is chosen is written
/// back to the store so a reload resumes against the same criteria.
pub async fn capture(
    live: Option<FilterSnapshot>,
    store: &dyn SessionStore,
) -> Result<FilterSnapshot, DialflowError> {
    if let Some(snapshot) = live {
        debug!(
            filters = snapshot.filters.len(),
            custom_fields = snapshot.custom_fields.len(),
            "capturing live filter criteria"
        );
        store.save_snapshot(&snapshot).await?;
        return Ok(snapshot);
    }

    if let Some(saved) = store.load_snapshot().await? {
        debug!("no live criteria, reusing persisted snapshot");
        return Ok(saved);
    }

    debug!("no criteria available, dialing the unfiltered list");
    let snapshot = FilterSnapshot::default();
    store.save_snapshot(&snapshot).await?;
    Ok(snapshot)
}
