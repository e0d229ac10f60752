// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dial queue: a concatenation of fetched customer pages.
//!
//! Pages are requested one at a time as the session consumes records.
//! Records without a phone number are dropped at append time, so every
//! record in the queue is dialable. A raw page of N records may therefore
//! contribute fewer than N entries.

use tracing::debug;

use dialflow_core::types::{CustomerRecord, FilterSnapshot};
use dialflow_core::{CustomerDirectory, DialflowError};

/// Outcome of fetching one more page into the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOutcome {
    /// Dialable records appended (after phone filtering).
    pub appended: usize,
    /// Whether the backend reports further pages.
    pub has_more: bool,
}

/// Concatenated queue of dialable customers for one session.
#[derive(Debug, Default)]
pub struct DialQueue {
    records: Vec<CustomerRecord>,
    pages_fetched: u32,
    exhausted: bool,
}

impl DialQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the next page from the directory and appends its dialable
    /// records.
    ///
    /// Fetch failures leave the queue untouched; the same page is requested
    /// again on the next call.
    pub async fn fetch_next_page(
        &mut self,
        directory: &dyn CustomerDirectory,
        snapshot: &FilterSnapshot,
        page_size: u32,
    ) -> Result<PageOutcome, DialflowError> {
        let page_number = self.pages_fetched + 1;
        let page = directory.search(snapshot, page_number, page_size).await?;

        let raw = page.records.len();
        let dialable: Vec<CustomerRecord> = page
            .records
            .into_iter()
            .filter(|r| !r.phone_numbers.is_empty())
            .collect();
        let appended = dialable.len();

        debug!(
            page = page_number,
            raw,
            dialable = appended,
            has_more = page.has_more,
            "fetched customer page"
        );

        self.records.extend(dialable);
        self.pages_fetched = page_number;
        self.exhausted = !page.has_more;

        Ok(PageOutcome {
            appended,
            has_more: page.has_more,
        })
    }

    /// Record at the given queue position, if already fetched.
    pub fn get(&self, index: usize) -> Option<&CustomerRecord> {
        self.records.get(index)
    }

    /// Total dialable records fetched so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of pages fetched so far (the persisted page cursor).
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Whether the backend has reported the final page.
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }
}
