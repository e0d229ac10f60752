// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock customer directory for deterministic testing.
//!
//! `MockDirectory` implements `CustomerDirectory` with scripted per-page
//! results, enabling fast tests without a CRM backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use dialflow_core::types::{CustomerPage, CustomerRecord, FilterSnapshot};
use dialflow_core::{CustomerDirectory, DialflowError};

enum ScriptedPage {
    Page(CustomerPage),
    /// Fails once with a fetch error, then serves the wrapped page.
    FailOnce(String, CustomerPage),
    Fail(String),
}

/// A mock directory that serves pre-scripted pages.
///
/// Pages are keyed by page number; an unscripted page number yields an
/// empty page with `has_more = false`.
pub struct MockDirectory {
    pages: Mutex<HashMap<u32, ScriptedPage>>,
    search_calls: AtomicU32,
    /// Snapshot seen on the most recent search, for immutability assertions.
    last_snapshot: Mutex<Option<FilterSnapshot>>,
}

impl MockDirectory {
    /// Create a new mock directory with no scripted pages.
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            search_calls: AtomicU32::new(0),
            last_snapshot: Mutex::new(None),
        }
    }

    /// Script a page of records.
    pub async fn script_page(&self, page: u32, records: Vec<CustomerRecord>, has_more: bool) {
        self.pages.lock().await.insert(
            page,
            ScriptedPage::Page(CustomerPage { records, has_more }),
        );
    }

    /// Script a page that always fails with a fetch error.
    pub async fn script_failure(&self, page: u32, message: &str) {
        self.pages
            .lock()
            .await
            .insert(page, ScriptedPage::Fail(message.to_string()));
    }

    /// Script a page that fails on the first request and succeeds afterwards.
    pub async fn script_failure_then_page(
        &self,
        page: u32,
        message: &str,
        records: Vec<CustomerRecord>,
        has_more: bool,
    ) {
        self.pages.lock().await.insert(
            page,
            ScriptedPage::FailOnce(message.to_string(), CustomerPage { records, has_more }),
        );
    }

    /// Number of search calls served so far.
    pub fn search_count(&self) -> u32 {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// The snapshot passed on the most recent search call.
    pub async fn last_snapshot(&self) -> Option<FilterSnapshot> {
        self.last_snapshot.lock().await.clone()
    }
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerDirectory for MockDirectory {
    async fn search(
        &self,
        snapshot: &FilterSnapshot,
        page: u32,
        _page_size: u32,
    ) -> Result<CustomerPage, DialflowError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_snapshot.lock().await = Some(snapshot.clone());

        let mut pages = self.pages.lock().await;
        match pages.get(&page) {
            Some(ScriptedPage::Page(p)) => Ok(p.clone()),
            Some(ScriptedPage::Fail(message)) => Err(DialflowError::Fetch {
                message: message.clone(),
                source: None,
            }),
            Some(ScriptedPage::FailOnce(message, p)) => {
                let err = DialflowError::Fetch {
                    message: message.clone(),
                    source: None,
                };
                let next = ScriptedPage::Page(p.clone());
                pages.insert(page, next);
                Err(err)
            }
            None => Ok(CustomerPage {
                records: Vec::new(),
                has_more: false,
            }),
        }
    }
}
