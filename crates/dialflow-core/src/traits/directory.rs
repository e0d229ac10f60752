// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer directory trait for the paginated customer-listing backend.

use async_trait::async_trait;

use crate::error::DialflowError;
use crate::types::{CustomerPage, FilterSnapshot};

/// Adapter for the paginated customer search API.
///
/// Returns raw pages: records without a contactable phone number are still
/// present here. Dropping them is the queue fetcher's responsibility, so the
/// directory stays a faithful view of the backend result set.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Fetches one page of customers matching the snapshot.
    ///
    /// `page` is 1-based. Fails with [`DialflowError::Fetch`] on transport
    /// or backend failure.
    async fn search(
        &self,
        snapshot: &FilterSnapshot,
        page: u32,
        page_size: u32,
    ) -> Result<CustomerPage, DialflowError>;
}
