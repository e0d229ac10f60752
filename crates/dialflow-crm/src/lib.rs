// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer-listing REST adapter for Dialflow.
//!
//! Wraps the CRM backend's paginated customer search behind the
//! [`CustomerDirectory`](dialflow_core::CustomerDirectory) trait.

pub mod client;
pub mod types;

pub use client::CrmClient;
