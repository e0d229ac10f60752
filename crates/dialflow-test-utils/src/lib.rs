// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Dialflow integration tests.
//!
//! Provides mock adapters and fixture builders for fast, deterministic,
//! CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockDirectory`] - Scripted customer directory with per-page records and failures
//! - [`MockTelephony`] - Scripted call gateway that records every placement
//! - [`MemorySessionStore`] - In-memory session store with external-write injection

pub mod fixtures;
pub mod memory_store;
pub mod mock_directory;
pub mod mock_telephony;

pub use memory_store::MemorySessionStore;
pub use mock_directory::MockDirectory;
pub use mock_telephony::{MockTelephony, PlacedCall};
