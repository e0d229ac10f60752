// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Dialflow autodial engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Dialflow workspace. The REST adapter
//! crates and the durable store implement traits defined here; the engine
//! crate consumes them.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::DialflowError;
pub use types::{
    CallProviderProfile, CallReceipt, CustomerId, CustomerPage, CustomerRecord,
    CustomerSummary, FilterSnapshot, PersistedSession, ProviderKind, SortDirection,
    StoreEvent,
};

// Re-export the adapter traits at crate root.
pub use traits::{CustomerDirectory, SessionStore, TelephonyGateway};
