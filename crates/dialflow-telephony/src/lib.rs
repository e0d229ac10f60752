// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-provider REST adapter for Dialflow.
//!
//! Wraps the call backend's profile listing and call placement endpoints
//! behind the [`TelephonyGateway`](dialflow_core::TelephonyGateway) trait.

pub mod client;
pub mod types;

pub use client::TelephonyClient;
