// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequential-dialing session engine.
//!
//! The engine drives one outbound call at a time through a filtered customer
//! queue:
//!
//! - [`snapshot`] captures the filter criteria once at session start
//! - [`queue`] fetches and concatenates pages of dialable customers
//! - [`dispatch`] resolves the default provider profile and places calls
//! - [`session`] is the controller FSM (Idle -> Running -> Dispatching)
//! - [`ticker`] binds the controller to a fixed-interval advance timer
//! - [`sync`] reconciles session state written by other browsing contexts
//! - [`display`] shortens customer labels for compact call UI surfaces

pub mod dispatch;
pub mod display;
pub mod queue;
pub mod session;
pub mod snapshot;
pub mod sync;
pub mod ticker;

pub use dispatch::CallDispatcher;
pub use session::{Autodialer, EngineNotice, EngineState};
pub use ticker::Ticker;
