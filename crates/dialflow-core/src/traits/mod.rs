// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the seams the engine consumes:
//! the customer directory, the telephony gateway, and the durable
//! session store.

pub mod directory;
pub mod store;
pub mod telephony;

pub use directory::CustomerDirectory;
pub use store::SessionStore;
pub use telephony::TelephonyGateway;
