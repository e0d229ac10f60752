// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Dialflow autodial engine.

use thiserror::Error;

/// The primary error type used across all Dialflow adapter traits and engine operations.
///
/// Queue exhaustion is deliberately *not* a variant: running out of matching
/// customers is normal session termination, handled as a state transition.
#[derive(Debug, Error)]
pub enum DialflowError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Durable store errors (database open, query failure, serialization).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A customer-page fetch failed (transport or backend failure).
    ///
    /// Transient by contract: the controller treats the tick as a no-op and
    /// the next tick retries the same page.
    #[error("fetch error: {message}")]
    Fetch {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The agent has no call-provider profile flagged as default.
    ///
    /// Fatal to the running session: the controller stops and surfaces a notice.
    #[error("no default call provider profile configured")]
    NoDefaultProvider,

    /// A call placement request was rejected by the provider API.
    ///
    /// Dispatch is best-effort per record: surfaced to the user, session continues.
    #[error("call request error: {message}")]
    CallRequest {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors (broken invariants, poisoned state).
    #[error("internal error: {0}")]
    Internal(String),
}

impl DialflowError {
    /// Convenience constructor for fetch errors wrapping a transport failure.
    pub fn fetch(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DialflowError::Fetch {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Convenience constructor for call-request errors wrapping a transport failure.
    pub fn call_request(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DialflowError::CallRequest {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
