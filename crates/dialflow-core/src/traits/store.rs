// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable session store trait.
//!
//! The store is device-local state that survives reloads and is visible to
//! other execution contexts on the same device. All writes are full
//! replacements (last-writer-wins); the store broadcasts changes it observes
//! from other contexts so the engine can reconcile its local flags.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::DialflowError;
use crate::types::{FilterSnapshot, PersistedSession, StoreEvent};

/// Adapter for the durable, cross-context session store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the last saved filter snapshot, if any.
    async fn load_snapshot(&self) -> Result<Option<FilterSnapshot>, DialflowError>;

    /// Saves the filter snapshot, replacing any previous one.
    async fn save_snapshot(&self, snapshot: &FilterSnapshot) -> Result<(), DialflowError>;

    /// Loads the persisted session state, if any has ever been written.
    async fn load_session(&self) -> Result<Option<PersistedSession>, DialflowError>;

    /// Persists the session state as a full replacement write, stamped with
    /// this store's origin.
    async fn save_session(&self, session: &PersistedSession) -> Result<(), DialflowError>;

    /// Subscribes to change notifications for writes originating from other
    /// execution contexts sharing this store.
    fn changes(&self) -> broadcast::Receiver<StoreEvent>;

    /// The identity this store stamps on its own writes. Events carrying a
    /// different origin were written by another context.
    fn origin(&self) -> &str;
}
