// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session store for deterministic testing.
//!
//! `MemorySessionStore` implements `SessionStore` without a database and
//! exposes an [`external_write`](MemorySessionStore::external_write) helper
//! that simulates a write from another browsing context: the session is
//! replaced and a change event with a foreign origin is broadcast.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};

use dialflow_core::types::{FilterSnapshot, PersistedSession, StoreEvent};
use dialflow_core::{DialflowError, SessionStore};

struct StoreState {
    snapshot: Option<FilterSnapshot>,
    session: Option<PersistedSession>,
}

/// An in-memory [`SessionStore`] with foreign-write injection.
pub struct MemorySessionStore {
    origin: String,
    state: Mutex<StoreState>,
    events: broadcast::Sender<StoreEvent>,
    session_saves: AtomicU32,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            origin: format!("test-{}", uuid::Uuid::new_v4()),
            state: Mutex::new(StoreState {
                snapshot: None,
                session: None,
            }),
            events,
            session_saves: AtomicU32::new(0),
        }
    }

    /// Replace the session as if another context had written it, and
    /// broadcast a change event carrying that context's origin.
    pub async fn external_write(&self, session: PersistedSession) {
        self.state.lock().await.session = Some(session.clone());
        let _ = self.events.send(StoreEvent {
            origin: format!("external-{}", uuid::Uuid::new_v4()),
            session,
        });
    }

    /// Number of `save_session` calls made through the trait.
    pub fn session_save_count(&self) -> u32 {
        self.session_saves.load(Ordering::SeqCst)
    }

    /// The most recently stored session, if any.
    pub async fn stored_session(&self) -> Option<PersistedSession> {
        self.state.lock().await.session.clone()
    }

    /// The most recently stored snapshot, if any.
    pub async fn stored_snapshot(&self) -> Option<FilterSnapshot> {
        self.state.lock().await.snapshot.clone()
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load_snapshot(&self) -> Result<Option<FilterSnapshot>, DialflowError> {
        Ok(self.state.lock().await.snapshot.clone())
    }

    async fn save_snapshot(&self, snapshot: &FilterSnapshot) -> Result<(), DialflowError> {
        self.state.lock().await.snapshot = Some(snapshot.clone());
        Ok(())
    }

    async fn load_session(&self) -> Result<Option<PersistedSession>, DialflowError> {
        Ok(self.state.lock().await.session.clone())
    }

    async fn save_session(&self, session: &PersistedSession) -> Result<(), DialflowError> {
        self.state.lock().await.session = Some(session.clone());
        self.session_saves.fetch_add(1, Ordering::SeqCst);
        // Own writes are not broadcast: the store only surfaces foreign changes.
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn origin(&self) -> &str {
        &self.origin
    }
}
