// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `SessionStore` trait.
//!
//! Each browsing context opens its own `SqliteSessionStore` over the shared
//! database file. Writes stamp the store's per-process origin; a background
//! watcher polls the revision column and broadcasts writes made by other
//! contexts as [`StoreEvent`]s. Polling is the notification channel because
//! SQLite update hooks only fire for the writing connection.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use dialflow_config::model::StorageConfig;
use dialflow_core::types::{FilterSnapshot, PersistedSession, StoreEvent};
use dialflow_core::{DialflowError, SessionStore};

use crate::database::Database;
use crate::queries;

/// Capacity of the change-notification channel. Laggy subscribers lose the
/// oldest events, which is acceptable: only the latest state matters.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// SQLite-backed durable session store.
pub struct SqliteSessionStore {
    db: Database,
    origin: String,
    events: broadcast::Sender<StoreEvent>,
    watcher_cancel: CancellationToken,
}

impl SqliteSessionStore {
    /// Opens the store, runs migrations, and spawns the change watcher.
    pub async fn open(config: &StorageConfig) -> Result<Self, DialflowError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        let origin = uuid::Uuid::new_v4().to_string();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let watcher_cancel = CancellationToken::new();

        let store = Self {
            db: db.clone(),
            origin: origin.clone(),
            events: events.clone(),
            watcher_cancel: watcher_cancel.clone(),
        };

        let poll_interval = Duration::from_millis(config.poll_interval_ms);
        tokio::spawn(watch_revisions(
            db,
            origin,
            events,
            poll_interval,
            watcher_cancel,
        ));

        Ok(store)
    }

    /// Returns the underlying database handle (status inspection, tests).
    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Drop for SqliteSessionStore {
    fn drop(&mut self) {
        self.watcher_cancel.cancel();
    }
}

/// Poll loop: observes revision changes and broadcasts externally-originated
/// session writes.
async fn watch_revisions(
    db: Database,
    local_origin: String,
    events: broadcast::Sender<StoreEvent>,
    poll_interval: Duration,
    cancel: CancellationToken,
) {
    // Baseline so pre-existing state is not replayed as a change.
    let mut last_revision = match queries::read_state(&db).await {
        Ok(state) => state.revision,
        Err(e) => {
            warn!(error = %e, "change watcher failed initial read, starting from zero");
            0
        }
    };

    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("change watcher stopped");
                return;
            }
            _ = ticker.tick() => {}
        }

        let state = match queries::read_state(&db).await {
            Ok(state) => state,
            Err(e) => {
                // Transient read failures just delay observation of the change.
                debug!(error = %e, "change watcher read failed");
                continue;
            }
        };

        if state.revision == last_revision {
            continue;
        }
        last_revision = state.revision;

        if state.origin == local_origin {
            continue;
        }

        debug!(
            revision = state.revision,
            origin = %state.origin,
            active = state.session.active,
            "observed external session write"
        );
        // Send fails only when no subscriber exists; that is fine.
        let _ = events.send(StoreEvent {
            origin: state.origin,
            session: state.session,
        });
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn load_snapshot(&self) -> Result<Option<FilterSnapshot>, DialflowError> {
        queries::load_snapshot(&self.db).await
    }

    async fn save_snapshot(&self, snapshot: &FilterSnapshot) -> Result<(), DialflowError> {
        queries::save_snapshot(&self.db, snapshot).await
    }

    async fn load_session(&self) -> Result<Option<PersistedSession>, DialflowError> {
        queries::load_session(&self.db).await
    }

    async fn save_session(&self, session: &PersistedSession) -> Result<(), DialflowError> {
        queries::save_session(&self.db, session, &self.origin).await
    }

    fn changes(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn origin(&self) -> &str {
        &self.origin
    }
}
