// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cross-context session reconciliation.
//!
//! Subscribes to the store's change feed and mirrors foreign writes into the
//! local controller. The store already filters out this context's own writes
//! by origin; the origin is re-checked here so a store implementation that
//! echoes everything still cannot cause a reconciliation loop.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use dialflow_core::SessionStore;

use crate::session::Autodialer;

/// Spawns the reconciliation loop.
///
/// Runs until cancelled or the store's change channel closes. A lagged
/// subscription resynchronizes on the next event; session writes are full
/// replacements, so skipping intermediate events loses nothing.
pub fn spawn(
    engine: Arc<Autodialer>,
    store: Arc<dyn SessionStore>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let mut changes = store.changes();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("session sync stopped");
                    return;
                }
                event = changes.recv() => match event {
                    Ok(event) => {
                        if event.origin == store.origin() {
                            continue;
                        }
                        debug!(origin = %event.origin, active = event.session.active,
                               "reconciling foreign session write");
                        engine.apply_external(event.session).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "session sync lagged, resynchronizing");
                    }
                    Err(RecvError::Closed) => {
                        debug!("store change feed closed");
                        return;
                    }
                },
            }
        }
    })
}
