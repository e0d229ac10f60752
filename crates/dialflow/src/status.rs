// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `dialflow status` command: print the persisted session state.

use dialflow_config::model::DialflowConfig;
use dialflow_core::{DialflowError, SessionStore};
use dialflow_engine::display;
use dialflow_store::SqliteSessionStore;

/// Prints the persisted session and snapshot summary.
pub async fn status(config: DialflowConfig) -> Result<(), DialflowError> {
    let store = SqliteSessionStore::open(&config.storage).await?;

    match store.load_session().await? {
        None => println!("session: never started"),
        Some(session) => {
            println!(
                "session: {}",
                if session.active { "active" } else { "inactive" }
            );
            println!("  page cursor: {}", session.page_cursor);
            println!("  index:       {}", session.index);
            match &session.current {
                Some(current) => println!(
                    "  current:     {} ({})",
                    display::banner_label(current),
                    current.id
                ),
                None => println!("  current:     none"),
            }
        }
    }

    match store.load_snapshot().await? {
        None => println!("snapshot: none"),
        Some(snapshot) => {
            println!(
                "snapshot: {} filter(s), {} custom field(s), {} sort key(s)",
                snapshot.filters.len(),
                snapshot.custom_fields.len(),
                snapshot.sort.len()
            );
        }
    }

    Ok(())
}
