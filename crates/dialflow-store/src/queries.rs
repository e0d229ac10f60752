// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries over the singleton state rows.
//!
//! Session and snapshot writes are full replacements: every UPDATE rewrites
//! all value columns and bumps `revision` with the writer's origin, so
//! cross-context races resolve as last-writer-wins.

use dialflow_core::types::{CustomerSummary, FilterSnapshot, PersistedSession};
use dialflow_core::DialflowError;
use rusqlite::params;

use crate::database::Database;

/// A raw read of the engine-state row, as consumed by the change watcher.
#[derive(Debug, Clone)]
pub struct StateRow {
    pub revision: i64,
    pub origin: String,
    pub session: PersistedSession,
}

fn row_to_state(row: &rusqlite::Row<'_>) -> Result<StateRow, rusqlite::Error> {
    let current_json: Option<String> = row.get(3)?;
    let current: Option<CustomerSummary> = match current_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?,
        None => None,
    };
    Ok(StateRow {
        revision: row.get(4)?,
        origin: row.get(5)?,
        session: PersistedSession {
            active: row.get::<_, i64>(0)? != 0,
            page_cursor: row.get::<_, i64>(1)? as u32,
            index: row.get::<_, i64>(2)? as u64,
            current,
        },
    })
}

/// Read the engine-state row, including its revision and writer origin.
pub async fn read_state(db: &Database) -> Result<StateRow, DialflowError> {
    db.connection()
        .call(|conn| {
            conn.query_row(
                "SELECT active, page_cursor, linear_index, current_customer, revision, origin
                 FROM engine_state WHERE id = 1",
                [],
                |row| row_to_state(row),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Load the persisted session, or `None` if nothing has ever been written.
pub async fn load_session(db: &Database) -> Result<Option<PersistedSession>, DialflowError> {
    let state = read_state(db).await?;
    // Revision 0 is the migration-seeded row; no context has written yet.
    if state.revision == 0 {
        Ok(None)
    } else {
        Ok(Some(state.session))
    }
}

/// Persist the session as a full replacement write stamped with `origin`.
pub async fn save_session(
    db: &Database,
    session: &PersistedSession,
    origin: &str,
) -> Result<(), DialflowError> {
    let session = session.clone();
    let origin = origin.to_string();
    let current_json = match &session.current {
        Some(summary) => Some(
            serde_json::to_string(summary)
                .map_err(|e| DialflowError::Store { source: Box::new(e) })?,
        ),
        None => None,
    };
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE engine_state SET
                     active = ?1,
                     page_cursor = ?2,
                     linear_index = ?3,
                     current_customer = ?4,
                     revision = revision + 1,
                     origin = ?5,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = 1",
                params![
                    session.active as i64,
                    session.page_cursor as i64,
                    session.index as i64,
                    current_json,
                    origin,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Load the saved filter snapshot, or `None` if none was ever saved.
pub async fn load_snapshot(db: &Database) -> Result<Option<FilterSnapshot>, DialflowError> {
    let row: Option<(String, String, String)> = db
        .connection()
        .call(|conn| {
            conn.query_row(
                "SELECT filters, custom_fields, sort FROM filter_snapshot
                 WHERE id = 1 AND updated_at IS NOT NULL",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match row {
        None => Ok(None),
        Some((filters, custom_fields, sort)) => {
            let snapshot = FilterSnapshot {
                filters: serde_json::from_str(&filters)
                    .map_err(|e| DialflowError::Store { source: Box::new(e) })?,
                custom_fields: serde_json::from_str(&custom_fields)
                    .map_err(|e| DialflowError::Store { source: Box::new(e) })?,
                sort: serde_json::from_str(&sort)
                    .map_err(|e| DialflowError::Store { source: Box::new(e) })?,
            };
            Ok(Some(snapshot))
        }
    }
}

/// Persist the filter snapshot as a full replacement write.
pub async fn save_snapshot(db: &Database, snapshot: &FilterSnapshot) -> Result<(), DialflowError> {
    let filters = serde_json::to_string(&snapshot.filters)
        .map_err(|e| DialflowError::Store { source: Box::new(e) })?;
    let custom_fields = serde_json::to_string(&snapshot.custom_fields)
        .map_err(|e| DialflowError::Store { source: Box::new(e) })?;
    let sort = serde_json::to_string(&snapshot.sort)
        .map_err(|e| DialflowError::Store { source: Box::new(e) })?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE filter_snapshot SET
                     filters = ?1,
                     custom_fields = ?2,
                     sort = ?3,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = 1",
                params![filters, custom_fields, sort],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
