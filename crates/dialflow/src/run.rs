// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `dialflow run` command: wire the stack, resume or start a session,
//! and dial until shutdown.

use std::sync::Arc;

use tracing::{info, warn};

use dialflow_config::model::DialflowConfig;
use dialflow_core::{DialflowError, SessionStore};
use dialflow_crm::CrmClient;
use dialflow_engine::{Autodialer, EngineNotice, Ticker};
use dialflow_store::SqliteSessionStore;
use dialflow_telephony::TelephonyClient;

use crate::shutdown;

/// Runs the engine until SIGINT/SIGTERM.
///
/// An `active` session persisted by a previous process is resumed; with
/// `start_now` a fresh session is started when there is nothing to resume.
pub async fn run(config: DialflowConfig, start_now: bool) -> Result<(), DialflowError> {
    let store: Arc<dyn SessionStore> = Arc::new(SqliteSessionStore::open(&config.storage).await?);
    let directory = Arc::new(CrmClient::new(&config.crm)?);
    let gateway = Arc::new(TelephonyClient::new(&config.telephony)?);

    let engine = Arc::new(Autodialer::new(
        directory,
        gateway,
        store.clone(),
        &config.engine,
    ));

    let cancel = shutdown::install_signal_handler();

    // Surface controller notices in the log stream.
    let mut notices = engine.notices();
    let notice_cancel = cancel.clone();
    let notice_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = notice_cancel.cancelled() => return,
                notice = notices.recv() => match notice {
                    Ok(EngineNotice::NoDefaultProvider) => {
                        warn!("no default call provider configured; session stopped");
                    }
                    Ok(EngineNotice::CallFailed { customer, message }) => {
                        warn!(customer = %customer.id, %message, "call failed, moved on");
                    }
                    Err(_) => return,
                },
            }
        }
    });

    let resumed = engine.resume().await?;
    if resumed {
        info!("resumed persisted dialing session");
    } else if start_now {
        engine.start(None).await?;
        info!("started new dialing session");
    } else {
        info!("no active session; waiting for one to appear in the store");
    }

    let ticker = Ticker::new(&config.engine, cancel.clone());
    let ticker_task = ticker.spawn(engine.clone());
    let sync_task = dialflow_engine::sync::spawn(engine.clone(), store.clone(), cancel.clone());

    cancel.cancelled().await;

    info!("shutting down, clearing session flag");
    engine.teardown().await?;

    let _ = ticker_task.await;
    let _ = sync_task.await;
    let _ = notice_task.await;
    Ok(())
}
