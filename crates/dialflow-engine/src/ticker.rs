// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-interval advance timer.
//!
//! The timer is deliberately separate from the session FSM: it only calls
//! [`Autodialer::tick`], which is a no-op unless a session is running. Pausing
//! the timer (the equivalent of a hidden tab) suppresses ticks without
//! touching session state, so no record is skipped while paused.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use dialflow_config::model::EngineConfig;

use crate::session::Autodialer;

/// Drives [`Autodialer::tick`] on a fixed interval until cancelled.
pub struct Ticker {
    interval: Duration,
    paused: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl Ticker {
    pub fn new(config: &EngineConfig, cancel: CancellationToken) -> Self {
        Self {
            interval: Duration::from_secs(config.tick_interval_secs),
            paused: Arc::new(AtomicBool::new(false)),
            cancel,
        }
    }

    /// Suppresses or re-enables ticks. The interval keeps running; ticks
    /// fired while paused are dropped, not queued.
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Spawns the timer loop.
    pub fn spawn(&self, engine: Arc<Autodialer>) -> JoinHandle<()> {
        let interval = self.interval;
        let paused = self.paused.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick fires immediately; the session start
            // already dialed, so swallow it.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("advance timer stopped");
                        return;
                    }
                    _ = ticker.tick() => {
                        if paused.load(Ordering::SeqCst) {
                            debug!("tick suppressed: timer paused");
                            continue;
                        }
                        engine.tick().await;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialflow_core::types::ProviderKind;
    use dialflow_test_utils::fixtures::{customer, profile};
    use dialflow_test_utils::{MemorySessionStore, MockDirectory, MockTelephony};

    fn engine_with(directory: Arc<MockDirectory>, gateway: Arc<MockTelephony>) -> Arc<Autodialer> {
        Arc::new(Autodialer::new(
            directory,
            gateway,
            Arc::new(MemorySessionStore::new()),
            &EngineConfig {
                tick_interval_secs: 1,
                ..Default::default()
            },
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_advance_a_running_session() {
        let directory = Arc::new(MockDirectory::new());
        directory
            .script_page(
                1,
                vec![
                    customer("a", &["+1"]),
                    customer("b", &["+2"]),
                    customer("c", &["+3"]),
                ],
                false,
            )
            .await;
        let gateway = Arc::new(MockTelephony::with_profiles(vec![profile(
            "p1",
            ProviderKind::Twilio,
            true,
        )]));
        let engine = engine_with(directory, gateway.clone());
        engine.start(None).await.unwrap();
        assert_eq!(gateway.placed_count().await, 1);

        let cancel = CancellationToken::new();
        let ticker = Ticker::new(
            &EngineConfig {
                tick_interval_secs: 1,
                ..Default::default()
            },
            cancel.clone(),
        );
        let handle = ticker.spawn(engine.clone());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(gateway.placed_count().await, 2);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(gateway.placed_count().await, 3);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn paused_timer_fires_no_advances() {
        let directory = Arc::new(MockDirectory::new());
        directory
            .script_page(1, vec![customer("a", &["+1"]), customer("b", &["+2"])], false)
            .await;
        let gateway = Arc::new(MockTelephony::with_profiles(vec![profile(
            "p1",
            ProviderKind::Twilio,
            true,
        )]));
        let engine = engine_with(directory, gateway.clone());
        engine.start(None).await.unwrap();

        let cancel = CancellationToken::new();
        let ticker = Ticker::new(
            &EngineConfig {
                tick_interval_secs: 1,
                ..Default::default()
            },
            cancel.clone(),
        );
        ticker.set_paused(true);
        let handle = ticker.spawn(engine.clone());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(gateway.placed_count().await, 1);

        // Unpausing resumes advances without replaying missed ticks.
        ticker.set_paused(false);
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(gateway.placed_count().await, 2);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn idle_engine_ignores_ticks() {
        let directory = Arc::new(MockDirectory::new());
        let gateway = Arc::new(MockTelephony::new());
        let engine = engine_with(directory, gateway.clone());

        let cancel = CancellationToken::new();
        let ticker = Ticker::new(
            &EngineConfig {
                tick_interval_secs: 1,
                ..Default::default()
            },
            cancel.clone(),
        );
        let handle = ticker.spawn(engine);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(gateway.placed_count().await, 0);

        cancel.cancel();
        handle.await.unwrap();
    }
}
