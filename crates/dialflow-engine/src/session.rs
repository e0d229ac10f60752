// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dialing session controller FSM.
//!
//! States: Idle -> Running -> Dispatching -> Running, ending back at Idle.
//! One [`Autodialer`] exists per process; every mutation of session state is
//! persisted to the store as a full replacement write so other browsing
//! contexts on the same device observe it.
//!
//! Error handling follows a strict taxonomy:
//! - fetch failures are transient: the advance becomes a no-op and the next
//!   tick retries the same page
//! - a missing default provider profile is fatal: notice, then stop
//! - a rejected call request is per-record: notice, session continues
//! - queue exhaustion is not an error at all: the session ends silently

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use dialflow_config::model::EngineConfig;
use dialflow_core::types::{CustomerSummary, FilterSnapshot, PersistedSession};
use dialflow_core::{CustomerDirectory, DialflowError, SessionStore, TelephonyGateway};

use crate::dispatch::CallDispatcher;
use crate::queue::DialQueue;
use crate::snapshot;

/// States of the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No session active on this device.
    Idle,
    /// Session active, waiting for the next advance.
    Running,
    /// An advance is placing a call right now.
    Dispatching,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineState::Idle => write!(f, "idle"),
            EngineState::Running => write!(f, "running"),
            EngineState::Dispatching => write!(f, "dispatching"),
        }
    }
}

/// User-facing notices emitted by the controller.
///
/// Notices are advisory: by the time one is observed the controller has
/// already taken the corresponding action (stopping, or skipping a record).
#[derive(Debug, Clone)]
pub enum EngineNotice {
    /// No provider profile carries the default flag; the session was stopped.
    NoDefaultProvider,
    /// A call placement was rejected; the session moved past the record.
    CallFailed {
        customer: CustomerSummary,
        message: String,
    },
}

struct SessionInner {
    queue: DialQueue,
    session: PersistedSession,
    snapshot: FilterSnapshot,
    /// Whether this process drives the session. A context that only mirrors
    /// another context's `active` flag never fetches or dials.
    driving: bool,
}

/// The sequential-dialing session controller.
///
/// All mutating operations serialize on an internal lock; the periodic tick
/// uses `try_lock` so a timer firing mid-dispatch is skipped rather than
/// queued behind the in-flight call.
pub struct Autodialer {
    inner: Mutex<SessionInner>,
    store: Arc<dyn SessionStore>,
    directory: Arc<dyn CustomerDirectory>,
    dispatcher: CallDispatcher,
    /// Lock-free mirror of `session.active` for display and tick gating.
    active: AtomicBool,
    /// True only while a call placement is in flight.
    dispatching: AtomicBool,
    notices: broadcast::Sender<EngineNotice>,
    page_size: u32,
}

impl Autodialer {
    pub fn new(
        directory: Arc<dyn CustomerDirectory>,
        gateway: Arc<dyn TelephonyGateway>,
        store: Arc<dyn SessionStore>,
        config: &EngineConfig,
    ) -> Self {
        let (notices, _) = broadcast::channel(16);
        Self {
            inner: Mutex::new(SessionInner {
                queue: DialQueue::new(),
                session: PersistedSession::default(),
                snapshot: FilterSnapshot::default(),
                driving: false,
            }),
            store,
            directory,
            dispatcher: CallDispatcher::new(gateway),
            active: AtomicBool::new(false),
            dispatching: AtomicBool::new(false),
            notices,
            page_size: config.page_size,
        }
    }

    /// Starts a new dialing session against the given live criteria.
    ///
    /// Captures the filter snapshot, fetches the first page, and dials the
    /// first record. A no-op when a session is already active. A fetch
    /// failure here aborts the start and leaves the controller idle, unlike
    /// mid-session fetch failures which are retried. A first page with no
    /// dialable records also stays idle: nothing is dialed and no session
    /// becomes active.
    pub async fn start(&self, live: Option<FilterSnapshot>) -> Result<(), DialflowError> {
        let mut inner = self.inner.lock().await;
        if inner.session.active {
            debug!("start ignored: session already active");
            return Ok(());
        }

        // Reborrow past the guard so the queue and snapshot fields can be
        // borrowed independently below.
        let inner = &mut *inner;
        inner.snapshot = snapshot::capture(live, self.store.as_ref()).await?;
        inner.queue = DialQueue::new();
        inner.session = PersistedSession::default();
        inner.driving = true;

        if let Err(error) = inner
            .queue
            .fetch_next_page(self.directory.as_ref(), &inner.snapshot, self.page_size)
            .await
        {
            warn!(%error, "initial page fetch failed, session not started");
            inner.driving = false;
            self.store.save_session(&inner.session).await?;
            return Err(error);
        }

        if inner.queue.is_empty() {
            info!("first page has no dialable records, staying idle");
            inner.driving = false;
            inner.session.page_cursor = inner.queue.pages_fetched();
            self.store.save_session(&inner.session).await?;
            return Ok(());
        }

        inner.session.active = true;
        inner.session.page_cursor = inner.queue.pages_fetched();
        self.active.store(true, Ordering::SeqCst);
        self.store.save_session(&inner.session).await?;
        info!(
            queued = inner.queue.len(),
            has_more = !inner.queue.exhausted(),
            "dialing session started"
        );

        self.advance_locked(inner).await
    }

    /// Advances to the next queued record and dials it.
    ///
    /// A no-op when no session is active or this context is only mirroring
    /// one. Called by the tick timer and by explicit user skips.
    pub async fn advance(&self) -> Result<(), DialflowError> {
        let mut inner = self.inner.lock().await;
        if !inner.session.active || !inner.driving {
            debug!("advance ignored: no session driven by this context");
            return Ok(());
        }
        self.advance_locked(&mut inner).await
    }

    /// Periodic timer entry point.
    ///
    /// Skips silently when the controller is idle or an advance is already
    /// in flight; never propagates errors to the timer loop.
    pub async fn tick(&self) {
        if !self.active.load(Ordering::SeqCst) {
            return;
        }
        let Ok(mut inner) = self.inner.try_lock() else {
            debug!("tick skipped: advance in progress");
            return;
        };
        if !inner.session.active || !inner.driving {
            return;
        }
        if let Err(error) = self.advance_locked(&mut inner).await {
            warn!(%error, "tick advance failed");
        }
    }

    /// Stops the session and persists `active = false`.
    ///
    /// Idempotent: stopping an idle controller writes nothing.
    pub async fn stop(&self) -> Result<(), DialflowError> {
        let mut inner = self.inner.lock().await;
        self.stop_locked(&mut inner).await
    }

    /// Engine teardown: same contract as [`stop`](Self::stop), invoked on
    /// shutdown so no stale `active` flag survives this context.
    pub async fn teardown(&self) -> Result<(), DialflowError> {
        let mut inner = self.inner.lock().await;
        self.stop_locked(&mut inner).await
    }

    /// Resumes a persisted active session after a process restart.
    ///
    /// Rebuilds the queue by re-fetching pages up to the persisted cursor
    /// and continues at the persisted index. Never dials during resume; the
    /// next tick does. Returns `false` when there is nothing to resume.
    /// A missing snapshot or a rebuild failure abandons the session: the
    /// store is left with `active = false` rather than a position nobody
    /// can dial from.
    pub async fn resume(&self) -> Result<bool, DialflowError> {
        let mut inner = self.inner.lock().await;
        let Some(saved) = self.store.load_session().await? else {
            return Ok(false);
        };
        if !saved.active {
            return Ok(false);
        }

        let Some(snapshot) = self.store.load_snapshot().await? else {
            warn!("active session has no filter snapshot, abandoning resume");
            return self.abandon_resume(&mut inner, saved).await;
        };

        let mut queue = DialQueue::new();
        for _ in 0..saved.page_cursor {
            if queue.exhausted() {
                break;
            }
            if let Err(error) = queue
                .fetch_next_page(self.directory.as_ref(), &snapshot, self.page_size)
                .await
            {
                warn!(%error, "queue rebuild failed, abandoning resume");
                return self.abandon_resume(&mut inner, saved).await;
            }
        }

        info!(
            pages = queue.pages_fetched(),
            index = saved.index,
            "resumed active dialing session"
        );
        inner.snapshot = snapshot;
        inner.queue = queue;
        inner.session = saved;
        inner.driving = true;
        self.active.store(true, Ordering::SeqCst);
        Ok(true)
    }

    /// Reconciles a session write observed from another context.
    ///
    /// Mirrors the foreign state without persisting, fetching, or dialing,
    /// so a change never echoes back to the store or doubles a side effect.
    pub async fn apply_external(&self, session: PersistedSession) {
        let mut inner = self.inner.lock().await;
        match (inner.session.active, session.active) {
            (true, false) => {
                info!("session stopped by another context");
                inner.driving = false;
                inner.session = session;
                self.active.store(false, Ordering::SeqCst);
            }
            (false, true) => {
                info!("session started by another context, mirroring");
                inner.driving = false;
                inner.session = session;
                self.active.store(true, Ordering::SeqCst);
            }
            _ => {
                // Same activity on both sides. Adopt the foreign copy for
                // display only when this context is not driving, so the
                // local cursor is never clobbered mid-session.
                if !inner.driving {
                    inner.session = session;
                }
            }
        }
    }

    /// Current controller state.
    pub fn state(&self) -> EngineState {
        if self.dispatching.load(Ordering::SeqCst) {
            EngineState::Dispatching
        } else if self.active.load(Ordering::SeqCst) {
            EngineState::Running
        } else {
            EngineState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// The currently displayed customer, if any.
    pub async fn current(&self) -> Option<CustomerSummary> {
        self.inner.lock().await.session.current.clone()
    }

    /// A copy of the in-memory session state.
    pub async fn session(&self) -> PersistedSession {
        self.inner.lock().await.session.clone()
    }

    /// Subscribes to controller notices.
    pub fn notices(&self) -> broadcast::Receiver<EngineNotice> {
        self.notices.subscribe()
    }

    async fn abandon_resume(
        &self,
        inner: &mut SessionInner,
        mut saved: PersistedSession,
    ) -> Result<bool, DialflowError> {
        saved.active = false;
        inner.session = saved;
        inner.driving = false;
        self.active.store(false, Ordering::SeqCst);
        self.store.save_session(&inner.session).await?;
        Ok(false)
    }

    async fn stop_locked(&self, inner: &mut SessionInner) -> Result<(), DialflowError> {
        inner.driving = false;
        if !inner.session.active {
            self.active.store(false, Ordering::SeqCst);
            return Ok(());
        }
        inner.session.active = false;
        self.active.store(false, Ordering::SeqCst);
        self.store.save_session(&inner.session).await?;
        info!(index = inner.session.index, "dialing session stopped");
        Ok(())
    }

    /// Core advance step. At most one page fetch and at most one call
    /// placement per invocation.
    async fn advance_locked(&self, inner: &mut SessionInner) -> Result<(), DialflowError> {
        // `index` is the position of the currently displayed record, so the
        // next one sits one past it once anything has been dialed.
        let next = inner.session.index as usize + usize::from(inner.session.current.is_some());

        if next >= inner.queue.len() {
            if !inner.queue.exhausted() {
                match inner
                    .queue
                    .fetch_next_page(self.directory.as_ref(), &inner.snapshot, self.page_size)
                    .await
                {
                    Ok(_) => {
                        inner.session.page_cursor = inner.queue.pages_fetched();
                        self.store.save_session(&inner.session).await?;
                    }
                    Err(DialflowError::Fetch { message, .. }) => {
                        debug!(%message, "page fetch failed, retrying on the next tick");
                        return Ok(());
                    }
                    Err(error) => return Err(error),
                }
            }
            if next >= inner.queue.len() {
                if inner.queue.exhausted() {
                    debug!("queue exhausted, ending session");
                    return self.stop_locked(inner).await;
                }
                // The page contributed no dialable records but more exist;
                // the next tick fetches the following page.
                return Ok(());
            }
        }

        let Some(record) = inner.queue.get(next).cloned() else {
            return Err(DialflowError::Internal(format!(
                "queue index {next} out of bounds at dispatch"
            )));
        };

        inner.session.current = Some(CustomerSummary::from(&record));
        inner.session.index = next as u64;
        self.store.save_session(&inner.session).await?;

        self.dispatching.store(true, Ordering::SeqCst);
        let result = self.dispatcher.dial(&record).await;
        self.dispatching.store(false, Ordering::SeqCst);

        match result {
            Ok(_) => Ok(()),
            Err(DialflowError::NoDefaultProvider) => {
                warn!("no default provider profile, stopping session");
                let _ = self.notices.send(EngineNotice::NoDefaultProvider);
                self.stop_locked(inner).await
            }
            Err(DialflowError::CallRequest { message, .. }) => {
                warn!(customer = %record.id, %message, "call placement failed, continuing");
                let _ = self.notices.send(EngineNotice::CallFailed {
                    customer: CustomerSummary::from(&record),
                    message,
                });
                Ok(())
            }
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialflow_core::types::ProviderKind;
    use dialflow_test_utils::fixtures::{customer, profile};
    use dialflow_test_utils::{MemorySessionStore, MockDirectory, MockTelephony};

    struct Fixture {
        directory: Arc<MockDirectory>,
        gateway: Arc<MockTelephony>,
        store: Arc<MemorySessionStore>,
        engine: Autodialer,
    }

    fn fixture() -> Fixture {
        let directory = Arc::new(MockDirectory::new());
        let gateway = Arc::new(MockTelephony::with_profiles(vec![profile(
            "p1",
            ProviderKind::Twilio,
            true,
        )]));
        let store = Arc::new(MemorySessionStore::new());
        let engine = Autodialer::new(
            directory.clone(),
            gateway.clone(),
            store.clone(),
            &EngineConfig::default(),
        );
        Fixture {
            directory,
            gateway,
            store,
            engine,
        }
    }

    #[tokio::test]
    async fn start_dials_first_record_and_persists() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &["+1"]), customer("b", &["+2"])], false)
            .await;

        f.engine.start(None).await.unwrap();

        assert_eq!(f.engine.state(), EngineState::Running);
        let calls = f.gateway.placed_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].phone_number, "+1");

        // The persisted index is the position of the record on display.
        let saved = f.store.stored_session().await.unwrap();
        assert!(saved.active);
        assert_eq!(saved.index, 0);
        assert_eq!(saved.page_cursor, 1);
        assert_eq!(saved.current.as_ref().unwrap().id.0, "a");
    }

    #[tokio::test]
    async fn start_is_idempotent_while_active() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &["+1"])], true)
            .await;

        f.engine.start(None).await.unwrap();
        f.engine.start(None).await.unwrap();

        assert_eq!(f.gateway.placed_count().await, 1);
    }

    #[tokio::test]
    async fn each_advance_places_at_most_one_call() {
        let f = fixture();
        f.directory
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

        f.engine.start(None).await.unwrap();
        f.engine.advance().await.unwrap();
        f.engine.advance().await.unwrap();

        let calls = f.gateway.placed_calls().await;
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls.iter().map(|c| c.phone_number.as_str()).collect::<Vec<_>>(),
            vec!["+1", "+2", "+3"]
        );
    }

    #[tokio::test]
    async fn index_is_monotonic_across_advances() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &["+1"]), customer("b", &["+2"])], false)
            .await;

        f.engine.start(None).await.unwrap();
        let first = f.engine.session().await.index;
        f.engine.advance().await.unwrap();
        let second = f.engine.session().await.index;
        f.engine.advance().await.unwrap(); // exhausts silently
        let third = f.engine.session().await.index;

        assert!(first <= second && second <= third);
        assert_eq!((first, second), (0, 1));
    }

    #[tokio::test]
    async fn exhaustion_ends_session_silently() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &["+1"])], false)
            .await;

        f.engine.start(None).await.unwrap();
        assert_eq!(f.engine.state(), EngineState::Running);

        f.engine.advance().await.unwrap();

        assert_eq!(f.engine.state(), EngineState::Idle);
        assert!(!f.store.stored_session().await.unwrap().active);
        // No notice for normal termination.
        let mut notices = f.engine.notices();
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn advance_fetches_next_page_when_current_is_consumed() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &["+1"])], true)
            .await;
        f.directory
            .script_page(2, vec![customer("b", &["+2"])], false)
            .await;

        f.engine.start(None).await.unwrap();
        f.engine.advance().await.unwrap();

        let calls = f.gateway.placed_calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].phone_number, "+2");
        assert_eq!(f.engine.session().await.page_cursor, 2);
    }

    #[tokio::test]
    async fn fetch_failure_mid_session_is_a_silent_retry() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &["+1"])], true)
            .await;
        f.directory
            .script_failure_then_page(2, "transient", vec![customer("b", &["+2"])], false)
            .await;

        f.engine.start(None).await.unwrap();

        // This advance hits the scripted failure: no call, still running.
        f.engine.advance().await.unwrap();
        assert_eq!(f.gateway.placed_count().await, 1);
        assert_eq!(f.engine.state(), EngineState::Running);

        // Next advance retries the same page and dials.
        f.engine.advance().await.unwrap();
        assert_eq!(f.gateway.placed_count().await, 2);
    }

    #[tokio::test]
    async fn start_fetch_failure_aborts_and_stays_idle() {
        let f = fixture();
        f.directory.script_failure(1, "backend down").await;

        let err = f.engine.start(None).await.unwrap_err();
        assert!(matches!(err, DialflowError::Fetch { .. }));
        assert_eq!(f.engine.state(), EngineState::Idle);
        assert!(!f.store.stored_session().await.unwrap().active);
        assert_eq!(f.gateway.placed_count().await, 0);
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &["+1"])], true)
            .await;

        f.engine.start(None).await.unwrap();
        f.engine.stop().await.unwrap();
        let saves_after_first = f.store.session_save_count();

        f.engine.stop().await.unwrap();
        f.engine.stop().await.unwrap();

        assert_eq!(f.store.session_save_count(), saves_after_first);
        assert_eq!(f.engine.state(), EngineState::Idle);
    }

    #[tokio::test]
    async fn no_default_provider_stops_with_notice() {
        let directory = Arc::new(MockDirectory::new());
        let gateway = Arc::new(MockTelephony::with_profiles(vec![profile(
            "p1",
            ProviderKind::Twilio,
            false,
        )]));
        let store = Arc::new(MemorySessionStore::new());
        let engine = Autodialer::new(
            directory.clone(),
            gateway.clone(),
            store.clone(),
            &EngineConfig::default(),
        );
        directory
            .script_page(1, vec![customer("a", &["+1"]), customer("b", &["+2"])], false)
            .await;
        let mut notices = engine.notices();

        engine.start(None).await.unwrap();

        assert_eq!(engine.state(), EngineState::Idle);
        assert!(matches!(
            notices.try_recv(),
            Ok(EngineNotice::NoDefaultProvider)
        ));
        assert_eq!(gateway.placed_count().await, 0);
        assert!(!store.stored_session().await.unwrap().active);
    }

    #[tokio::test]
    async fn rejected_call_keeps_session_running() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &["+1"]), customer("b", &["+2"])], false)
            .await;
        f.gateway.fail_placements(true);
        let mut notices = f.engine.notices();

        f.engine.start(None).await.unwrap();

        assert_eq!(f.engine.state(), EngineState::Running);
        match notices.try_recv() {
            Ok(EngineNotice::CallFailed { customer, .. }) => {
                assert_eq!(customer.id.0, "a");
            }
            other => panic!("expected CallFailed notice, got {other:?}"),
        }

        // The session still advances past the failed record.
        f.gateway.fail_placements(false);
        f.engine.advance().await.unwrap();
        let calls = f.gateway.placed_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].phone_number, "+2");
    }

    #[tokio::test]
    async fn start_with_no_dialable_first_page_stays_idle() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &[]), customer("b", &[])], true)
            .await;

        // No usable record on the first page means no session, even though
        // the backend reports more pages.
        f.engine.start(None).await.unwrap();

        assert_eq!(f.engine.state(), EngineState::Idle);
        assert_eq!(f.gateway.placed_count().await, 0);
        assert_eq!(f.directory.search_count(), 1);
        assert!(!f.store.stored_session().await.unwrap().active);
    }

    #[tokio::test]
    async fn phone_less_mid_session_page_consumes_one_fetch_per_advance() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &["+1"])], true)
            .await;
        f.directory
            .script_page(2, vec![customer("b", &[])], true)
            .await;
        f.directory
            .script_page(3, vec![customer("c", &["+3"])], false)
            .await;

        f.engine.start(None).await.unwrap();
        assert_eq!(f.gateway.placed_count().await, 1);

        // Page 2 contributes nothing dialable: no call, still running, and
        // only the one allowed fetch happened.
        f.engine.advance().await.unwrap();
        assert_eq!(f.gateway.placed_count().await, 1);
        assert_eq!(f.engine.state(), EngineState::Running);
        assert_eq!(f.directory.search_count(), 2);

        // The next tick fetches page 3 and dials.
        f.engine.advance().await.unwrap();
        assert_eq!(f.gateway.placed_count().await, 2);
        assert_eq!(f.directory.search_count(), 3);
    }

    #[tokio::test]
    async fn external_stop_is_mirrored_without_persisting() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &["+1"]), customer("b", &["+2"])], false)
            .await;

        f.engine.start(None).await.unwrap();
        let saves_before = f.store.session_save_count();

        f.engine
            .apply_external(PersistedSession::default())
            .await;

        assert_eq!(f.engine.state(), EngineState::Idle);
        // Mirroring never writes back to the store.
        assert_eq!(f.store.session_save_count(), saves_before);

        // And a subsequent advance is a no-op: no double dialing.
        f.engine.advance().await.unwrap();
        assert_eq!(f.gateway.placed_count().await, 1);
    }

    #[tokio::test]
    async fn external_start_mirrors_display_without_dialing() {
        let f = fixture();
        let foreign = PersistedSession {
            active: true,
            page_cursor: 1,
            index: 3,
            current: Some(CustomerSummary {
                id: dialflow_core::types::CustomerId("cus_x".into()),
                label: "Someone Else".into(),
                avatar_url: None,
            }),
        };

        f.engine.apply_external(foreign.clone()).await;

        assert_eq!(f.engine.state(), EngineState::Running);
        assert_eq!(f.engine.current().await.unwrap().id.0, "cus_x");

        // Mirroring contexts never drive: ticks place no calls.
        f.engine.tick().await;
        assert_eq!(f.gateway.placed_count().await, 0);
        assert_eq!(f.store.session_save_count(), 0);
    }

    #[tokio::test]
    async fn resume_continues_at_persisted_index_without_dialing() {
        let f = fixture();
        f.directory
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
        f.store
            .save_snapshot(&FilterSnapshot::default())
            .await
            .unwrap();
        f.store
            .save_session(&PersistedSession {
                active: true,
                page_cursor: 1,
                index: 2,
                current: None,
            })
            .await
            .unwrap();

        assert!(f.engine.resume().await.unwrap());
        assert_eq!(f.engine.state(), EngineState::Running);
        assert_eq!(f.gateway.placed_count().await, 0);

        f.engine.advance().await.unwrap();
        let calls = f.gateway.placed_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].phone_number, "+3");
    }

    #[tokio::test]
    async fn resume_abandons_session_when_snapshot_is_missing() {
        let f = fixture();
        f.store
            .save_session(&PersistedSession {
                active: true,
                page_cursor: 1,
                index: 1,
                current: None,
            })
            .await
            .unwrap();

        assert!(!f.engine.resume().await.unwrap());
        assert_eq!(f.engine.state(), EngineState::Idle);
        assert!(!f.store.stored_session().await.unwrap().active);
    }

    #[tokio::test]
    async fn resume_abandons_session_when_rebuild_fails() {
        let f = fixture();
        f.directory.script_failure(1, "backend down").await;
        f.store
            .save_snapshot(&FilterSnapshot::default())
            .await
            .unwrap();
        f.store
            .save_session(&PersistedSession {
                active: true,
                page_cursor: 1,
                index: 1,
                current: None,
            })
            .await
            .unwrap();

        assert!(!f.engine.resume().await.unwrap());
        assert_eq!(f.engine.state(), EngineState::Idle);
        assert!(!f.store.stored_session().await.unwrap().active);
        assert_eq!(f.gateway.placed_count().await, 0);
    }

    #[tokio::test]
    async fn resume_without_active_session_is_a_noop() {
        let f = fixture();
        assert!(!f.engine.resume().await.unwrap());

        f.store
            .save_session(&PersistedSession::default())
            .await
            .unwrap();
        assert!(!f.engine.resume().await.unwrap());
        assert_eq!(f.engine.state(), EngineState::Idle);
    }

    #[tokio::test]
    async fn snapshot_is_immutable_for_the_session_lifetime() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &["+1"])], true)
            .await;
        f.directory
            .script_page(2, vec![customer("b", &["+2"])], false)
            .await;

        let mut live = FilterSnapshot::default();
        live.filters
            .insert("status".into(), serde_json::json!("lead"));
        f.engine.start(Some(live.clone())).await.unwrap();

        // A later advance fetches page 2 with the captured criteria, even
        // though the store snapshot has been replaced in the meantime.
        f.store
            .save_snapshot(&FilterSnapshot::default())
            .await
            .unwrap();
        f.engine.advance().await.unwrap();

        let seen = f.directory.last_snapshot().await.unwrap();
        assert_eq!(seen, live);
    }

    #[tokio::test]
    async fn teardown_clears_active_flag() {
        let f = fixture();
        f.directory
            .script_page(1, vec![customer("a", &["+1"])], true)
            .await;

        f.engine.start(None).await.unwrap();
        f.engine.teardown().await.unwrap();

        assert!(!f.store.stored_session().await.unwrap().active);
        assert_eq!(f.engine.state(), EngineState::Idle);
    }
}
