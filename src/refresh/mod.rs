// src/refresh/mod.rs — Refresh orchestrator.
//
// Idle -> Refreshing -> Idle. Each cycle runs the three fetches, derives the
// snapshot and swaps it into a watch channel in one step. A busy flag keeps
// at most one refresh in flight; triggers that arrive meanwhile are dropped.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::access::DataAccess;
use crate::metrics::build_snapshot;
use crate::model::{DashboardSnapshot, SharedSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPhase {
    Idle,
    Refreshing,
}

/// The dashboard state handed into and returned from each refresh step.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub phase: RefreshPhase,
    pub cycle: u64,
    pub snapshot: SharedSnapshot,
}

impl DashboardState {
    pub fn initial() -> Self {
        Self {
            phase: RefreshPhase::Idle,
            cycle: 0,
            snapshot: Arc::new(DashboardSnapshot::empty(0, Local::now())),
        }
    }
}

/// One pipeline step: fetch, derive, and return the next idle state.
///
/// Fetch failures are already folded into empty tables by `DataAccess`, so
/// this never fails; the worst case is an empty snapshot.
pub async fn advance(state: DashboardState, access: &DataAccess) -> DashboardState {
    let cycle = state.cycle + 1;
    let report = access.fetch_all().await;
    if !report.failures.is_empty() {
        tracing::warn!(
            cycle,
            failed = report.failures.len(),
            "Refresh completed with failed fetches"
        );
    }
    let snapshot = build_snapshot(report, cycle, Local::now());
    DashboardState {
        phase: RefreshPhase::Idle,
        cycle,
        snapshot: Arc::new(snapshot),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Published { cycle: u64 },
    /// Another refresh was in flight.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Queued,
    AlreadyQueued,
    Closed,
}

/// Manual refresh requests. The channel holds one pending request; extra
/// requests coalesce into it.
#[derive(Debug, Clone)]
pub struct RefreshTrigger {
    tx: mpsc::Sender<()>,
}

impl RefreshTrigger {
    pub fn channel() -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        (Self { tx }, rx)
    }

    pub fn request(&self) -> TriggerOutcome {
        match self.tx.try_send(()) {
            Ok(()) => TriggerOutcome::Queued,
            Err(mpsc::error::TrySendError::Full(())) => TriggerOutcome::AlreadyQueued,
            Err(mpsc::error::TrySendError::Closed(())) => TriggerOutcome::Closed,
        }
    }
}

/// Owns the published snapshot and the in-flight guard.
pub struct Refresher {
    access: DataAccess,
    state: std::sync::Mutex<DashboardState>,
    busy: AtomicBool,
    tx: watch::Sender<SharedSnapshot>,
}

impl Refresher {
    pub fn new(access: DataAccess) -> Self {
        let state = DashboardState::initial();
        let (tx, _rx) = watch::channel(state.snapshot.clone());
        Self {
            access,
            state: std::sync::Mutex::new(state),
            busy: AtomicBool::new(false),
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SharedSnapshot> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> SharedSnapshot {
        self.tx.borrow().clone()
    }

    pub fn phase(&self) -> RefreshPhase {
        if self.busy.load(Ordering::Acquire) {
            RefreshPhase::Refreshing
        } else {
            RefreshPhase::Idle
        }
    }

    /// Run one refresh unless one is already running.
    pub async fn try_refresh(&self) -> RefreshOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Refresh already in flight, trigger dropped");
            return RefreshOutcome::Skipped;
        }
        let _guard = BusyGuard(&self.busy);

        let mut state = self.load_state();
        state.phase = RefreshPhase::Refreshing;
        let next = advance(state, &self.access).await;
        let cycle = next.cycle;

        self.tx.send_replace(next.snapshot.clone());
        self.store_state(next);
        tracing::info!(cycle, "Snapshot published");
        RefreshOutcome::Published { cycle }
    }

    /// Refresh on every tick and on every manual trigger until `shutdown`
    /// resolves. The first tick fires immediately.
    pub async fn run(
        self: Arc<Self>,
        every: Duration,
        mut triggers: mpsc::Receiver<()>,
        shutdown: impl Future<Output = ()>,
    ) {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(interval_secs = every.as_secs(), "Refresh loop started");
        loop {
            let manual = tokio::select! {
                _ = ticker.tick() => false,
                Some(()) = triggers.recv() => {
                    tracing::debug!("Manual refresh requested");
                    true
                }
                _ = &mut shutdown => break,
            };

            // An in-flight refresh is abandoned on shutdown.
            tokio::select! {
                _ = self.try_refresh() => {}
                _ = &mut shutdown => {
                    tracing::info!("Shutdown during refresh, cycle abandoned");
                    break;
                }
            }
            if manual {
                ticker.reset();
            }
        }
        tracing::info!("Refresh loop stopped");
    }

    fn load_state(&self) -> DashboardState {
        match self.state.lock() {
            Ok(s) => s.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store_state(&self, next: DashboardState) {
        match self.state.lock() {
            Ok(mut s) => *s = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
