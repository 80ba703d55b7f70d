// src/store/store_server.rs — Async message passing for Store
//
// The rusqlite connection is owned by one blocking task. Async callers send
// commands over a channel and await the reply, so a slow or hung query never
// blocks the runtime and can be abandoned by the caller's timeout.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::access::TrafficSource;
use crate::infra::errors::{DashError, ErrorKind, Result};
use crate::store::query::ReportQuery;
use crate::store::store::{RawAgentRow, RawCampaignRow, RawIntervalRow, Store};

#[derive(Debug)]
pub enum StoreCommand {
    IntervalTraffic {
        query: Arc<ReportQuery>,
        resp: oneshot::Sender<Result<Vec<RawIntervalRow>>>,
    },
    CampaignSummary {
        query: Arc<ReportQuery>,
        resp: oneshot::Sender<Result<Vec<RawCampaignRow>>>,
    },
    AgentBreakdown {
        query: Arc<ReportQuery>,
        resp: oneshot::Sender<Result<Vec<RawAgentRow>>>,
    },
}

impl StoreCommand {
    /// True once the caller has dropped its receiver, e.g. after a timeout.
    pub fn is_abandoned(&self) -> bool {
        match self {
            StoreCommand::IntervalTraffic { resp, .. } => resp.is_closed(),
            StoreCommand::CampaignSummary { resp, .. } => resp.is_closed(),
            StoreCommand::AgentBreakdown { resp, .. } => resp.is_closed(),
        }
    }
}

/// Where and how to (re)open the store.
#[derive(Debug, Clone)]
pub struct StoreTarget {
    pub path: PathBuf,
    pub busy_timeout: Duration,
}

/// A handle to the Store that uses message passing.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreCommand>,
}

impl StoreHandle {
    pub fn new(tx: mpsc::Sender<StoreCommand>) -> Self {
        Self { tx }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T>>) -> StoreCommand,
    ) -> Result<T> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(build(resp_tx))
            .await
            .map_err(|_| DashError::Connection("store server stopped".into()))?;
        resp_rx
            .await
            .map_err(|_| DashError::Connection("store server dropped the request".into()))?
    }
}

#[async_trait]
impl TrafficSource for StoreHandle {
    async fn interval_traffic(&self, query: Arc<ReportQuery>) -> Result<Vec<RawIntervalRow>> {
        self.request(|resp| StoreCommand::IntervalTraffic { query, resp })
            .await
    }

    async fn campaign_summary(&self, query: Arc<ReportQuery>) -> Result<Vec<RawCampaignRow>> {
        self.request(|resp| StoreCommand::CampaignSummary { query, resp })
            .await
    }

    async fn agent_breakdown(&self, query: Arc<ReportQuery>) -> Result<Vec<RawAgentRow>> {
        self.request(|resp| StoreCommand::AgentBreakdown { query, resp })
            .await
    }
}

/// Helper to spawn the store server and return a handle.
///
/// The connection is opened lazily on the first command and reopened after a
/// connection failure, so an unreachable store at startup is not fatal.
pub fn spawn_store_server(target: StoreTarget) -> (StoreHandle, tokio::task::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(16);
    let handle = StoreHandle::new(tx);
    let join_handle = tokio::task::spawn_blocking(move || run_store_server(target, rx));
    (handle, join_handle)
}

/// Serve commands against an already-open store (tests, seeded demo stores).
pub fn spawn_with_store(store: Store) -> (StoreHandle, tokio::task::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(16);
    let handle = StoreHandle::new(tx);
    let join_handle = tokio::task::spawn_blocking(move || {
        let mut conn = Connector::Fixed(Some(store));
        serve(&mut conn, rx);
    });
    (handle, join_handle)
}

enum Connector {
    Lazy {
        target: StoreTarget,
        store: Option<Store>,
    },
    Fixed(Option<Store>),
}

impl Connector {
    fn store(&mut self) -> Result<&Store> {
        match self {
            Connector::Lazy { target, store } => {
                if store.is_none() {
                    let opened = Store::open_read_only(&target.path, target.busy_timeout)?;
                    tracing::info!("Connected to call store at {}", target.path.display());
                    *store = Some(opened);
                }
                store
                    .as_ref()
                    .ok_or_else(|| DashError::Connection("store not open".into()))
            }
            Connector::Fixed(store) => store
                .as_ref()
                .ok_or_else(|| DashError::Connection("store closed".into())),
        }
    }

    /// Drop a lazily opened connection after a connection-class failure.
    fn observe<T>(&mut self, res: &Result<T>) {
        if let (Connector::Lazy { store, .. }, Err(e)) = (self, res) {
            if e.kind() == ErrorKind::Connection && store.take().is_some() {
                tracing::warn!("Dropping store connection after failure: {e}");
            }
        }
    }

    fn run<T>(&mut self, f: impl FnOnce(&Store) -> Result<T>) -> Result<T> {
        let res = self.store().and_then(f);
        self.observe(&res);
        res
    }
}

/// The blocking task that owns the Store.
pub fn run_store_server(target: StoreTarget, rx: mpsc::Receiver<StoreCommand>) {
    let mut conn = Connector::Lazy {
        target,
        store: None,
    };
    serve(&mut conn, rx);
}

fn serve(conn: &mut Connector, mut rx: mpsc::Receiver<StoreCommand>) {
    while let Some(cmd) = rx.blocking_recv() {
        if cmd.is_abandoned() {
            tracing::debug!("Skipping store command, caller gave up");
            continue;
        }
        match cmd {
            StoreCommand::IntervalTraffic { query, resp } => {
                let res = conn.run(|s| s.query_interval_traffic(&query));
                let _ = resp.send(res);
            }
            StoreCommand::CampaignSummary { query, resp } => {
                let res = conn.run(|s| s.query_campaign_summary(&query));
                let _ = resp.send(res);
            }
            StoreCommand::AgentBreakdown { query, resp } => {
                let res = conn.run(|s| s.query_agent_breakdown(&query));
                let _ = resp.send(res);
            }
        }
    }
    tracing::debug!("Store server shutting down");
}
