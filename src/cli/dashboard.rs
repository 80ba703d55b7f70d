// src/cli/dashboard.rs — Terminal dashboard with a background refresh loop

use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::{self, ApiState};
use crate::infra::config::{ApiConfig, Config};
use crate::refresh::RefreshTrigger;

pub async fn run_dashboard(config: &Config) -> anyhow::Result<()> {
    let refresher = super::build_refresher(config);
    let (trigger, triggers) = RefreshTrigger::channel();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let (api_stop_tx, api_stop_rx) = oneshot::channel::<()>();

    let every = Duration::from_secs(config.refresh.interval_secs);
    let refresh_loop = tokio::spawn(refresher.clone().run(every, triggers, async move {
        let _ = stop_rx.await;
    }));

    let api_task = spawn_companion_api(
        &config.api,
        ApiState {
            refresher: refresher.clone(),
            trigger: trigger.clone(),
        },
        async move {
            let _ = api_stop_rx.await;
        },
    );

    // The terminal loop blocks; keep it off the runtime's worker threads.
    let ui = refresher.clone();
    let result = tokio::task::spawn_blocking(move || crate::tui::run_dashboard(ui, trigger)).await;

    let _ = stop_tx.send(());
    let _ = api_stop_tx.send(());
    if let Err(e) = refresh_loop.await {
        tracing::error!("Refresh loop ended abnormally: {e}");
    }
    if let Some(task) = api_task {
        if let Err(e) = task.await {
            tracing::error!("API server ended abnormally: {e}");
        }
    }

    result?
}

/// Serve the HTTP API next to the terminal dashboard when `api.enabled` is set.
/// A server failure is logged and never takes the dashboard down.
pub(crate) fn spawn_companion_api(
    api_config: &ApiConfig,
    state: ApiState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Option<JoinHandle<()>> {
    if !api_config.enabled {
        tracing::debug!("API disabled; dashboard runs without it");
        return None;
    }

    let api_config = api_config.clone();
    Some(tokio::spawn(async move {
        if let Err(e) = api::start_server(&api_config, state, shutdown).await {
            tracing::error!("API server failed: {e}");
        }
    }))
}
