// src/cli/serve.rs — Headless refresh loop behind the HTTP API

use std::time::Duration;

use tokio::sync::oneshot;

use crate::api::{self, ApiState};
use crate::infra::config::Config;
use crate::refresh::RefreshTrigger;

pub async fn run_serve(config: &Config, port: Option<u16>) -> anyhow::Result<()> {
    let mut api_config = config.api.clone();
    if let Some(port) = port {
        api_config.port = port;
    }

    let refresher = super::build_refresher(config);
    let (trigger, triggers) = RefreshTrigger::channel();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let every = Duration::from_secs(config.refresh.interval_secs);
    let refresh_loop = tokio::spawn(refresher.clone().run(every, triggers, async move {
        let _ = stop_rx.await;
    }));

    println!(
        "Serving on http://127.0.0.1:{} (refresh every {}s). Press Ctrl+C to stop.",
        api_config.port, config.refresh.interval_secs
    );

    let state = ApiState { refresher, trigger };
    let served = api::start_server(&api_config, state, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown signal received");
    })
    .await;

    let _ = stop_tx.send(());
    if let Err(e) = refresh_loop.await {
        tracing::error!("Refresh loop ended abnormally: {e}");
    }
    served
}
