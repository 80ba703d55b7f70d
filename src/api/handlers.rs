// src/api/handlers.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::{types::*, ApiState};
use crate::model::DashboardSnapshot;
use crate::refresh::TriggerOutcome;
use crate::view::{self, DashboardView};

/// GET /api/v1/health
pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let snapshot = state.refresher.current();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        phase: state.refresher.phase(),
        cycle: snapshot.cycle,
        last_updated: (snapshot.cycle > 0).then_some(snapshot.generated_at),
    })
}

/// GET /api/v1/snapshot — The last published snapshot.
pub async fn get_snapshot(State(state): State<ApiState>) -> Json<DashboardSnapshot> {
    Json(state.refresher.current().as_ref().clone())
}

/// GET /api/v1/view — The snapshot bound to tiles, table and charts.
pub async fn get_view(State(state): State<ApiState>) -> Json<DashboardView> {
    Json(view::bind(&state.refresher.current()))
}

/// POST /api/v1/refresh — Queue a refresh outside the timer.
pub async fn request_refresh(
    State(state): State<ApiState>,
) -> Result<(StatusCode, Json<RefreshResponse>), (StatusCode, Json<ErrorResponse>)> {
    match state.trigger.request() {
        TriggerOutcome::Queued => Ok((
            StatusCode::ACCEPTED,
            Json(RefreshResponse {
                status: "queued",
                message: "Refresh queued".into(),
            }),
        )),
        TriggerOutcome::AlreadyQueued => Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "A refresh is already queued".into(),
            }),
        )),
        TriggerOutcome::Closed => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Refresh loop is not running".into(),
            }),
        )),
    }
}
