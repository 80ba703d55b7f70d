// src/api/types.rs

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::refresh::RefreshPhase;

/// Liveness plus the age of the published snapshot.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub phase: RefreshPhase,
    pub cycle: u64,
    /// `None` until the first refresh completes.
    pub last_updated: Option<DateTime<Local>>,
}

/// Response for a refresh request.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub status: &'static str,
    pub message: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
