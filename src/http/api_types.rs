//! Response bodies for the HTTP endpoints. No business logic lives here.

use serde::Serialize;

use crate::limiter::StatsSnapshot;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
    pub capacity: usize,
    pub available_slots: usize,
    pub closed: bool,
    pub limiter: StatsSnapshot,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error kind, e.g. "parse" | "validation" | "admission"
    pub error: String,
    pub message: String,
}
