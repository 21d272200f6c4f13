use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: ComponentStatus,
    pub ocr: ComponentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ComponentStatus {
    pub status: String,
}

impl ComponentStatus {
    fn from_flag(ok: bool, down: &str) -> Self {
        Self {
            status: if ok { "ok" } else { down }.to_string(),
        }
    }
}

/// `GET /api/v1/healthz`
#[utoipa::path(
    get,
    path = "/api/v1/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn healthz(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let db_ok = match state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: ComponentStatus::from_flag(db_ok, "error"),
        ocr: ComponentStatus::from_flag(state.ocr.is_available(), "unavailable"),
    })
}
