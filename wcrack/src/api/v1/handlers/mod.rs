use axum::extract::OriginalUri;

use crate::api::v1::response::{ApiResponse, ErrorCode};

pub(crate) mod health;
pub mod uploads;
pub mod words;

pub use health::healthz;

/// Unmatched v1 routes still answer with the error envelope.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiResponse<()> {
    ApiResponse::error(ErrorCode::NotFound, format!("No route for {}", uri.path()))
}
