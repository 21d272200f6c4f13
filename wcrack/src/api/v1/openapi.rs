use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "wcrack API",
        version = "1.0.0",
        description = "Word extraction from screenshots and word frequency statistics.",
    ),
    paths(
        handlers::health::healthz,
        handlers::words::list_words,
        handlers::words::create_word,
        handlers::words::list_word_batches,
        handlers::words::list_word_frequencies,
        handlers::words::list_word_rankings,
        handlers::uploads::upload_words,
        handlers::uploads::upload_image_words,
    ),
    components(schemas(
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        models::WordRow,
        models::WordBatch,
        models::WordFrequency,
        models::WordRanking,
        dto::PageQuery,
        dto::CreateWordRequest,
        dto::UploadWordsResponse,
        dto::WordDto,
        dto::ImageWordsResponse,
        handlers::health::HealthData,
        handlers::health::ComponentStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "words", description = "Stored words, batches and statistics"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
