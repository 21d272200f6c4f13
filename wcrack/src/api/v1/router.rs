use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::handlers::uploads::MAX_TEXT_UPLOAD;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn v1_router(state: &AppState) -> Router<AppState> {
    let image_limit = state.config.ocr.max_image_size + MULTIPART_OVERHEAD;

    let words = Router::new()
        .route(
            "/",
            get(handlers::words::list_words).post(handlers::words::create_word),
        )
        .route("/batches", get(handlers::words::list_word_batches))
        .route("/frequencies", get(handlers::words::list_word_frequencies))
        .route("/rankings", get(handlers::words::list_word_rankings));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router())
        .nest("/words", words)
        .route(
            "/words:upload",
            post(handlers::uploads::upload_words)
                .layer(DefaultBodyLimit::max(MAX_TEXT_UPLOAD + MULTIPART_OVERHEAD)),
        )
        .route(
            "/words:uploadImage",
            post(handlers::uploads::upload_image_words).layer(DefaultBodyLimit::max(image_limit)),
        )
        .fallback(handlers::not_found)
}
