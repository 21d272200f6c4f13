use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::v1::dto::{CreateWordRequest, PageQuery};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode, ResponseMeta};
use crate::error::WcrackError;
use crate::models::{Page, WordBatch, WordFrequency, WordRanking, WordRow};

fn page_from(query: Result<Query<PageQuery>, QueryRejection>) -> Result<Page, WcrackError> {
    let Query(query) = query?;
    Ok(query.into())
}

/// `GET /api/v1/words`
#[utoipa::path(
    get,
    path = "/api/v1/words",
    tag = "words",
    operation_id = "words.list",
    params(PageQuery),
    responses(
        (status = 200, description = "Words ordered by value", body = Vec<WordRow>),
        (status = 400, description = "Invalid query", body = ApiError),
    )
)]
pub async fn list_words(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Vec<WordRow>> {
    let page = match page_from(query) {
        Ok(page) => page,
        Err(e) => return e.into(),
    };

    match state.db.list_words(page).await {
        Ok(words) => {
            let meta = ResponseMeta::for_page(page, words.len());
            ApiResponse::success_with_meta(words, meta)
        }
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/words`
#[utoipa::path(
    post,
    path = "/api/v1/words",
    tag = "words",
    operation_id = "words.create",
    request_body = CreateWordRequest,
    responses(
        (status = 201, description = "Word stored", body = WordRow),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn create_word(
    State(state): State<AppState>,
    body: Result<Json<CreateWordRequest>, JsonRejection>,
) -> ApiResponse<WordRow> {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return WcrackError::from(rejection).into(),
    };

    if let Err(errors) = req.validate() {
        return ApiResponse::error(ErrorCode::InvalidRequest, errors.to_string());
    }
    let value = req.value.trim();
    if value.is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "value must not be blank");
    }

    match state.db.create_word(value, None).await {
        Ok(word) => {
            tracing::info!(id = word.id, "Word created");
            ApiResponse::created(word)
        }
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/words/batches`
#[utoipa::path(
    get,
    path = "/api/v1/words/batches",
    tag = "words",
    operation_id = "words.batches",
    params(PageQuery),
    responses(
        (status = 200, description = "Word batches, newest first", body = Vec<WordBatch>),
        (status = 400, description = "Invalid query", body = ApiError),
    )
)]
pub async fn list_word_batches(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Vec<WordBatch>> {
    let page = match page_from(query) {
        Ok(page) => page,
        Err(e) => return e.into(),
    };

    match state.db.list_word_batches(page).await {
        Ok(batches) => {
            let meta = ResponseMeta::for_page(page, batches.len());
            ApiResponse::success_with_meta(batches, meta)
        }
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/words/frequencies`
#[utoipa::path(
    get,
    path = "/api/v1/words/frequencies",
    tag = "words",
    operation_id = "words.frequencies",
    params(PageQuery),
    responses(
        (status = 200, description = "Occurrences per word, most frequent first", body = Vec<WordFrequency>),
        (status = 400, description = "Invalid query", body = ApiError),
    )
)]
pub async fn list_word_frequencies(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Vec<WordFrequency>> {
    let page = match page_from(query) {
        Ok(page) => page,
        Err(e) => return e.into(),
    };

    match state.db.list_word_frequencies(page).await {
        Ok(rows) => {
            let meta = ResponseMeta::for_page(page, rows.len());
            ApiResponse::success_with_meta(rows, meta)
        }
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/words/rankings`
#[utoipa::path(
    get,
    path = "/api/v1/words/rankings",
    tag = "words",
    operation_id = "words.rankings",
    params(PageQuery),
    responses(
        (status = 200, description = "Words ranked by occurrence count", body = Vec<WordRanking>),
        (status = 400, description = "Invalid query", body = ApiError),
    )
)]
pub async fn list_word_rankings(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Vec<WordRanking>> {
    let page = match page_from(query) {
        Ok(page) => page,
        Err(e) => return e.into(),
    };

    match state.db.list_word_rankings(page).await {
        Ok(rows) => {
            let meta = ResponseMeta::for_page(page, rows.len());
            ApiResponse::success_with_meta(rows, meta)
        }
        Err(e) => e.into(),
    }
}
