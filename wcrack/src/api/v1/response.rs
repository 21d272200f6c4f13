//! # V1 API Response Envelope & Error Contract
//!
//! Every v1 endpoint returns an [`ApiResponse<T>`] envelope:
//!
//! ```json
//! {
//!   "data": { ... },                                   // present on success
//!   "meta": { "limit": 1000, "offset": 0, "count": 3 }, // list endpoints only
//!   "error": { "code": "invalid_request", "message": "..." } // present on error
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::WcrackError;
use crate::models::Page;

/// Machine-readable error code included in every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed request, bad parameters or failed validation. HTTP 400.
    InvalidRequest,
    /// HTTP 404.
    NotFound,
    /// Upload exceeds the size limit. HTTP 413.
    PayloadTooLarge,
    /// Sniffed content type is not accepted by the endpoint. HTTP 415.
    UnsupportedMediaType,
    /// Internal details are never leaked to the client. HTTP 500.
    InternalError,
    /// A required engine is not available on this server. HTTP 501.
    NotImplemented,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    pub code: ErrorCode,
    /// Safe to display to end users.
    pub message: String,
}

/// Window metadata for list responses.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub limit: u32,
    pub offset: u32,
    /// Items in this response.
    pub count: usize,
}

impl ResponseMeta {
    pub fn for_page(page: Page, count: usize) -> Self {
        Self {
            limit: page.limit,
            offset: page.offset,
            count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            meta: None,
            error: None,
            status: StatusCode::OK,
        }
    }

    pub fn success_with_meta(data: T, meta: ResponseMeta) -> Self {
        Self {
            data: Some(data),
            meta: Some(meta),
            error: None,
            status: StatusCode::OK,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            data: Some(data),
            meta: None,
            error: None,
            status: StatusCode::CREATED,
        }
    }

    /// HTTP status is derived from the [`ErrorCode`].
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        let status = code.status();
        Self {
            data: None,
            meta: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        match serde_json::to_value(&self) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(_) => {
                let body = serde_json::json!({
                    "error": {
                        "code": "internal_error",
                        "message": "An internal error occurred"
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl<T: Serialize> From<WcrackError> for ApiResponse<T> {
    /// Internal failures are logged and replaced with a generic message.
    fn from(err: WcrackError) -> Self {
        match err {
            WcrackError::Validation(msg) => ApiResponse::error(ErrorCode::InvalidRequest, msg),
            WcrackError::Json(e) => {
                ApiResponse::error(ErrorCode::InvalidRequest, format!("Invalid JSON: {e}"))
            }
            err @ WcrackError::ImageTooLarge { .. } => {
                ApiResponse::error(ErrorCode::PayloadTooLarge, err.to_string())
            }
            WcrackError::OcrUnavailable(msg) => ApiResponse::error(ErrorCode::NotImplemented, msg),
            WcrackError::Ocr(msg) => {
                tracing::warn!(error = %msg, "Recognition failed");
                ApiResponse::error(ErrorCode::InternalError, "Failed to recognize words from an image")
            }
            internal => {
                tracing::error!(error = %internal, "Internal error mapped to v1 response");
                ApiResponse::error(ErrorCode::InternalError, "An internal error occurred")
            }
        }
    }
}
