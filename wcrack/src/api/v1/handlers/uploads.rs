use axum::extract::{Multipart, State};
use axum::http::StatusCode;

use crate::analysis::AnalysisId;
use crate::api::state::AppState;
use crate::api::v1::dto::{ImageWordsResponse, UploadWordsResponse, WordDto};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::ocr::{sniffed_type, validate, Image, SNIFF_LEN};
use crate::text::normalize;

/// Largest accepted text upload (20 MiB).
pub const MAX_TEXT_UPLOAD: usize = 20 * 1024 * 1024;

/// Reads the named multipart field, enforcing `max` bytes.
///
/// Any failure is returned as a ready-to-send error response.
async fn read_field<T: serde::Serialize>(
    multipart: &mut Multipart,
    field_name: &str,
    max: usize,
) -> Result<Vec<u8>, ApiResponse<T>> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return Err(ApiResponse::error(
                    ErrorCode::InvalidRequest,
                    format!("Missing '{field_name}' field"),
                ))
            }
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(ApiResponse::error(
                    ErrorCode::PayloadTooLarge,
                    format!("Upload exceeds {max} bytes"),
                ))
            }
            Err(e) => {
                return Err(ApiResponse::error(
                    ErrorCode::InvalidRequest,
                    format!("Invalid multipart body: {}", e.body_text()),
                ))
            }
        };

        if field.name() != Some(field_name) {
            continue;
        }
        if let Some(file_name) = field.file_name() {
            tracing::info!(field = field_name, file_name = %file_name, "Received form");
        }

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(ApiResponse::error(
                    ErrorCode::PayloadTooLarge,
                    format!("Upload exceeds {max} bytes"),
                ))
            }
            Err(e) => {
                return Err(ApiResponse::error(
                    ErrorCode::InvalidRequest,
                    format!("Failed to read '{field_name}': {}", e.body_text()),
                ))
            }
        };

        if bytes.len() > max {
            return Err(ApiResponse::error(
                ErrorCode::PayloadTooLarge,
                format!("File too large: {} bytes (max {max} bytes)", bytes.len()),
            ));
        }
        return Ok(bytes.to_vec());
    }
}

/// Plain text: no recognizable binary signature and valid UTF-8 without NULs
/// in the sniffed prefix.
fn looks_like_text(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    if infer::get(head).is_some() || head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // A multi-byte character cut at the prefix boundary is fine.
        Err(e) => e.error_len().is_none(),
    }
}

/// `POST /api/v1/words:upload`
///
/// Multipart form with a `file` text field. Every whitespace-delimited token
/// is stored in a new batch.
#[utoipa::path(
    post,
    path = "/api/v1/words:upload",
    tag = "words",
    operation_id = "words.upload",
    request_body(content_type = "multipart/form-data", content = String, description = "Text file in the `file` field"),
    responses(
        (status = 200, description = "Words stored", body = UploadWordsResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 413, description = "File larger than 20 MiB", body = ApiError),
        (status = 415, description = "Not a text file", body = ApiError),
    )
)]
pub async fn upload_words(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResponse<UploadWordsResponse> {
    let bytes = match read_field(&mut multipart, "file", MAX_TEXT_UPLOAD).await {
        Ok(bytes) => bytes,
        Err(resp) => return resp,
    };

    if !looks_like_text(&bytes) {
        return ApiResponse::error(
            ErrorCode::UnsupportedMediaType,
            format!("Content type {} not allowed. Upload a text file", sniffed_type(&bytes)),
        );
    }

    let text = String::from_utf8_lossy(&bytes);
    let values: Vec<String> = text.split_whitespace().map(|t| normalize(t).to_string()).collect();

    let batch_name = match AnalysisId::with_suffix(Some("upload")) {
        Ok(id) => id.to_string(),
        Err(e) => return e.into(),
    };

    match state.db.create_words_batch(&batch_name, &values).await {
        Ok((batch, count)) => {
            tracing::info!(batch = %batch.name, count, "Inserted words");
            ApiResponse::success(UploadWordsResponse {
                batch_name: batch.name,
                count,
            })
        }
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/words:uploadImage`
///
/// Multipart form with an `image` field (PNG or JPEG). Returns the recognized
/// words with their detected language; nothing is stored.
#[utoipa::path(
    post,
    path = "/api/v1/words:uploadImage",
    tag = "words",
    operation_id = "words.uploadImage",
    request_body(content_type = "multipart/form-data", content = String, description = "PNG or JPEG screenshot in the `image` field"),
    responses(
        (status = 200, description = "Recognized words", body = ImageWordsResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 413, description = "Image larger than the configured limit", body = ApiError),
        (status = 415, description = "Not a PNG or JPEG image", body = ApiError),
        (status = 501, description = "OCR engine unavailable", body = ApiError),
    )
)]
pub async fn upload_image_words(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResponse<ImageWordsResponse> {
    let max = state.config.ocr.max_image_size;
    let bytes = match read_field(&mut multipart, "image", max).await {
        Ok(bytes) => bytes,
        Err(resp) => return resp,
    };

    if validate(&bytes).is_none() {
        return ApiResponse::error(
            ErrorCode::UnsupportedMediaType,
            format!(
                "Content type {} not allowed. Upload a PNG or JPEG image",
                sniffed_type(&bytes)
            ),
        );
    }
    let image = match Image::new(bytes) {
        Ok(image) => image,
        Err(e) => return e.into(),
    };

    let analysis_id = match AnalysisId::new() {
        Ok(id) => id,
        Err(e) => return e.into(),
    };

    let result = match state.ocr.recognize(image).await {
        Ok(result) => result,
        Err(e) => return e.into(),
    };

    let words: Vec<WordDto> = result.words(&state.detector).map(WordDto::from).collect();
    tracing::info!(analysis_id = %analysis_id, count = words.len(), "Recognized image words");

    ApiResponse::success(ImageWordsResponse {
        analysis_id: analysis_id.to_string(),
        count: words.len(),
        words,
    })
}
