use axum::extract::rejection::{JsonRejection, QueryRejection};

use crate::error::WcrackError;

impl From<JsonRejection> for WcrackError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let message = err.body_text();
                match extract_missing_field(&message) {
                    Some(field) => WcrackError::Validation(format!("Missing required field: {field}")),
                    None => WcrackError::Validation(format!("Invalid JSON: {message}")),
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                WcrackError::Validation(format!("JSON syntax error: {}", err.body_text()))
            }
            JsonRejection::MissingJsonContentType(_) => WcrackError::Validation(
                "Missing `Content-Type: application/json` header".to_string(),
            ),
            JsonRejection::BytesRejection(_) => {
                WcrackError::Internal("Failed to read request body".to_string())
            }
            _ => WcrackError::Validation(rejection.body_text()),
        }
    }
}

impl From<QueryRejection> for WcrackError {
    fn from(rejection: QueryRejection) -> Self {
        WcrackError::Validation(format!("Invalid query parameters: {}", rejection.body_text()))
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let start = message.find("missing field `")? + "missing field `".len();
    let len = message[start..].find('`')?;
    Some(&message[start..start + len])
}
