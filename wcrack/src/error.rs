use thiserror::Error;

#[derive(Error, Debug)]
pub enum WcrackError {
    #[error("Unsupported content: {0}")]
    Validation(String),

    #[error("Image too large: {size} bytes (max {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scan configuration: {0}")]
    Exhaustion(String),

    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification used when reporting per-item failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unsupported content type. Never retried, skips OCR.
    Validation,
    /// The engine failed or refused the input.
    Engine,
    /// Reading a source or writing a sink failed.
    Io,
    /// Worker pool or channel misconfigured. Fatal at startup.
    Exhaustion,
    Other,
}

impl WcrackError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WcrackError::Validation(_) => ErrorKind::Validation,
            WcrackError::ImageTooLarge { .. }
            | WcrackError::Ocr(_)
            | WcrackError::OcrUnavailable(_) => ErrorKind::Engine,
            WcrackError::Io(_) | WcrackError::Database(_) => ErrorKind::Io,
            WcrackError::Exhaustion(_) => ErrorKind::Exhaustion,
            _ => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, WcrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            WcrackError::Validation("text/plain".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            WcrackError::ImageTooLarge { size: 10, max: 5 }.kind(),
            ErrorKind::Engine
        );
        assert_eq!(WcrackError::Ocr("boom".into()).kind(), ErrorKind::Engine);
        assert_eq!(
            WcrackError::Io(std::io::Error::other("disk")).kind(),
            ErrorKind::Io
        );
        assert_eq!(
            WcrackError::Exhaustion("zero workers".into()).kind(),
            ErrorKind::Exhaustion
        );
    }

    #[test]
    fn test_image_too_large_message() {
        let err = WcrackError::ImageTooLarge { size: 12, max: 10 };
        assert_eq!(err.to_string(), "Image too large: 12 bytes (max 10 bytes)");
    }
}
