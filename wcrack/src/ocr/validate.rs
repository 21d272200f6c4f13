use std::fmt;

use crate::error::{Result, WcrackError};

/// Number of leading bytes inspected when sniffing content.
pub const SNIFF_LEN: usize = 512;

/// Image formats accepted for recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Sniffs the content type of `bytes` from at most the first
/// [`SNIFF_LEN`] bytes. Only PNG and JPEG are accepted.
pub fn validate(bytes: &[u8]) -> Option<ImageFormat> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    match infer::get(head).map(|kind| kind.mime_type()) {
        Some("image/png") => Some(ImageFormat::Png),
        Some("image/jpeg") => Some(ImageFormat::Jpeg),
        _ => None,
    }
}

/// Human readable content type for rejection messages.
pub fn sniffed_type(bytes: &[u8]) -> &'static str {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    infer::get(head)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream")
}

/// Raw image bytes that passed validation.
#[derive(Debug, Clone)]
pub struct Image {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl Image {
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        match validate(&bytes) {
            Some(format) => Ok(Self { bytes, format }),
            None => Err(WcrackError::Validation(format!(
                "expected image/png or image/jpeg, got {}",
                sniffed_type(&bytes)
            ))),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
