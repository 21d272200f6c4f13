use leptess::LepTess;
use tracing::debug;

use crate::error::{Result, WcrackError};

/// A single recognition handle.
///
/// Handles are not shared: each worker owns one and calls it from a blocking
/// thread.
pub trait OcrEngine: Send {
    fn recognize(&mut self, image: &[u8]) -> Result<String>;
}

/// Creates recognition handles. One factory is shared by every worker.
pub trait EngineFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn OcrEngine>>;

    fn name(&self) -> &str;
}

pub struct TesseractEngine {
    tess: LepTess,
}

impl OcrEngine for TesseractEngine {
    fn recognize(&mut self, image: &[u8]) -> Result<String> {
        self.tess
            .set_image_from_mem(image)
            .map_err(|e| WcrackError::Ocr(format!("Failed to load image: {e}")))?;

        self.tess
            .get_utf8_text()
            .map_err(|e| WcrackError::Ocr(format!("Failed to extract text: {e}")))
    }
}

/// Tesseract through leptess. Language codes are joined with `+`.
#[derive(Debug, Clone)]
pub struct TesseractFactory {
    languages: String,
}

impl TesseractFactory {
    pub fn new(languages: impl Into<String>) -> Self {
        Self {
            languages: languages.into(),
        }
    }
}

impl EngineFactory for TesseractFactory {
    fn create(&self) -> Result<Box<dyn OcrEngine>> {
        debug!(languages = %self.languages, "Initializing Tesseract handle");
        let tess = LepTess::new(None, &self.languages)
            .map_err(|e| WcrackError::OcrUnavailable(format!("Tesseract init failed: {e}")))?;
        Ok(Box::new(TesseractEngine { tess }))
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
