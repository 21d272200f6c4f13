use std::sync::Arc;

use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::config::OcrConfig;
use crate::error::{Result, WcrackError};
use crate::text::RecognitionResult;

use super::engine::{EngineFactory, OcrEngine, TesseractFactory};
use super::preprocessing::preprocess_image;
use super::validate::Image;

enum Backend {
    Ready(Arc<dyn EngineFactory>),
    Unavailable { reason: String },
}

/// Hands out OCR clients. Cheap to clone; every clone shares the factory.
#[derive(Clone)]
pub struct OcrProvider {
    backend: Arc<Backend>,
    config: OcrConfig,
}

impl OcrProvider {
    /// Tesseract provider. Probes one handle so a missing engine or language
    /// pack is reported once, up front.
    pub fn new(config: &OcrConfig) -> Self {
        let factory = TesseractFactory::new(config.languages.clone());
        let backend = match factory.create() {
            Ok(_) => {
                info!(languages = %config.languages, "Tesseract OCR backend initialized");
                Backend::Ready(Arc::new(factory))
            }
            Err(e) => {
                let reason = e.to_string();
                warn!("OCR backend unavailable: {}", reason);
                Backend::Unavailable { reason }
            }
        };

        Self {
            backend: Arc::new(backend),
            config: config.clone(),
        }
    }

    pub fn with_factory(factory: Arc<dyn EngineFactory>, config: &OcrConfig) -> Self {
        Self {
            backend: Arc::new(Backend::Ready(factory)),
            config: config.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(*self.backend, Backend::Ready(_))
    }

    pub fn max_image_size(&self) -> usize {
        self.config.max_image_size
    }

    /// Creates a fresh handle. Blocking: call from a blocking thread.
    pub fn new_client(&self) -> Result<OcrClient> {
        match &*self.backend {
            Backend::Ready(factory) => {
                debug!(engine = factory.name(), "Creating OCR client");
                Ok(OcrClient {
                    engine: factory.create()?,
                    config: self.config.clone(),
                })
            }
            Backend::Unavailable { reason } => Err(WcrackError::OcrUnavailable(reason.clone())),
        }
    }

    /// Runs one recognition on a blocking thread with a throwaway client.
    pub async fn recognize(&self, image: Image) -> Result<RecognitionResult> {
        let provider = self.clone();
        tokio::task::spawn_blocking(move || provider.new_client()?.run(&image))
            .await
            .map_err(engine_task_failed)?
    }
}

/// A recognition thread that panicked or was aborted counts as an engine
/// failure on every path.
pub(crate) fn engine_task_failed(err: JoinError) -> WcrackError {
    WcrackError::Ocr(format!("OCR task failed: {err}"))
}

/// An exclusive engine handle plus the size limits it enforces.
pub struct OcrClient {
    engine: Box<dyn OcrEngine>,
    config: OcrConfig,
}

impl OcrClient {
    pub fn new(engine: Box<dyn OcrEngine>, config: &OcrConfig) -> Self {
        Self {
            engine,
            config: config.clone(),
        }
    }

    /// Recognizes text in an already validated image. Blocking.
    pub fn run(&mut self, image: &Image) -> Result<RecognitionResult> {
        if image.len() > self.config.max_image_size {
            return Err(WcrackError::ImageTooLarge {
                size: image.len(),
                max: self.config.max_image_size,
            });
        }

        let text = if self.config.preprocess {
            let processed = preprocess_image(image.bytes(), &self.config)?;
            self.engine.recognize(&processed)?
        } else {
            self.engine.recognize(image.bytes())?
        };

        Ok(RecognitionResult::from(text.trim().to_string()))
    }
}
