//! Image validation and text recognition.
//!
//! Bytes are sniffed by [`validate`] before any engine work. Recognition goes
//! through the [`EngineFactory`]/[`OcrEngine`] seam; the default engine is
//! Tesseract. Engine calls block, so callers run them on
//! `tokio::task::spawn_blocking` threads.

mod engine;
mod preprocessing;
mod provider;
mod validate;

pub use engine::{EngineFactory, OcrEngine, TesseractEngine, TesseractFactory};
pub use preprocessing::preprocess_image;
pub use provider::{OcrClient, OcrProvider};
pub(crate) use provider::engine_task_failed;
pub use validate::{sniffed_type, validate, Image, ImageFormat, SNIFF_LEN};
