use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::ocr::OcrProvider;
use crate::text::LanguageDetector;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub ocr: OcrProvider,
    pub detector: Arc<LanguageDetector>,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn DatabaseBackend>, ocr: OcrProvider) -> Self {
        let detector = Arc::new(LanguageDetector::new(&config.text));
        Self {
            config: Arc::new(config),
            db,
            ocr,
            detector,
        }
    }
}
