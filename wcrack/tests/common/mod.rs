// Common test utilities for integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use wcrack::config::{Config, DatabaseConfig, OcrConfig, ScanConfig};
use wcrack::error::{Result, WcrackError};
use wcrack::ocr::{EngineFactory, OcrEngine, OcrProvider};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Text the scripted engine fails on instead of "recognizing".
pub const ENGINE_FAILURE_MARKER: &str = "<<engine-failure>>";

/// A payload that sniffs as PNG and carries `text` for the scripted engine.
pub fn scripted_png(text: &str) -> Vec<u8> {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

/// Engine that "recognizes" the UTF-8 text stored after the PNG signature.
pub struct ScriptedEngine;

impl OcrEngine for ScriptedEngine {
    fn recognize(&mut self, image: &[u8]) -> Result<String> {
        let text = String::from_utf8_lossy(&image[PNG_MAGIC.len().min(image.len())..]);
        if text.contains(ENGINE_FAILURE_MARKER) {
            return Err(WcrackError::Ocr("scripted engine failure".to_string()));
        }
        Ok(text.into_owned())
    }
}

pub struct ScriptedFactory;

impl EngineFactory for ScriptedFactory {
    fn create(&self) -> Result<Box<dyn OcrEngine>> {
        Ok(Box::new(ScriptedEngine))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn scripted_provider(config: &OcrConfig) -> OcrProvider {
    OcrProvider::with_factory(Arc::new(ScriptedFactory), config)
}

/// Scripted engine that counts its calls and takes `delay` per image.
pub struct TrackingFactory {
    pub delay: Duration,
    pub calls: Arc<AtomicUsize>,
}

struct TrackingEngine {
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl OcrEngine for TrackingEngine {
    fn recognize(&mut self, image: &[u8]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        ScriptedEngine.recognize(image)
    }
}

impl EngineFactory for TrackingFactory {
    fn create(&self) -> Result<Box<dyn OcrEngine>> {
        Ok(Box::new(TrackingEngine {
            delay: self.delay,
            calls: self.calls.clone(),
        }))
    }

    fn name(&self) -> &str {
        "tracking"
    }
}

/// Provider over a [`TrackingFactory`], plus its call counter.
pub fn tracking_provider(config: &OcrConfig, delay: Duration) -> (OcrProvider, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let factory = TrackingFactory {
        delay,
        calls: calls.clone(),
    };
    (OcrProvider::with_factory(Arc::new(factory), config), calls)
}

/// `count` sentences of plain prose, tagged so images stay distinguishable.
pub fn prose(count: usize, tag: &str) -> String {
    (1..=count)
        .map(|i| format!("Sentence number {i} comes from the {tag} screenshot."))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap_or_else(|e| panic!("Failed to write '{name}': {e}"));
    path
}

pub fn scan_config(workers: usize, buffer: usize) -> ScanConfig {
    ScanConfig {
        workers,
        buffer,
        ..ScanConfig::default()
    }
}

/// Config pointing at a database file inside `dir`.
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.database = DatabaseConfig {
        url: format!("file:{}", dir.join("test.db").display()),
        auth_token: None,
    };
    config.ocr = OcrConfig::default();
    config.scan = scan_config(4, 16);
    config.output.dir = dir.join("output").display().to_string();
    config
}

// Re-export commonly used crates for convenience
pub use serial_test::serial;
pub use tempfile;
pub use wiremock;
