//! Recognition against the real Tesseract engine. Needs Tesseract with the
//! English language pack and the screenshots under `tests/fixtures/`.

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use wcrack::config::{OcrConfig, ScanConfig};
use wcrack::ocr::OcrProvider;
use wcrack::scan::Scanner;
use wcrack::text::LanguageDetector;

mod common;
use common::init_test_logger;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn tesseract_scanner() -> Scanner {
    let provider = OcrProvider::new(&OcrConfig::default());
    assert!(provider.is_available(), "Tesseract is not installed");
    Scanner::new(provider, &ScanConfig::default()).unwrap()
}

#[tokio::test]
#[ignore = "requires Tesseract and tests/fixtures/hello_world.png"]
async fn test_tesseract_hello_world() {
    init_test_logger();
    let detector = LanguageDetector::default();

    let words: Vec<String> = tesseract_scanner()
        .scan_image(fixture_path("hello_world.png"))
        .await
        .unwrap()
        .flat_map(|s| s.words(&detector).map(|w| w.value).collect::<Vec<_>>())
        .collect();

    assert_eq!(words, vec!["Hello", "world"]);
}

#[tokio::test]
#[ignore = "requires Tesseract and tests/fixtures/sixty_sentences.png"]
async fn test_tesseract_sixty_sentences() {
    let sentences = tesseract_scanner()
        .scan_image(fixture_path("sixty_sentences.png"))
        .await
        .unwrap()
        .count();

    assert_eq!(sentences, 60);
}

#[tokio::test]
#[ignore = "requires Tesseract and the tests/fixtures/screenshots directory"]
async fn test_tesseract_screenshot_directory() {
    let (sentences, summary) = tesseract_scanner()
        .scan_images(fixture_path("screenshots"), CancellationToken::new())
        .await
        .unwrap()
        .drain()
        .await;

    assert!(summary.is_success(), "{summary}");
    assert_eq!(sentences.len(), 191);
}
