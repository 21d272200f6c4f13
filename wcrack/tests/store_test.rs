use std::sync::Arc;

use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use wcrack::analysis::{Analysis, AnalysisId};
use wcrack::db::{Database, DatabaseBackend, LibSqlBackend};
use wcrack::models::Page;
use wcrack::scan::{collect_words, Scanner};
use wcrack::sink::{DatabaseSink, WordSink};
use wcrack::text::LanguageDetector;

mod common;
use common::{init_test_logger, scripted_png, scripted_provider, test_config, write_file};

async fn open(dir: &std::path::Path) -> Arc<dyn DatabaseBackend> {
    let config = test_config(dir);
    Arc::new(LibSqlBackend::new(
        Database::new(&config.database).await.unwrap(),
    ))
}

#[tokio::test]
async fn test_scan_directory_into_database_batch() {
    init_test_logger();
    let dir = tempfile::tempdir().unwrap();
    let shots = dir.path().join("shots");
    std::fs::create_dir(&shots).unwrap();
    write_file(&shots, "a.png", &scripted_png("Rust is fast. Rust is safe."));
    write_file(&shots, "b.png", &scripted_png("Go is simple."));

    let db = open(dir.path()).await;
    let config = test_config(dir.path());
    let scanner = Scanner::new(scripted_provider(&config.ocr), &config.scan).unwrap();

    let id = AnalysisId::with_suffix(Some("dir")).unwrap();
    let mut sink = DatabaseSink::with_batch(db.clone(), id.as_str()).await.unwrap();
    let mut analysis = Analysis::new(id.clone());

    let stream = scanner
        .scan_images(&shots, CancellationToken::new())
        .await
        .unwrap();
    let summary = collect_words(stream, &LanguageDetector::default(), &mut sink, &mut analysis)
        .await
        .unwrap();

    assert!(summary.is_success());
    assert_eq!(sink.written(), 9);
    assert_eq!(sink.batch().unwrap().name, id.as_str());

    let stored = db.list_words_by_batch_name(id.as_str()).await.unwrap();
    assert_eq!(stored.len(), 9);
    assert!(stored.iter().all(|w| w.batch_name == id.as_str()));

    let frequencies = db.list_word_frequencies(Page::new(2, 0)).await.unwrap();
    assert_eq!(frequencies[0].value, "is");
    assert_eq!(frequencies[0].total, 3);
    assert_eq!(frequencies[1].value, "Rust");
    assert_eq!(frequencies[1].total, 2);
}

#[tokio::test]
async fn test_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = open(dir.path()).await;
        db.create_word("persisted", None).await.unwrap();
    }

    let db = open(dir.path()).await;
    let words = db.list_words(Page::default()).await.unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].value, "persisted");
}
