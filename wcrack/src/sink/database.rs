use std::sync::Arc;

use async_trait::async_trait;

use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::models::WordBatch;
use crate::text::Word;

use super::WordSink;

/// Inserts each word as its own row, optionally tagged with a batch.
pub struct DatabaseSink {
    db: Arc<dyn DatabaseBackend>,
    batch: Option<WordBatch>,
    written: u64,
}

impl DatabaseSink {
    /// Creates the named batch up front; every word lands in it.
    pub async fn with_batch(db: Arc<dyn DatabaseBackend>, name: &str) -> Result<Self> {
        let batch = db.create_word_batch(name).await?;
        Ok(Self {
            db,
            batch: Some(batch),
            written: 0,
        })
    }

    pub fn batch(&self) -> Option<&WordBatch> {
        self.batch.as_ref()
    }
}

#[async_trait]
impl WordSink for DatabaseSink {
    async fn insert_word(&mut self, word: &Word) -> Result<()> {
        let batch_id = self.batch.as_ref().map(|b| b.id);
        self.db.create_word(&word.value, batch_id).await?;
        self.written += 1;
        Ok(())
    }

    fn written(&self) -> u64 {
        self.written
    }

    async fn finish(&mut self) -> Result<()> {
        self.db.sync().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::{Database, LibSqlBackend};
    use crate::models::Page;
    use crate::text::Language;

    #[tokio::test]
    async fn test_batch_sink_tags_words() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let db = Database::new(&DatabaseConfig {
            url: file.path().display().to_string(),
            auth_token: None,
        })
        .await
        .unwrap();
        let backend: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(db));

        let mut sink = DatabaseSink::with_batch(backend.clone(), "screens_dir")
            .await
            .unwrap();
        for value in ["alpha", "beta"] {
            sink.insert_word(&Word::new(value, Language::Unknown))
                .await
                .unwrap();
        }
        sink.finish().await.unwrap();
        assert_eq!(sink.written(), 2);

        let batch_id = sink.batch().unwrap().id;
        let words = backend.list_words(Page::default()).await.unwrap();
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| w.batch_id == Some(batch_id)));

        let by_name = backend.list_words_by_batch_name("screens_dir").await.unwrap();
        assert_eq!(by_name.len(), 2);
    }
}
