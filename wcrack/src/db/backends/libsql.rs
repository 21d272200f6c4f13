use async_trait::async_trait;

use crate::db::connection::Database;
use crate::db::repository::{BatchRepository, WordRepository};
use crate::db::traits::{BatchStore, DatabaseBackend, WordStore};
use crate::error::Result;
use crate::models::{BatchWord, Page, WordBatch, WordFrequency, WordRanking, WordRow};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WordStore for LibSqlBackend {
    async fn create_word(&self, value: &str, batch_id: Option<i64>) -> Result<WordRow> {
        let conn = self.db.connect()?;
        WordRepository::create(&conn, value, batch_id).await
    }
    async fn list_words(&self, page: Page) -> Result<Vec<WordRow>> {
        let conn = self.db.connect()?;
        WordRepository::list(&conn, page).await
    }
    async fn list_word_frequencies(&self, page: Page) -> Result<Vec<WordFrequency>> {
        let conn = self.db.connect()?;
        WordRepository::frequencies(&conn, page).await
    }
    async fn list_word_rankings(&self, page: Page) -> Result<Vec<WordRanking>> {
        let conn = self.db.connect()?;
        WordRepository::rankings(&conn, page).await
    }
    async fn list_words_by_batch_name(&self, name: &str) -> Result<Vec<BatchWord>> {
        let conn = self.db.connect()?;
        WordRepository::list_by_batch_name(&conn, name).await
    }
}

#[async_trait]
impl BatchStore for LibSqlBackend {
    async fn create_word_batch(&self, name: &str) -> Result<WordBatch> {
        let conn = self.db.connect()?;
        BatchRepository::create(&conn, name).await
    }
    async fn create_words_batch(&self, name: &str, values: &[String]) -> Result<(WordBatch, u64)> {
        let conn = self.db.connect()?;
        BatchRepository::create_with_words(&conn, name, values).await
    }
    async fn list_word_batches(&self, page: Page) -> Result<Vec<WordBatch>> {
        let conn = self.db.connect()?;
        BatchRepository::list(&conn, page).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn ping(&self) -> Result<()> {
        let conn = self.db.connect()?;
        let mut rows = conn.query("SELECT 1", ()).await?;
        rows.next().await?;
        Ok(())
    }

    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }
}
