use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BatchWord, Page, WordBatch, WordFrequency, WordRanking, WordRow};

/// Word persistence and aggregate queries. Soft-deleted rows never appear.
#[async_trait]
pub trait WordStore: Send + Sync {
    async fn create_word(&self, value: &str, batch_id: Option<i64>) -> Result<WordRow>;
    async fn list_words(&self, page: Page) -> Result<Vec<WordRow>>;
    async fn list_word_frequencies(&self, page: Page) -> Result<Vec<WordFrequency>>;
    async fn list_word_rankings(&self, page: Page) -> Result<Vec<WordRanking>>;
    async fn list_words_by_batch_name(&self, name: &str) -> Result<Vec<BatchWord>>;
}

#[async_trait]
pub trait BatchStore: Send + Sync {
    async fn create_word_batch(&self, name: &str) -> Result<WordBatch>;
    /// All-or-nothing insert of a named batch and its words.
    async fn create_words_batch(&self, name: &str, values: &[String]) -> Result<(WordBatch, u64)>;
    async fn list_word_batches(&self, page: Page) -> Result<Vec<WordBatch>>;
}

#[async_trait]
pub trait DatabaseBackend: WordStore + BatchStore {
    /// Cheap round trip used by health checks.
    async fn ping(&self) -> Result<()>;

    /// Sync with remote (e.g. Turso replication). No-op for local-only backends.
    async fn sync(&self) -> Result<()>;
}
