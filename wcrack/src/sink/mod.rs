//! Destinations for recognized words.

mod database;
mod file;

use async_trait::async_trait;

pub use database::DatabaseSink;
pub use file::FileSink;

use crate::error::Result;
use crate::text::Word;

/// Receives words one at a time, in the order the caller produces them.
#[async_trait]
pub trait WordSink: Send {
    async fn insert_word(&mut self, word: &Word) -> Result<()>;

    /// Number of words accepted so far.
    fn written(&self) -> u64;

    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
