use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::analysis::AnalysisId;
use crate::error::Result;
use crate::text::Word;

use super::WordSink;

/// Append-only text file, one word per line.
///
/// The file is named after the analysis id and is never reused: opening an
/// existing path fails.
pub struct FileSink {
    file: File,
    path: PathBuf,
    written: u64,
}

impl FileSink {
    pub async fn create(dir: impl AsRef<Path>, id: &AnalysisId) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;

        let path = dir.join(format!("{id}.txt"));
        let file = OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(&path)
            .await?;

        info!(path = %path.display(), "Writing words to file");
        Ok(Self {
            file,
            path,
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl WordSink for FileSink {
    async fn insert_word(&mut self, word: &Word) -> Result<()> {
        let mut line = String::with_capacity(word.value.len() + 1);
        line.push_str(&word.value);
        line.push('\n');

        self.file.write_all(line.as_bytes()).await?;
        self.file.flush().await?;
        self.written += 1;
        Ok(())
    }

    fn written(&self) -> u64 {
        self.written
    }

    async fn finish(&mut self) -> Result<()> {
        self.file.sync_all().await?;
        Ok(())
    }
}
