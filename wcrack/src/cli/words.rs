use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Subcommand;
use tokio_util::sync::CancellationToken;

use crate::analysis::{Analysis, AnalysisId};
use crate::config::Config;
use crate::models::Page;
use crate::ocr::OcrProvider;
use crate::scan::{collect_words, Scanner};
use crate::sink::{DatabaseSink, WordSink};
use crate::text::{normalize, LanguageDetector};

use super::open_database;

/// Most occurrences `add-many` will insert from one analysis.
const MAX_EXPANDED_WORDS: u64 = 10_000_000;

#[derive(Debug, Subcommand)]
pub enum WordsCommand {
    /// List stored words in alphabetical order
    List {
        /// Maximum number of words to print
        limit: Option<u32>,
    },
    /// Store a single word
    Add {
        word: String,
    },
    /// Store every word of a .txt file or a serialized .json analysis
    AddMany {
        file: PathBuf,
    },
    /// Print the most frequent stored words
    Frequency {
        #[arg(default_value_t = 30)]
        limit: u32,
    },
    /// Extract words from screenshots straight into the database
    Scan {
        /// Screenshot file or a directory of screenshots
        #[arg(long)]
        path: PathBuf,
    },
}

pub(super) async fn run(
    cmd: WordsCommand,
    config: &Config,
    verbose: bool,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let db = open_database(config).await?;

    match cmd {
        WordsCommand::List { limit } => {
            let page = Page::new(limit.unwrap_or(u32::MAX), 0);
            for word in db.list_words(page).await? {
                println!("{}\t{}", word.id, word.value);
            }
        }
        WordsCommand::Add { word } => {
            let value = word.trim();
            if value.is_empty() {
                bail!("word must not be blank");
            }
            let row = db.create_word(value, None).await?;
            tracing::info!(id = row.id, word = %row.value, "Inserted word");
            println!("{}\t{}", row.id, row.value);
        }
        WordsCommand::AddMany { file } => {
            let analysis = read_analysis(&file).await?;
            if verbose {
                for (word, count) in analysis.top(analysis.len()) {
                    println!("WORD: {word}, FREQUENCY: {count}");
                }
            }

            let values = expand(&analysis)?;
            let (batch, count) = db.create_words_batch(analysis.id.as_str(), &values).await?;
            tracing::info!(batch = %batch.name, count, "Inserted words");
            println!("{count} words stored in batch {}", batch.name);
        }
        WordsCommand::Frequency { limit } => {
            for row in db.list_word_frequencies(Page::new(limit, 0)).await? {
                println!("{:>8}  {}", row.total, row.value);
            }
        }
        WordsCommand::Scan { path } => {
            let is_dir = tokio::fs::metadata(&path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?
                .is_dir();
            let id = AnalysisId::with_suffix(is_dir.then_some("dir"))?;

            let ocr = OcrProvider::new(&config.ocr);
            if !ocr.is_available() {
                bail!("OCR engine is not available; install Tesseract with the configured languages");
            }
            let scanner = Scanner::new(ocr, &config.scan)?;
            let detector = LanguageDetector::new(&config.text);

            let mut sink = DatabaseSink::with_batch(db.clone(), id.as_str()).await?;
            let mut analysis = Analysis::new(id);
            let stream = scanner.scan_path(&path, shutdown).await?;
            let summary = collect_words(stream, &detector, &mut sink, &mut analysis).await?;

            println!("{summary}");
            println!(
                "{} words stored in batch {}",
                sink.written(),
                analysis.id
            );
            if summary.total > 0 && summary.succeeded == 0 {
                bail!("no image could be processed");
            }
        }
    }

    Ok(())
}

/// Loads an analysis from a `.json` dump or counts the whitespace tokens of a
/// `.txt` file into a fresh one.
pub(crate) async fn read_analysis(path: &Path) -> anyhow::Result<Analysis> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("json") => {
            let data = tokio::fs::read(path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            let analysis: Analysis = serde_json::from_slice(&data)
                .with_context(|| format!("{} is not a serialized analysis", path.display()))?;
            Ok(analysis)
        }
        Some("txt") => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            let mut analysis = Analysis::new(AnalysisId::with_suffix(Some("txt"))?);
            for token in text.split_whitespace() {
                analysis.inc_word_count(normalize(token));
            }
            Ok(analysis)
        }
        _ => bail!(
            "unsupported file {}; expected a .txt or .json file",
            path.display()
        ),
    }
}

/// One value per occurrence, sorted so inserts are deterministic.
///
/// Counts come from user files, so the total is checked before allocating.
fn expand(analysis: &Analysis) -> anyhow::Result<Vec<String>> {
    let total = analysis
        .word_frequency
        .values()
        .try_fold(0u64, |acc, count| acc.checked_add(*count))
        .filter(|total| *total <= MAX_EXPANDED_WORDS)
        .with_context(|| {
            format!("analysis {} holds more than {MAX_EXPANDED_WORDS} words", analysis.id)
        })?;

    let mut words: Vec<(&String, &u64)> = analysis.word_frequency.iter().collect();
    words.sort();

    let mut values = Vec::with_capacity(usize::try_from(total)?);
    for (word, count) in words {
        for _ in 0..*count {
            values.push(word.clone());
        }
    }
    Ok(values)
}
