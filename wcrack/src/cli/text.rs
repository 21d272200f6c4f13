use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::analysis::{Analysis, AnalysisId};
use crate::config::Config;
use crate::ocr::OcrProvider;
use crate::scan::{collect_words, Scanner};
use crate::sink::{FileSink, WordSink};
use crate::text::LanguageDetector;

#[derive(Debug, Args)]
pub struct TextArgs {
    /// Screenshot file or a directory of screenshots
    #[arg(long)]
    pub path: PathBuf,

    /// Output directory [default: output.dir from config]
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub(super) async fn run(
    args: TextArgs,
    config: &Config,
    verbose: bool,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let is_dir = tokio::fs::metadata(&args.path)
        .await
        .with_context(|| format!("cannot read {}", args.path.display()))?
        .is_dir();

    let id = AnalysisId::with_suffix(is_dir.then_some("dir"))?;
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));

    let ocr = OcrProvider::new(&config.ocr);
    if !ocr.is_available() {
        bail!("OCR engine is not available; install Tesseract with the configured languages");
    }
    let scanner = Scanner::new(ocr, &config.scan)?;
    let detector = LanguageDetector::new(&config.text);

    let mut sink = FileSink::create(&out, &id).await?;
    let mut analysis = Analysis::new(id);

    let stream = scanner.scan_path(&args.path, shutdown).await?;
    let summary = collect_words(stream, &detector, &mut sink, &mut analysis).await?;

    tracing::info!(
        analysis_id = %analysis.id,
        words = sink.written(),
        distinct = analysis.len(),
        "Words written"
    );
    println!("{summary}");
    println!("{} words written to {}", sink.written(), sink.path().display());

    if verbose {
        for (word, count) in analysis.top(analysis.len()) {
            println!("WORD: {word}, FREQUENCY: {count}");
        }
    }

    if summary.total > 0 && summary.succeeded == 0 {
        bail!("no image could be processed");
    }
    Ok(())
}
