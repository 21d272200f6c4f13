use tracing::{debug, warn};

use crate::analysis::Analysis;
use crate::error::Result;
use crate::sink::WordSink;
use crate::text::LanguageDetector;

use super::event::ScanEvent;
use super::scanner::ScanStream;
use super::summary::ScanSummary;

/// Drains `stream`, tagging the words of every sentence and handing them to
/// `sink` and `analysis` in arrival order.
///
/// Per-image failures are folded into the summary. A sink error stops the
/// scan; dropping the stream cancels the remaining images.
pub async fn collect_words(
    mut stream: ScanStream,
    detector: &LanguageDetector,
    sink: &mut dyn WordSink,
    analysis: &mut Analysis,
) -> Result<ScanSummary> {
    let mut summary = ScanSummary::new(stream.total());

    while let Some(event) = stream.next_event().await {
        match &event {
            ScanEvent::Failed(failure) => {
                warn!(path = %failure.path.display(), error = %failure.error, "Image failed");
            }
            ScanEvent::Completed { path, sentences } => {
                debug!(path = %path.display(), sentences, "Image completed");
            }
            ScanEvent::Sentence { .. } => {}
        }

        let Some(sentence) = summary.observe(event) else {
            continue;
        };
        for word in sentence.words(detector) {
            sink.insert_word(&word).await?;
            analysis.add_word(&word);
        }
    }

    sink.finish().await?;
    Ok(summary)
}
