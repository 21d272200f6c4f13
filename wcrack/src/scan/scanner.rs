use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, debug_span, info, info_span, warn, Instrument};

use crate::config::{FailurePolicy, ScanConfig};
use crate::error::{Result, WcrackError};
use crate::ocr::{engine_task_failed, Image, OcrClient, OcrProvider};
use crate::text::{IntoSentences, RecognitionResult, Sentence};

use super::event::{ScanEvent, ScanFailure, ScanTask};
use super::summary::ScanSummary;

/// Runs validate, OCR and sentence splitting over one image or a directory.
#[derive(Clone)]
pub struct Scanner {
    ocr: OcrProvider,
    config: ScanConfig,
}

impl Scanner {
    /// Fails with an exhaustion error when the pool or the output channel
    /// would have no capacity.
    pub fn new(ocr: OcrProvider, config: &ScanConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(WcrackError::Exhaustion(
                "scan.workers must be at least 1".to_string(),
            ));
        }
        if config.buffer == 0 {
            return Err(WcrackError::Exhaustion(
                "scan.buffer must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            ocr,
            config: config.clone(),
        })
    }

    /// Scans a single image. Any validation or OCR failure fails the call.
    pub async fn scan_image(&self, path: impl AsRef<Path>) -> Result<IntoSentences> {
        let path = path.as_ref();
        let image = load_image(path, self.ocr.max_image_size()).await?;
        let result = self
            .ocr
            .recognize(image)
            .instrument(debug_span!("scan_image", path = %path.display()))
            .await?;
        Ok(result.into_sentences())
    }

    /// Scans every non-directory entry of `dir` on the worker pool.
    ///
    /// Per-image failures are reported on the stream. Only a failure to list
    /// the directory fails the call.
    pub async fn scan_images(
        &self,
        dir: impl AsRef<Path>,
        cancel: CancellationToken,
    ) -> Result<ScanStream> {
        let dir = dir.as_ref();
        let tasks = list_tasks(dir).await?;
        info!(
            dir = %dir.display(),
            images = tasks.len(),
            workers = self.config.workers.min(tasks.len()),
            "Starting directory scan"
        );
        Ok(self.spawn(tasks, cancel))
    }

    /// Scans a file or a directory through the same streaming interface.
    pub async fn scan_path(
        &self,
        path: impl AsRef<Path>,
        cancel: CancellationToken,
    ) -> Result<ScanStream> {
        let path = path.as_ref();
        if tokio::fs::metadata(path).await?.is_dir() {
            return self.scan_images(path, cancel).await;
        }

        let task = ScanTask {
            index: 0,
            path: path.to_path_buf(),
        };
        Ok(self.spawn(vec![task], cancel))
    }

    fn spawn(&self, tasks: Vec<ScanTask>, cancel: CancellationToken) -> ScanStream {
        let total = tasks.len();
        let token = cancel.child_token();
        let (tx, rx) = mpsc::channel(self.config.buffer);
        let queue = Arc::new(Mutex::new(VecDeque::from(tasks)));

        if let Some(secs) = self.config.timeout_secs {
            let deadline = token.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = deadline.cancelled() => {}
                    _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                        warn!(timeout_secs = secs, "Scan deadline reached, cancelling remaining images");
                        deadline.cancel();
                    }
                }
            });
        }

        for id in 0..self.config.workers.min(total) {
            let worker = Worker {
                ocr: self.ocr.clone(),
                policy: self.config.failure_policy,
                queue: queue.clone(),
                tx: tx.clone(),
                token: token.clone(),
            };
            tokio::spawn(worker.run().instrument(info_span!("scan_worker", worker = id)));
        }

        ScanStream {
            rx,
            total,
            token: token.clone(),
            _guard: token.drop_guard(),
        }
    }
}

struct Worker {
    ocr: OcrProvider,
    policy: FailurePolicy,
    queue: Arc<Mutex<VecDeque<ScanTask>>>,
    tx: mpsc::Sender<ScanEvent>,
    token: CancellationToken,
}

impl Worker {
    async fn run(self) {
        // Created on first use and kept for every image this worker handles.
        let mut client: Option<OcrClient> = None;

        while let Some(task) = self.claim() {
            let span = debug_span!("scan_image", index = task.index, path = %task.path.display());
            let (returned, outcome) = self.process(&task.path, client.take()).instrument(span).await;
            client = returned;

            let keep_going = match outcome {
                Ok(result) => self.emit(Arc::from(task.path.as_path()), result).await,
                Err(error) => self.report(task.path, error).await,
            };
            if !keep_going {
                break;
            }
        }

        debug!(cancelled = self.token.is_cancelled(), "Worker exiting");
    }

    fn claim(&self) -> Option<ScanTask> {
        if self.token.is_cancelled() {
            return None;
        }
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }

    async fn process(
        &self,
        path: &Path,
        client: Option<OcrClient>,
    ) -> (Option<OcrClient>, Result<RecognitionResult>) {
        let image = match load_image(path, self.ocr.max_image_size()).await {
            Ok(image) => image,
            Err(e) => return (client, Err(e)),
        };

        let ocr = self.ocr.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let mut client = match client {
                Some(client) => client,
                None => match ocr.new_client() {
                    Ok(client) => client,
                    Err(e) => return (None, Err(e)),
                },
            };
            let result = client.run(&image);
            (Some(client), result)
        })
        .await;

        joined.unwrap_or_else(|e| (None, Err(engine_task_failed(e))))
    }

    async fn emit(&self, path: Arc<Path>, result: RecognitionResult) -> bool {
        let mut sentences = 0;
        for sentence in result.sentences() {
            let event = ScanEvent::Sentence {
                path: path.clone(),
                sentence,
            };
            if !self.send(event).await {
                return false;
            }
            sentences += 1;
        }

        debug!(sentences, "Image scanned");
        self.send(ScanEvent::Completed { path, sentences }).await
    }

    async fn report(&self, path: PathBuf, error: WcrackError) -> bool {
        warn!(kind = ?error.kind(), error = %error, "Image failed");
        let event = ScanEvent::Failed(ScanFailure { path, error });

        if self.policy == FailurePolicy::FailFast {
            // The failure is delivered before siblings are told to stop.
            let _ = self.tx.send(event).await;
            self.token.cancel();
            return false;
        }

        self.send(event).await
    }

    /// Waits for channel capacity unless the scan is cancelled first.
    async fn send(&self, event: ScanEvent) -> bool {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => false,
            sent = self.tx.send(event) => sent.is_ok(),
        }
    }
}

/// Events of a running scan. Dropping the stream cancels outstanding work.
pub struct ScanStream {
    rx: mpsc::Receiver<ScanEvent>,
    total: usize,
    token: CancellationToken,
    _guard: DropGuard,
}

impl ScanStream {
    /// Number of images queued.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Stops dispatching new images. In-flight OCR calls finish first.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn next_event(&mut self) -> Option<ScanEvent> {
        self.rx.recv().await
    }

    /// Consumes the whole stream.
    pub async fn drain(mut self) -> (Vec<Sentence>, ScanSummary) {
        let mut summary = ScanSummary::new(self.total);
        let mut sentences = Vec::new();
        while let Some(event) = self.rx.recv().await {
            if let Some(sentence) = summary.observe(event) {
                sentences.push(sentence);
            }
        }
        (sentences, summary)
    }
}

impl Stream for ScanStream {
    type Item = ScanEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<ScanEvent>> {
        self.rx.poll_recv(cx)
    }
}

/// Reads an image from disk, bounded by `max_size`.
///
/// Content is validated before the size limit is enforced, so a large text
/// file is reported as unsupported content.
pub async fn load_image(path: &Path, max_size: usize) -> Result<Image> {
    let file = tokio::fs::File::open(path).await?;
    let size = file.metadata().await?.len();

    let limit = u64::try_from(max_size).unwrap_or(u64::MAX);
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .await?;

    let image = Image::new(bytes)?;
    if size > limit || image.len() > max_size {
        return Err(WcrackError::ImageTooLarge {
            size: usize::try_from(size).unwrap_or(usize::MAX),
            max: max_size,
        });
    }
    Ok(image)
}

async fn list_tasks(dir: &Path) -> Result<Vec<ScanTask>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| ScanTask { index, path })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OcrConfig;
    use crate::error::ErrorKind;
    use crate::ocr::{EngineFactory, OcrEngine};

    struct NeverFactory;

    impl EngineFactory for NeverFactory {
        fn create(&self) -> Result<Box<dyn OcrEngine>> {
            Err(WcrackError::OcrUnavailable("no engine in unit tests".into()))
        }

        fn name(&self) -> &str {
            "never"
        }
    }

    struct CrashingEngine;

    impl OcrEngine for CrashingEngine {
        fn recognize(&mut self, _image: &[u8]) -> Result<String> {
            panic!("engine crashed");
        }
    }

    struct CrashingFactory;

    impl EngineFactory for CrashingFactory {
        fn create(&self) -> Result<Box<dyn OcrEngine>> {
            Ok(Box::new(CrashingEngine))
        }

        fn name(&self) -> &str {
            "crashing"
        }
    }

    fn provider() -> OcrProvider {
        OcrProvider::with_factory(Arc::new(NeverFactory), &OcrConfig::default())
    }

    fn write_png(dir: &Path, name: &str) {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(b"Hello.");
        std::fs::write(dir.join(name), &bytes).unwrap();
    }

    #[test]
    fn test_zero_workers_is_exhaustion() {
        let config = ScanConfig {
            workers: 0,
            ..ScanConfig::default()
        };
        let err = Scanner::new(provider(), &config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Exhaustion);
    }

    #[test]
    fn test_zero_buffer_is_exhaustion() {
        let config = ScanConfig {
            buffer: 0,
            ..ScanConfig::default()
        };
        let err = Scanner::new(provider(), &config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Exhaustion);
    }

    #[tokio::test]
    async fn test_load_image_rejects_text_before_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain words ".repeat(100)).unwrap();

        let err = load_image(&path, 16).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_load_image_rejects_oversize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.resize(100, 0);
        std::fs::write(&path, &bytes).unwrap();

        let err = load_image(&path, 64).await.unwrap_err();
        assert!(matches!(err, WcrackError::ImageTooLarge { size: 100, max: 64 }));
    }

    #[tokio::test]
    async fn test_list_tasks_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.png"), b"x").unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();

        let tasks = list_tasks(dir.path()).await.unwrap();
        let names: Vec<_> = tasks
            .iter()
            .map(|t| t.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
        assert_eq!(tasks[1].index, 1);
    }

    #[tokio::test]
    async fn test_empty_directory_finishes_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = Scanner::new(provider(), &ScanConfig::default()).unwrap();

        let stream = scanner
            .scan_images(dir.path(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(stream.total(), 0);

        let (sentences, summary) = stream.drain().await;
        assert!(sentences.is_empty());
        assert!(summary.is_success());
    }

    #[tokio::test]
    async fn test_missing_directory_is_io_error() {
        let scanner = Scanner::new(provider(), &ScanConfig::default()).unwrap();
        let err = scanner
            .scan_images("/definitely/not/here", CancellationToken::new())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[tokio::test]
    async fn test_unavailable_engine_is_reported_per_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(b"Hello.");
        std::fs::write(dir.path().join("one.png"), &bytes).unwrap();

        let scanner = Scanner::new(provider(), &ScanConfig::default()).unwrap();
        let stream = scanner
            .scan_images(dir.path(), CancellationToken::new())
            .await
            .unwrap();
        let (_, summary) = stream.drain().await;

        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].kind(), ErrorKind::Engine);
    }

    #[tokio::test]
    async fn test_crashed_worker_recognition_is_engine_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "one.png");

        let provider = OcrProvider::with_factory(Arc::new(CrashingFactory), &OcrConfig::default());
        let scanner = Scanner::new(provider, &ScanConfig::default()).unwrap();
        let (_, summary) = scanner
            .scan_images(dir.path(), CancellationToken::new())
            .await
            .unwrap()
            .drain()
            .await;

        assert_eq!(summary.failures.len(), 1);
        assert!(matches!(summary.failures[0].error, WcrackError::Ocr(_)));
        assert_eq!(summary.failures[0].kind(), ErrorKind::Engine);
    }

    #[tokio::test]
    async fn test_dropping_stream_cancels_its_token_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            write_png(dir.path(), name);
        }

        let parent = CancellationToken::new();
        let scanner = Scanner::new(provider(), &ScanConfig::default()).unwrap();
        let stream = scanner.scan_images(dir.path(), parent.clone()).await.unwrap();
        let token = stream.token.clone();
        assert!(!token.is_cancelled());

        drop(stream);
        assert!(token.is_cancelled());
        assert!(!parent.is_cancelled());
    }
}
