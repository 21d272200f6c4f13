use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ErrorKind, WcrackError};
use crate::text::Sentence;

/// One image queued for scanning.
#[derive(Debug, Clone)]
pub struct ScanTask {
    pub index: usize,
    pub path: PathBuf,
}

/// What a scan stream yields.
///
/// Sentences of one image arrive in source order and are followed by that
/// image's `Completed` event. Events of different images interleave.
#[derive(Debug)]
pub enum ScanEvent {
    Sentence {
        path: Arc<Path>,
        sentence: Sentence,
    },
    Completed {
        path: Arc<Path>,
        sentences: usize,
    },
    Failed(ScanFailure),
}

/// A per-image failure. The scan continues unless the policy is fail-fast.
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: WcrackError,
}

impl ScanFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl fmt::Display for ScanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}
