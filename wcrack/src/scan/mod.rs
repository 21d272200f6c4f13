//! Scan scheduling: single images and directories fanned out over a fixed
//! worker pool, merged into one bounded stream.

mod collect;
mod event;
mod scanner;
mod summary;

pub use collect::collect_words;
pub use event::{ScanEvent, ScanFailure, ScanTask};
pub use scanner::{load_image, ScanStream, Scanner};
pub use summary::ScanSummary;
