//! Recognized text and the lazy views over it.
//!
//! A [`RecognitionResult`] owns the raw text the OCR engine produced. Words
//! and sentences are computed on demand while iterating, so consumers can
//! start working before the whole text has been walked.

mod language;
mod result;
mod sentence;
mod word;

pub use language::{Language, LanguageDetector};
pub use result::RecognitionResult;
pub use sentence::{IntoSentences, Sentence, Sentences};
pub use word::{Word, Words};
pub(crate) use word::normalize;
