use std::fmt;
use std::sync::Arc;

use super::language::LanguageDetector;
use super::sentence::{IntoSentences, Sentences};
use super::word::Words;

/// Text returned by the OCR engine for a single image.
///
/// The text is immutable once produced and is shared by reference between the
/// iterators that read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    text: Arc<str>,
}

impl RecognitionResult {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whitespace-delimited tokens, each tagged with its detected language.
    pub fn words<'a>(&'a self, detector: &'a LanguageDetector) -> Words<'a> {
        Words::new(&self.text, detector)
    }

    pub fn sentences(&self) -> Sentences<'_> {
        Sentences::new(&self.text)
    }

    /// Owned sentence iterator, for handing the result to another task.
    pub fn into_sentences(self) -> IntoSentences {
        IntoSentences::new(self.text)
    }
}

impl From<String> for RecognitionResult {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for RecognitionResult {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for RecognitionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
