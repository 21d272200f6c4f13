use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::SplitWhitespace;

use serde::{Deserialize, Serialize};

use super::language::{Language, LanguageDetector};

/// Punctuation stripped from both ends of a token.
const EDGE_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '"', '\'', '(', ')', '[', ']', '{', '}', '«', '»', '“', '”',
    '„', '‘', '’', '…',
];

/// A token from recognized text.
///
/// Two words are equal when their values are equal; the language tag is
/// metadata and does not take part in comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub value: String,
    pub lang: Language,
}

impl Word {
    pub fn new(value: impl Into<String>, lang: Language) -> Self {
        Self {
            value: value.into(),
            lang,
        }
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Word {}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Strips surrounding punctuation. A token made only of punctuation is kept
/// as-is so no non-whitespace input is lost.
pub(crate) fn normalize(token: &str) -> &str {
    let trimmed = token.trim_matches(EDGE_PUNCTUATION);
    if trimmed.is_empty() {
        token
    } else {
        trimmed
    }
}

/// Lazy word iterator over borrowed text.
pub struct Words<'a> {
    tokens: SplitWhitespace<'a>,
    detector: &'a LanguageDetector,
}

impl<'a> Words<'a> {
    pub fn new(text: &'a str, detector: &'a LanguageDetector) -> Self {
        Self {
            tokens: text.split_whitespace(),
            detector,
        }
    }
}

impl Iterator for Words<'_> {
    type Item = Word;

    fn next(&mut self) -> Option<Word> {
        let token = self.tokens.next()?;
        let value = normalize(token);
        Some(Word::new(value, self.detector.detect(value)))
    }
}
