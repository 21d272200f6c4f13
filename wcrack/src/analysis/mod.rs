//! Word frequency aggregation.

mod id;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use id::AnalysisId;

use crate::text::Word;

/// Word counts for one analysis run.
///
/// Counts are keyed by the exact word value; `Hello` and `hello` are
/// separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: AnalysisId,
    #[serde(default)]
    pub word_frequency: HashMap<String, u64>,
}

impl Analysis {
    pub fn new(id: AnalysisId) -> Self {
        Self {
            id,
            word_frequency: HashMap::new(),
        }
    }

    pub fn inc_word_count(&mut self, word: &str) {
        *self.word_frequency.entry(word.to_string()).or_insert(0) += 1;
    }

    pub fn add_word(&mut self, word: &Word) {
        self.inc_word_count(&word.value);
    }

    pub fn count(&self, word: &str) -> u64 {
        self.word_frequency.get(word).copied().unwrap_or(0)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.word_frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_frequency.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.word_frequency.values().sum()
    }

    /// Most frequent words first; ties broken alphabetically.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self
            .word_frequency
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }
}

impl Extend<Word> for Analysis {
    fn extend<I: IntoIterator<Item = Word>>(&mut self, iter: I) {
        for word in iter {
            self.add_word(&word);
        }
    }
}
