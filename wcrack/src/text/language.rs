use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;
use whatlang::{Detector, Lang};

use crate::config::TextConfig;

/// Detected language of a word. `Unknown` when detection was inconclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    Known(Lang),
    #[default]
    Unknown,
}

impl Language {
    /// ISO 639-3 code, or `"unknown"`.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Known(lang) => lang.code(),
            Language::Unknown => "unknown",
        }
    }

    pub fn from_code(code: &str) -> Self {
        Lang::from_code(code.trim().to_lowercase())
            .map(Language::Known)
            .unwrap_or(Language::Unknown)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Language::from_code(&code))
    }
}

/// Tags tokens with a language restricted to a configured candidate set.
pub struct LanguageDetector {
    detector: Detector,
    min_confidence: f64,
}

impl LanguageDetector {
    pub fn new(config: &TextConfig) -> Self {
        let mut allowlist = Vec::with_capacity(config.languages.len());
        for code in &config.languages {
            match Lang::from_code(code.trim().to_lowercase()) {
                Some(lang) => allowlist.push(lang),
                None => warn!(code = %code, "Ignoring unknown language code"),
            }
        }

        let detector = if allowlist.is_empty() {
            Detector::new()
        } else {
            Detector::with_allowlist(allowlist)
        };

        Self {
            detector,
            min_confidence: config.min_confidence,
        }
    }

    pub fn detect(&self, text: &str) -> Language {
        match self.detector.detect(text) {
            Some(info) if info.confidence() >= self.min_confidence => Language::Known(info.lang()),
            _ => Language::Unknown,
        }
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new(&TextConfig::default())
    }
}

impl fmt::Debug for LanguageDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageDetector")
            .field("min_confidence", &self.min_confidence)
            .finish_non_exhaustive()
    }
}
