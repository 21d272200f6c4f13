use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;

/// Upper bound on an image handed to the OCR engine (50 MiB).
pub const DEFAULT_MAX_IMAGE_SIZE: usize = 50 * 1024 * 1024;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

fn parse_list(var: &str, default: &[&str]) -> Vec<String> {
    match env::var(var) {
        Ok(val) if !val.trim().is_empty() => val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => default.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ocr: OcrConfig,
    pub scan: ScanConfig,
    pub text: TextConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language codes joined with `+`, e.g. `eng+pol`.
    pub languages: String,
    pub max_image_size: usize,
    /// Grayscale/contrast pass before recognition.
    pub preprocess: bool,
    pub max_image_dimension: u32,
    pub min_image_dimension: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub workers: usize,
    /// Capacity of the bounded output channel.
    pub buffer: usize,
    /// Deadline for a whole directory scan. Checked between tasks.
    pub timeout_secs: Option<u64>,
    pub failure_policy: FailurePolicy,
}

/// What a directory scan does when one image fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report the failure and keep scanning sibling images.
    #[default]
    Continue,
    /// Cancel outstanding work on the first failure.
    FailFast,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "continue" => Ok(Self::Continue),
            "fail_fast" => Ok(Self::FailFast),
            other => Err(format!("unknown failure policy '{other}'")),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::FailFast => write!(f, "fail_fast"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    /// ISO 639-3 codes the language detector may choose from.
    pub languages: Vec<String>,
    /// Detections below this confidence are tagged unknown. The default of
    /// zero tags every token that has letters with its best candidate;
    /// tokens without a detectable script are unknown at any threshold.
    pub min_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: "eng".to_string(),
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            preprocess: false,
            max_image_dimension: 4096,
            min_image_dimension: 16,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            buffer: 64,
            timeout_secs: None,
            failure_policy: FailurePolicy::Continue,
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            languages: ["eng", "pol", "deu", "fra", "spa"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_confidence: 0.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let text_defaults = TextConfig::default();
        let default_langs: Vec<&str> = text_defaults.languages.iter().map(String::as_str).collect();

        Self {
            server: ServerConfig {
                host: env::var("WCRACK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: parse_env_or("WCRACK_PORT", 8080),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:wcrack.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
            },
            ocr: OcrConfig {
                languages: env::var("OCR_LANGUAGES").unwrap_or_else(|_| "eng".to_string()),
                max_image_size: parse_env_or("OCR_MAX_IMAGE_SIZE", DEFAULT_MAX_IMAGE_SIZE),
                preprocess: parse_env_or("OCR_PREPROCESS", false),
                max_image_dimension: parse_env_or("OCR_MAX_DIMENSION", 4096),
                min_image_dimension: parse_env_or("OCR_MIN_DIMENSION", 16),
            },
            scan: ScanConfig {
                workers: parse_env_or("SCAN_WORKERS", default_workers()),
                buffer: parse_env_or("SCAN_BUFFER", 64),
                timeout_secs: parse_env_opt("SCAN_TIMEOUT_SECS"),
                failure_policy: parse_env_or("SCAN_FAILURE_POLICY", FailurePolicy::Continue),
            },
            text: TextConfig {
                languages: parse_list("TEXT_LANGUAGES", &default_langs),
                min_confidence: parse_env_or("TEXT_MIN_CONFIDENCE", 0.0),
            },
            output: OutputConfig {
                dir: env::var("WCRACK_OUTPUT_DIR").unwrap_or_else(|_| "./output".to_string()),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Environment defaults, overlaid with a YAML/TOML/JSON file when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::from_env();
        let Some(path) = path else {
            return Ok(defaults);
        };

        tracing::debug!(path = %path.display(), "Loading config file");
        let merged = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::from(path))
            .build()?;

        Ok(merged.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    #[serial]
    fn test_scan_config_defaults() {
        std::env::remove_var("SCAN_BUFFER");
        std::env::remove_var("SCAN_FAILURE_POLICY");
        std::env::remove_var("SCAN_TIMEOUT_SECS");

        let config = Config::default();
        assert!(config.scan.workers >= 1);
        assert_eq!(config.scan.buffer, 64);
        assert!(config.scan.timeout_secs.is_none());
        assert_eq!(config.scan.failure_policy, FailurePolicy::Continue);
    }

    #[test]
    #[serial]
    fn test_scan_config_from_env() {
        std::env::set_var("SCAN_WORKERS", "3");
        std::env::set_var("SCAN_BUFFER", "8");
        std::env::set_var("SCAN_TIMEOUT_SECS", "30");
        std::env::set_var("SCAN_FAILURE_POLICY", "fail-fast");

        let config = Config::default();
        assert_eq!(config.scan.workers, 3);
        assert_eq!(config.scan.buffer, 8);
        assert_eq!(config.scan.timeout_secs, Some(30));
        assert_eq!(config.scan.failure_policy, FailurePolicy::FailFast);

        std::env::remove_var("SCAN_WORKERS");
        std::env::remove_var("SCAN_BUFFER");
        std::env::remove_var("SCAN_TIMEOUT_SECS");
        std::env::remove_var("SCAN_FAILURE_POLICY");
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_falls_back() {
        std::env::set_var("SCAN_BUFFER", "lots");
        let config = Config::default();
        assert_eq!(config.scan.buffer, 64);
        std::env::remove_var("SCAN_BUFFER");
    }

    #[test]
    #[serial]
    fn test_text_languages_from_env() {
        std::env::set_var("TEXT_LANGUAGES", "eng, pol,,");
        let config = Config::default();
        assert_eq!(config.text.languages, vec!["eng", "pol"]);
        std::env::remove_var("TEXT_LANGUAGES");
    }

    #[test]
    #[serial]
    fn test_load_without_file_uses_env() {
        std::env::remove_var("WCRACK_PORT");
        let config = Config::load(None).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ocr.max_image_size, DEFAULT_MAX_IMAGE_SIZE);
    }

    #[test]
    #[serial]
    fn test_load_file_overrides_defaults() {
        std::env::remove_var("WCRACK_PORT");
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "server:\n  port: 9999\nscan:\n  workers: 2\n  failure_policy: fail_fast\n"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.scan.workers, 2);
        assert_eq!(config.scan.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.ocr.languages, "eng");
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!("continue".parse::<FailurePolicy>(), Ok(FailurePolicy::Continue));
        assert_eq!("FAIL_FAST".parse::<FailurePolicy>(), Ok(FailurePolicy::FailFast));
        assert!("maybe".parse::<FailurePolicy>().is_err());
    }
}
