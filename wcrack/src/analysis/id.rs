use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WcrackError};

const ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Identifier of one analysis run: `YYYYMMDD_HHMMSS_<random>[_suffix]`.
///
/// Sorts by creation time; the random part keeps runs started in the same
/// second apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(String);

impl AnalysisId {
    pub fn new() -> Result<Self> {
        Self::with_suffix(None)
    }

    pub fn with_suffix(suffix: Option<&str>) -> Result<Self> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| WcrackError::Internal(format!("system clock is before the epoch: {e}")))?;
        let secs = i64::try_from(elapsed.as_secs())
            .map_err(|_| WcrackError::Internal("system clock out of range".to_string()))?;
        let now: DateTime<Utc> = DateTime::from_timestamp(secs, elapsed.subsec_nanos())
            .ok_or_else(|| WcrackError::Internal("system clock out of range".to_string()))?;

        let mut id = format!("{}_{}", now.format("%Y%m%d_%H%M%S"), nanoid!(8, &ALPHABET));

        if let Some(suffix) = suffix.map(str::trim).filter(|s| !s.is_empty()) {
            if !suffix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(WcrackError::Validation(format!(
                    "analysis id suffix '{suffix}' may only contain letters, digits, '-' and '_'"
                )));
            }
            id.push('_');
            id.push_str(suffix);
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AnalysisId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
