use std::fmt;

use crate::text::Sentence;

use super::event::{ScanEvent, ScanFailure};

/// Outcome of a scan: "N of M images succeeded" plus the failures.
#[derive(Debug, Default)]
pub struct ScanSummary {
    pub total: usize,
    pub succeeded: usize,
    pub sentences: usize,
    pub failures: Vec<ScanFailure>,
}

impl ScanSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Records `event` and hands back its sentence, if it carried one.
    pub fn observe(&mut self, event: ScanEvent) -> Option<Sentence> {
        match event {
            ScanEvent::Sentence { sentence, .. } => {
                self.sentences += 1;
                Some(sentence)
            }
            ScanEvent::Completed { .. } => {
                self.succeeded += 1;
                None
            }
            ScanEvent::Failed(failure) => {
                self.failures.push(failure);
                None
            }
        }
    }

    /// Images that were neither completed nor failed, e.g. after cancellation.
    pub fn skipped(&self) -> usize {
        self.total
            .saturating_sub(self.succeeded)
            .saturating_sub(self.failures.len())
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.skipped() == 0
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} images succeeded ({} sentences)",
            self.succeeded, self.total, self.sentences
        )?;
        if self.skipped() > 0 {
            write!(f, ", {} not processed", self.skipped())?;
        }
        for failure in &self.failures {
            write!(f, "\n  failed: {failure}")?;
        }
        Ok(())
    }
}
