//! Replacement run accounting.
//!
//! A [`RunReport`] accumulates the outcome of one replacement run. It is
//! turned into the persisted [`ReportFile`] shape when the run finishes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{ContentItem, LessonInfo};
use crate::validate::ValidationVerdict;

/// An item that failed validation, paired with its verdict.
#[derive(Debug, Clone, Serialize)]
pub struct FlaggedItem {
    pub item: ContentItem,
    pub verdict: ValidationVerdict,
}

/// Text of an item before replacement.
#[derive(Debug, Clone, Serialize)]
pub struct OriginalText {
    pub english: String,
    pub albanian: String,
    pub issues: Vec<String>,
}

/// Text written in place of the original.
#[derive(Debug, Clone, Serialize)]
pub struct ReplacementText {
    pub english: String,
    pub albanian: String,
    pub validation_score: u32,
    /// Unit the replacement was drawn from after any escalation.
    pub unit_number: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplacementLogEntry {
    pub id: String,
    pub lesson_id: String,
    pub lesson_info: Option<LessonInfo>,
    pub target_unit: u32,
    pub original: OriginalText,
    pub replacement: ReplacementText,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplacementFailure {
    pub id: String,
    pub error: String,
    pub original_text: String,
}

/// Outcome of one replacement run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub success_count: usize,
    pub failure_count: usize,
    pub total_processed: usize,
    pub replacement_log: Vec<ReplacementLogEntry>,
    pub errors: Vec<ReplacementFailure>,
    pub replacements_by_unit: BTreeMap<u32, usize>,
}

impl RunReport {
    pub fn record_success(&mut self, entry: ReplacementLogEntry) {
        self.success_count += 1;
        self.total_processed += 1;
        *self.replacements_by_unit.entry(entry.target_unit).or_insert(0) += 1;
        self.replacement_log.push(entry);
    }

    pub fn record_failure(&mut self, failure: ReplacementFailure) {
        self.failure_count += 1;
        self.total_processed += 1;
        self.errors.push(failure);
    }

    /// Fold another report into this one.
    /// Percentage of attempted items that were replaced; `None` when nothing
    /// was attempted.
    pub fn success_rate(&self) -> Option<f64> {
        let attempted = self.replacement_log.len() + self.errors.len();
        if attempted == 0 {
            None
        } else {
            Some(self.replacement_log.len() as f64 / attempted as f64 * 100.0)
        }
    }

    pub fn to_file(&self, generated_at: DateTime<Utc>) -> ReportFile {
        ReportFile {
            generated_at,
            summary: ReportSummary {
                total_replacements: self.replacement_log.len(),
                total_errors: self.errors.len(),
                success_rate: self.success_rate(),
            },
            replacements_by_unit: self.replacements_by_unit.clone(),
            replacement_log: self.replacement_log.clone(),
            errors: self.errors.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total_replacements: usize,
    pub total_errors: usize,
    pub success_rate: Option<f64>,
}

/// Persisted diagnostic report. Written once per run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportFile {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub replacements_by_unit: BTreeMap<u32, usize>,
    pub replacement_log: Vec<ReplacementLogEntry>,
    pub errors: Vec<ReplacementFailure>,
}
