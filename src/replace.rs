//! Batch scan and replacement of content that fails the quality gate.
//!
//! [`ContentReplacer`] drives a run against any [`ContentStore`]:
//!
//! 1. **Scan**: fetch every item with both texts set and validate it.
//! 2. **Infer unit**: lesson context first (explicit `Unit N` or lesson
//!    topic), then the item's stored unit, then keyword classification.
//! 3. **Generate**: ask the [`ReplacementSource`] for a validated phrase.
//! 4. **Write back**: update the item's two text fields under its id.
//!
//! Items are processed strictly one after another. A failure on one item is
//! recorded in the [`RunReport`] and the run moves on; only a failed scan
//! aborts the run.
//!
//! The `run_*` functions are the CLI entry points for `pgate scan`,
//! `pgate replace`, and `pgate test`.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Duration;

use phrasegate_core::classify::UnitClassifier;
use phrasegate_core::generate::{ContentGenerator, Replacement, ReplacementSource};
use phrasegate_core::models::{ContentItem, LessonInfo};
use phrasegate_core::report::{
    FlaggedItem, OriginalText, ReplacementFailure, ReplacementLogEntry, ReplacementText,
    RunReport,
};
use phrasegate_core::store::ContentStore;
use phrasegate_core::validate::ContentValidator;

use crate::config::Config;
use crate::db;
use crate::progress::{NoProgress, ProgressMode, ReplaceProgressEvent, ReplaceProgressReporter};
use crate::sqlite_store::SqliteContentStore;

/// File name of the persisted run report inside `replace.report_dir`.
pub const REPORT_FILE_NAME: &str = "content_replacement_report.json";

pub struct ContentReplacer<G> {
    source: G,
    validator: ContentValidator,
    classifier: UnitClassifier,
    delay: Duration,
    reporter: Box<dyn ReplaceProgressReporter>,
}

impl<G: ReplacementSource> ContentReplacer<G> {
    pub fn new(source: G, validator: ContentValidator) -> Self {
        Self {
            source,
            validator,
            classifier: UnitClassifier::new(),
            delay: Duration::ZERO,
            reporter: Box::new(NoProgress),
        }
    }

    /// Pause between items to avoid saturating a shared database.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_reporter(mut self, reporter: Box<dyn ReplaceProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn source_mut(&mut self) -> &mut G {
        &mut self.source
    }

    /// Every complete item that fails validation, with its verdict.
    ///
    /// Read-only. Store errors propagate.
    pub async fn scan_for_problems(&self, store: &dyn ContentStore) -> Result<Vec<FlaggedItem>> {
        let items = store
            .fetch_complete_items()
            .await
            .context("Failed to read content items")?;
        let total = items.len();

        let flagged: Vec<FlaggedItem> = items
            .into_iter()
            .filter_map(|item| {
                let target = item.target_text.as_deref()?;
                let verdict = self.validator.validate(&item.source_text, target);
                (!verdict.is_valid).then_some(FlaggedItem { item, verdict })
            })
            .collect();

        self.reporter.report(ReplaceProgressEvent::Scanned {
            flagged: flagged.len() as u64,
            total: total as u64,
        });
        Ok(flagged)
    }

    /// Unit to draw a replacement from, plus the lesson context used.
    pub async fn target_unit(
        &self,
        store: &dyn ContentStore,
        item: &ContentItem,
    ) -> Result<(u32, Option<LessonInfo>)> {
        let lesson = store
            .lesson_info(&item.lesson_id)
            .await
            .with_context(|| format!("Failed to read lesson {}", item.lesson_id))?;

        let unit = lesson
            .as_ref()
            .and_then(|l| self.classifier.classify_lesson(l))
            .or(item.unit_number.filter(|u| *u >= 1))
            .unwrap_or_else(|| self.classifier.classify(&item.source_text));

        Ok((unit, lesson))
    }

    /// Replace one flagged item and return its log entry.
    ///
    /// The replacement is checked against this replacer's own rules before
    /// anything is written.
    pub async fn replace_item(
        &mut self,
        store: &dyn ContentStore,
        flagged: &FlaggedItem,
    ) -> Result<ReplacementLogEntry> {
        let item = &flagged.item;
        let original_target = item.target_text.clone().unwrap_or_default();
        let (target_unit, lesson_info) = self.target_unit(store, item).await?;

        let replacement = self.source.replacement_for(
            &item.source_text,
            &original_target,
            Some(target_unit),
        )?;

        let verdict = self
            .validator
            .validate(&replacement.pair.source, &replacement.pair.target);
        if !verdict.is_valid {
            bail!(
                "Generated replacement \"{}\" failed validation: {}",
                replacement.pair.source,
                verdict.issues.join(", ")
            );
        }

        store
            .update_item_text(&item.id, &replacement.pair.source, &replacement.pair.target)
            .await
            .with_context(|| format!("Failed to update content item {}", item.id))?;

        Ok(ReplacementLogEntry {
            id: item.id.clone(),
            lesson_id: item.lesson_id.clone(),
            lesson_info,
            target_unit,
            original: OriginalText {
                english: item.source_text.clone(),
                albanian: original_target,
                issues: flagged.verdict.issues.clone(),
            },
            replacement: ReplacementText {
                english: replacement.pair.source,
                albanian: replacement.pair.target,
                validation_score: replacement.validation_score,
                unit_number: replacement.unit_number,
            },
            timestamp: Utc::now(),
        })
    }

    /// Scan, then replace up to `limit` flagged items one at a time.
    pub async fn replace_all(
        &mut self,
        store: &dyn ContentStore,
        limit: Option<usize>,
    ) -> Result<RunReport> {
        let mut flagged = self.scan_for_problems(store).await?;
        if let Some(limit) = limit {
            flagged.truncate(limit);
        }

        let total = flagged.len();
        let mut report = RunReport::default();

        for (i, item) in flagged.iter().enumerate() {
            self.reporter.report(ReplaceProgressEvent::Processing {
                n: (i + 1) as u64,
                total: total as u64,
                id: item.item.id.clone(),
            });

            match self.replace_item(store, item).await {
                Ok(entry) => {
                    self.reporter.report(ReplaceProgressEvent::Replaced {
                        id: entry.id.clone(),
                        english: entry.replacement.english.clone(),
                    });
                    report.record_success(entry);
                }
                Err(e) => {
                    let error = format!("{:#}", e);
                    self.reporter.report(ReplaceProgressEvent::Failed {
                        id: item.item.id.clone(),
                        error: error.clone(),
                    });
                    report.record_failure(ReplacementFailure {
                        id: item.item.id.clone(),
                        error,
                        original_text: item.item.source_text.clone(),
                    });
                }
            }

            if !self.delay.is_zero() && i + 1 < total {
                tokio::time::sleep(self.delay).await;
            }
        }

        Ok(report)
    }
}

/// Generator wired from config: curriculum bank, rules, attempts, and seed.
pub fn build_generator(config: &Config) -> Result<ContentGenerator> {
    let bank = config.template_bank()?;
    let validator = build_validator(config)?;
    Ok(ContentGenerator::seeded(bank, validator, config.generation.seed)
        .with_attempts_per_unit(config.generation.attempts_per_unit))
}

pub fn build_validator(config: &Config) -> Result<ContentValidator> {
    ContentValidator::new(config.validation_rules()).context("Invalid academic term pattern")
}

fn build_replacer(
    config: &Config,
    progress: ProgressMode,
) -> Result<ContentReplacer<ContentGenerator>> {
    let generator = build_generator(config)?;
    let validator = build_validator(config)?;
    Ok(ContentReplacer::new(generator, validator)
        .with_delay(Duration::from_millis(config.replace.delay_ms))
        .with_reporter(progress.reporter()))
}

/// Write the report JSON into `dir`, returning the file path.
pub fn save_report(dir: &Path, report: &RunReport) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;
    let path = dir.join(REPORT_FILE_NAME);
    let json = serde_json::to_string_pretty(&report.to_file(Utc::now()))?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(path)
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max).collect::<String>())
    }
}

/// `pgate scan`: list flagged items without modifying anything.
pub async fn run_scan(config: &Config, preview: Option<usize>) -> Result<()> {
    let replacer = build_replacer(config, ProgressMode::Off)?;
    let store = SqliteContentStore::new(db::open_existing(config).await?);
    let flagged = replacer.scan_for_problems(&store).await?;
    let preview = preview.unwrap_or(config.replace.scan_preview);

    println!("scan");
    println!("  flagged items: {}", flagged.len());
    for (i, f) in flagged.iter().take(preview).enumerate() {
        println!(
            "  {}. {}: \"{}\"",
            i + 1,
            f.item.id,
            truncate_chars(&f.item.source_text, 60)
        );
        println!("     issues: {}", f.verdict.issues.join(", "));
    }
    if flagged.len() > preview {
        println!("  ... and {} more items", flagged.len() - preview);
    }

    store.close().await;
    Ok(())
}

/// `pgate replace`: replace flagged items and write the run report.
pub async fn run_replace(
    config: &Config,
    limit: Option<usize>,
    progress: ProgressMode,
) -> Result<()> {
    let mut replacer = build_replacer(config, progress)?;
    let store = SqliteContentStore::new(db::open_existing(config).await?);

    let report = replacer.replace_all(&store, limit).await?;
    let path = save_report(&config.replace.report_dir, &report)?;

    println!("replace");
    println!("  processed: {}", report.total_processed);
    println!("  succeeded: {}", report.success_count);
    println!("  failed: {}", report.failure_count);
    for (unit, count) in &report.replacements_by_unit {
        println!("  unit {}: {}", unit, count);
    }
    println!("  report: {}", path.display());
    if report.failure_count > 0 {
        eprintln!(
            "Warning: {} items failed to replace. Check the report for details.",
            report.failure_count
        );
    }

    store.close().await;
    Ok(())
}

/// `pgate test`: generate a replacement for the first flagged item, print it,
/// and write nothing.
pub async fn run_test(config: &Config) -> Result<()> {
    let mut replacer = build_replacer(config, ProgressMode::Off)?;
    let store = SqliteContentStore::new(db::open_existing(config).await?);

    let flagged = replacer.scan_for_problems(&store).await?;
    let first = match flagged.first() {
        Some(f) => f,
        None => {
            println!("test");
            println!("  no flagged content to test with");
            store.close().await;
            return Ok(());
        }
    };

    let (unit, _) = replacer.target_unit(&store, &first.item).await?;
    let original_target = first.item.target_text.clone().unwrap_or_default();
    let replacement: Replacement = replacer.source_mut().replacement_for(
        &first.item.source_text,
        &original_target,
        Some(unit),
    )?;

    println!("test (dry-run)");
    println!("  original: \"{}\"", first.item.source_text);
    println!("  issues: {}", first.verdict.issues.join(", "));
    println!("  target unit: {}", unit);
    println!("  english: \"{}\"", replacement.pair.source);
    println!("  albanian: \"{}\"", replacement.pair.target);
    println!("  drawn from unit: {}", replacement.unit_number);
    println!("  validation score: {}/100", replacement.validation_score);

    store.close().await;
    Ok(())
}
