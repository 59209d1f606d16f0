//! `pgate purge`: bulk deletion of inappropriate content.
//!
//! Selection comes from [`PurgeRules`](phrasegate_core::purge::PurgeRules)
//! built from `[purge]` and `[rules]`. After deletion every lesson that lost
//! items is refilled with validated draws from its unit, so a purge never
//! leaves a lesson empty. With `--dry-run` the selected items and affected
//! lessons are listed and nothing is written.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};

use phrasegate_core::classify::DEFAULT_UNIT;
use phrasegate_core::generate::ContentGenerator;
use phrasegate_core::models::ContentItem;
use phrasegate_core::purge::PurgeRules;
use phrasegate_core::store::ContentStore;

use crate::config::Config;
use crate::db;
use crate::replace::build_generator;
use crate::sqlite_store::SqliteContentStore;

/// Outcome of a purge pass.
#[derive(Debug, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub scanned: usize,
    pub selected: Vec<String>,
    pub deleted: u64,
    pub refills: Vec<LessonRefill>,
}

/// New content written into one lesson after its items were purged.
#[derive(Debug, PartialEq, Eq)]
pub struct LessonRefill {
    pub lesson_id: String,
    pub unit: u32,
    /// Items inserted. Always 0 on a dry run.
    pub added: usize,
}

impl PurgeOutcome {
    pub fn added(&self) -> usize {
        self.refills.iter().map(|r| r.added).sum()
    }
}

/// Select and (unless `dry_run`) delete items from any store, then refill
/// each affected lesson with up to `per_lesson` generated items.
pub async fn purge_store(
    store: &dyn ContentStore,
    rules: &PurgeRules,
    generator: &mut ContentGenerator,
    per_lesson: usize,
    dry_run: bool,
) -> Result<PurgeOutcome> {
    let items = store.fetch_complete_items().await?;
    let (purged, kept): (Vec<&ContentItem>, Vec<&ContentItem>) =
        items.iter().partition(|i| rules.selects(i));
    let selected: Vec<String> = purged.iter().map(|i| i.id.clone()).collect();

    // Affected lessons with the first stored unit seen among their purged items.
    let mut lessons: BTreeMap<&str, Option<u32>> = BTreeMap::new();
    for item in &purged {
        let unit = lessons.entry(item.lesson_id.as_str()).or_default();
        if unit.is_none() {
            *unit = item.unit_number.filter(|u| *u >= 1);
        }
    }

    let deleted = if dry_run || selected.is_empty() {
        0
    } else {
        store.delete_items(&selected).await?
    };

    let mut refills = Vec::new();
    if per_lesson > 0 {
        for (lesson_id, stored_unit) in lessons {
            let unit = refill_unit(store, generator, lesson_id, stored_unit).await?;
            if dry_run {
                refills.push(LessonRefill {
                    lesson_id: lesson_id.to_string(),
                    unit,
                    added: 0,
                });
                continue;
            }

            let candidates = match generator.generate_batch(unit, per_lesson) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Warning: could not refill lesson {}: {}", lesson_id, e);
                    continue;
                }
            };

            let mut seen: HashSet<String> = kept
                .iter()
                .filter(|i| i.lesson_id == lesson_id)
                .map(|i| i.source_text.to_lowercase())
                .collect();
            let mut added = 0;
            for candidate in candidates {
                if !seen.insert(candidate.pair.source.to_lowercase()) {
                    continue;
                }
                let item = ContentItem {
                    id: uuid::Uuid::new_v4().to_string(),
                    lesson_id: lesson_id.to_string(),
                    source_text: candidate.pair.source,
                    target_text: Some(candidate.pair.target),
                    unit_number: Some(candidate.unit_number),
                };
                // A refill must survive the next purge.
                if rules.selects(&item) {
                    continue;
                }
                store
                    .add_item(&item)
                    .await
                    .with_context(|| format!("Failed to refill lesson {}", lesson_id))?;
                added += 1;
            }

            refills.push(LessonRefill {
                lesson_id: lesson_id.to_string(),
                unit,
                added,
            });
        }
    }

    Ok(PurgeOutcome {
        scanned: items.len(),
        selected,
        deleted,
        refills,
    })
}

/// Lesson context first, then the purged items' stored unit, then unit 1.
/// Clamped to the units the bank actually has.
async fn refill_unit(
    store: &dyn ContentStore,
    generator: &ContentGenerator,
    lesson_id: &str,
    stored_unit: Option<u32>,
) -> Result<u32> {
    let lesson = store
        .lesson_info(lesson_id)
        .await
        .with_context(|| format!("Failed to read lesson {}", lesson_id))?;

    let unit = lesson
        .as_ref()
        .and_then(|l| generator.classifier().classify_lesson(l))
        .or(stored_unit)
        .unwrap_or(DEFAULT_UNIT);

    let highest = generator.bank().highest_unit().unwrap_or(DEFAULT_UNIT);
    Ok(unit.clamp(DEFAULT_UNIT, highest.max(DEFAULT_UNIT)))
}

pub async fn run_purge(config: &Config, dry_run: bool) -> Result<()> {
    let mut generator = build_generator(config)?;
    let store = SqliteContentStore::new(db::open_existing(config).await?);
    let outcome = purge_store(
        &store,
        &config.purge_rules(),
        &mut generator,
        config.purge.refill_per_lesson,
        dry_run,
    )
    .await?;

    if dry_run {
        println!("purge (dry-run)");
        println!("  scanned: {}", outcome.scanned);
        println!("  would delete: {}", outcome.selected.len());
        for id in &outcome.selected {
            println!("    {}", id);
        }
        println!("  would refill: {} lessons", outcome.refills.len());
        for r in &outcome.refills {
            println!("    {} (unit {})", r.lesson_id, r.unit);
        }
    } else {
        println!("purge");
        println!("  scanned: {}", outcome.scanned);
        println!("  deleted: {}", outcome.deleted);
        println!("  refilled lessons: {}", outcome.refills.len());
        println!("  added: {}", outcome.added());
    }

    store.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phrasegate_core::models::LessonInfo;
    use phrasegate_core::store::memory::InMemoryContentStore;
    use phrasegate_core::templates::UnitTemplateBank;
    use phrasegate_core::validate::{ContentValidator, ValidationRules};

    fn validator() -> ContentValidator {
        ContentValidator::new(ValidationRules::default()).unwrap()
    }

    fn generator() -> ContentGenerator {
        ContentGenerator::seeded(UnitTemplateBank::builtin(), validator(), Some(11))
    }

    fn seed() -> InMemoryContentStore {
        let store = InMemoryContentStore::new();
        for (id, en) in [
            ("a", "Good morning"),
            ("b", "Evaluate the credibility of sources"),
            ("c", "In this lesson we study research"),
        ] {
            store.insert_item(ContentItem {
                id: id.to_string(),
                lesson_id: "l1".to_string(),
                source_text: en.to_string(),
                target_text: Some("x".to_string()),
                unit_number: None,
            });
        }
        store
    }

    #[tokio::test]
    async fn test_dry_run_deletes_nothing() {
        let store = seed();
        let outcome = purge_store(&store, &PurgeRules::default(), &mut generator(), 8, true)
            .await
            .unwrap();
        assert_eq!(outcome.selected, vec!["b".to_string()]);
        assert_eq!(outcome.deleted, 0);
        assert_eq!(
            outcome.refills,
            vec![LessonRefill {
                lesson_id: "l1".to_string(),
                unit: 1,
                added: 0,
            }]
        );
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_purge_deletes_selected_only() {
        let store = seed();
        let outcome = purge_store(&store, &PurgeRules::default(), &mut generator(), 0, false)
            .await
            .unwrap();
        assert_eq!(outcome.scanned, 3);
        assert_eq!(outcome.deleted, 1);
        assert!(outcome.refills.is_empty());
        assert!(store.item("b").is_none());
        assert!(store.item("c").is_some());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_purged_lesson_is_refilled_from_its_unit() {
        let store = seed();
        store.insert_lesson(
            "l1",
            LessonInfo {
                lesson_name: "Family Members".to_string(),
                skill_name: String::new(),
                cefr_level: None,
            },
        );

        let outcome = purge_store(&store, &PurgeRules::default(), &mut generator(), 8, false)
            .await
            .unwrap();

        assert_eq!(outcome.refills.len(), 1);
        assert_eq!(outcome.refills[0].unit, 2);
        assert!(outcome.added() > 0);
        assert_eq!(store.len(), 2 + outcome.added());

        let items = store.fetch_complete_items().await.unwrap();
        let added: Vec<&ContentItem> = items
            .iter()
            .filter(|i| !["a", "c"].contains(&i.id.as_str()))
            .collect();
        assert_eq!(added.len(), outcome.added());

        let v = validator();
        let mut english = HashSet::new();
        for item in added {
            assert_eq!(item.lesson_id, "l1");
            assert_eq!(item.unit_number, Some(2));
            assert!(v
                .validate(&item.source_text, item.target_text.as_deref().unwrap())
                .is_valid);
            assert!(!PurgeRules::default().selects(item));
            assert!(english.insert(item.source_text.to_lowercase()));
        }
        assert!(!english.contains("good morning"));
    }

    #[tokio::test]
    async fn test_stored_unit_used_without_lesson_context() {
        let store = InMemoryContentStore::new();
        store.insert_item(ContentItem {
            id: "h".to_string(),
            lesson_id: "orphan".to_string(),
            source_text: "The research methodology".to_string(),
            target_text: Some("Metodologjia".to_string()),
            unit_number: Some(4),
        });

        let outcome = purge_store(&store, &PurgeRules::default(), &mut generator(), 4, false)
            .await
            .unwrap();

        assert_eq!(outcome.deleted, 1);
        assert_eq!(outcome.refills[0].unit, 4);
        assert_eq!(store.len(), outcome.added());
    }

    #[tokio::test]
    async fn test_nothing_selected_means_nothing_refilled() {
        let store = InMemoryContentStore::new();
        store.insert_item(ContentItem {
            id: "ok".to_string(),
            lesson_id: "l1".to_string(),
            source_text: "Good morning".to_string(),
            target_text: Some("Mirëmëngjes".to_string()),
            unit_number: None,
        });

        let outcome = purge_store(&store, &PurgeRules::default(), &mut generator(), 8, false)
            .await
            .unwrap();

        assert!(outcome.selected.is_empty());
        assert!(outcome.refills.is_empty());
        assert_eq!(store.len(), 1);
    }
}
