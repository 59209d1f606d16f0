//! JSON fixture import for `pgate import`.
//!
//! Loads lessons and content items into the database in one transaction.
//! Rows are upserted by id, so importing the same fixture twice is safe.
//! Items without an id receive a fresh UUID v4.
//!
//! ```json
//! {
//!   "lessons": [
//!     { "id": "l1", "name": "Family Members", "skill_name": "Unit 2", "cefr_level": "A1" }
//!   ],
//!   "items": [
//!     { "lesson_id": "l1", "english_phrase": "my mother", "target_phrase": "nëna ime" }
//!   ]
//! }
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::config::Config;
use crate::db;

#[derive(Debug, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub lessons: Vec<LessonRecord>,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

#[derive(Debug, Deserialize)]
pub struct LessonRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub skill_name: String,
    #[serde(default)]
    pub cefr_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ItemRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub lesson_id: String,
    pub english_phrase: String,
    #[serde(default)]
    pub target_phrase: Option<String>,
    #[serde(default)]
    pub unit_number: Option<u32>,
    #[serde(default)]
    pub word_type: Option<String>,
    #[serde(default)]
    pub grammar_category: Option<String>,
}

/// Counts written by one import.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub lessons: usize,
    pub items: usize,
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(json).context("Invalid fixture JSON")?;
        fixture.check()?;
        Ok(fixture)
    }

    /// Every item must belong to a lesson the fixture defines.
    fn check(&self) -> Result<()> {
        let lesson_ids: HashSet<&str> = self.lessons.iter().map(|l| l.id.as_str()).collect();
        for item in &self.items {
            if !lesson_ids.contains(item.lesson_id.as_str()) {
                bail!(
                    "item '{}' references unknown lesson '{}'",
                    item.english_phrase,
                    item.lesson_id
                );
            }
        }
        Ok(())
    }
}

pub async fn import_fixture(config: &Config, fixture: &Fixture) -> Result<ImportSummary> {
    let pool = db::open_existing(config).await?;
    let mut tx = pool.begin().await?;

    for lesson in &fixture.lessons {
        sqlx::query(
            r#"
            INSERT INTO lessons (id, name, skill_name, cefr_level)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                skill_name = excluded.skill_name,
                cefr_level = excluded.cefr_level
            "#,
        )
        .bind(&lesson.id)
        .bind(&lesson.name)
        .bind(&lesson.skill_name)
        .bind(&lesson.cefr_level)
        .execute(&mut *tx)
        .await?;
    }

    for item in &fixture.items {
        let id = item
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        sqlx::query(
            r#"
            INSERT INTO lesson_content
                (id, lesson_id, english_phrase, target_phrase, unit_number, word_type, grammar_category)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                lesson_id = excluded.lesson_id,
                english_phrase = excluded.english_phrase,
                target_phrase = excluded.target_phrase,
                unit_number = excluded.unit_number,
                word_type = excluded.word_type,
                grammar_category = excluded.grammar_category
            "#,
        )
        .bind(&id)
        .bind(&item.lesson_id)
        .bind(&item.english_phrase)
        .bind(&item.target_phrase)
        .bind(item.unit_number.map(i64::from))
        .bind(&item.word_type)
        .bind(&item.grammar_category)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    pool.close().await;

    Ok(ImportSummary {
        lessons: fixture.lessons.len(),
        items: fixture.items.len(),
    })
}

pub async fn run_import(config: &Config, path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture: {}", path.display()))?;
    let fixture = Fixture::from_json(&json)?;
    let summary = import_fixture(config, &fixture).await?;

    println!("import");
    println!("  lessons: {}", summary.lessons);
    println!("  items: {}", summary.items);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_defaults() {
        let fixture = Fixture::from_json(
            r#"{"lessons":[{"id":"l1","name":"Greetings"}],
                "items":[{"lesson_id":"l1","english_phrase":"Hello"}]}"#,
        )
        .unwrap();
        assert_eq!(fixture.lessons[0].skill_name, "");
        assert!(fixture.items[0].id.is_none());
        assert!(fixture.items[0].target_phrase.is_none());
    }

    #[test]
    fn test_fixture_rejects_orphan_items() {
        let err = Fixture::from_json(
            r#"{"lessons":[],"items":[{"lesson_id":"nope","english_phrase":"Hello"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown lesson"));
    }

    #[test]
    fn test_empty_fixture_is_allowed() {
        let fixture = Fixture::from_json("{}").unwrap();
        assert!(fixture.lessons.is_empty());
        assert!(fixture.items.is_empty());
    }
}
