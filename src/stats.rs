//! Database statistics and content health overview.
//!
//! Provides a quick summary of what's stored: lesson and item counts, how many
//! complete items currently fail the quality gate, and a per-lesson breakdown.
//! Used by `pgate stats` to check a database before and after a replace run.

use anyhow::Result;
use sqlx::Row;
use std::collections::HashMap;

use phrasegate_core::store::ContentStore;

use crate::config::Config;
use crate::db;
use crate::replace::build_validator;
use crate::sqlite_store::SqliteContentStore;

/// Per-lesson breakdown of item and flagged counts.
struct LessonStats {
    name: String,
    item_count: i64,
    flagged_count: usize,
}

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::open_existing(config).await?;

    let total_lessons: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
        .fetch_one(&pool)
        .await?;

    let total_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lesson_content")
        .fetch_one(&pool)
        .await?;

    let untranslated: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM lesson_content WHERE target_phrase IS NULL")
            .fetch_one(&pool)
            .await?;

    let validator = build_validator(config)?;
    let store = SqliteContentStore::new(pool.clone());
    let items = store.fetch_complete_items().await?;

    let mut flagged_by_lesson: HashMap<String, usize> = HashMap::new();
    for item in &items {
        let target = item.target_text.as_deref().unwrap_or("");
        if !validator.validate(&item.source_text, target).is_valid {
            *flagged_by_lesson.entry(item.lesson_id.clone()).or_default() += 1;
        }
    }
    let total_flagged: usize = flagged_by_lesson.values().sum();

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Phrasegate Database Stats");
    println!("=========================");
    println!();
    println!("  Database:      {}", config.db.path.display());
    println!("  Size:          {}", format_bytes(db_size));
    println!();
    println!("  Lessons:       {}", total_lessons);
    println!("  Items:         {}", total_items);
    println!("  Untranslated:  {}", untranslated);
    println!(
        "  Flagged:       {} / {} ({}%)",
        total_flagged,
        items.len(),
        if items.is_empty() {
            0
        } else {
            (total_flagged * 100) / items.len()
        }
    );

    let lesson_rows = sqlx::query(
        r#"
        SELECT l.id, l.name, COUNT(c.id) AS item_count
        FROM lessons l
        LEFT JOIN lesson_content c ON c.lesson_id = l.id
        GROUP BY l.id, l.name
        ORDER BY item_count DESC, l.name
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let lesson_stats: Vec<LessonStats> = lesson_rows
        .iter()
        .map(|row| {
            let id: String = row.get("id");
            LessonStats {
                name: row.get("name"),
                item_count: row.get("item_count"),
                flagged_count: flagged_by_lesson.get(&id).copied().unwrap_or(0),
            }
        })
        .collect();

    if !lesson_stats.is_empty() {
        println!();
        println!("  By lesson:");
        println!("  {:<36} {:>6} {:>8}", "LESSON", "ITEMS", "FLAGGED");
        println!("  {}", "-".repeat(52));

        for s in &lesson_stats {
            println!(
                "  {:<36} {:>6} {:>8}",
                s.name, s.item_count, s.flagged_count
            );
        }
    }

    println!();

    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
