//! SQLite-backed [`ContentStore`] implementation.
//!
//! Maps each store operation onto the `lessons` and `lesson_content`
//! tables created by [`migrate`](crate::migrate).

use anyhow::{bail, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use phrasegate_core::models::{ContentItem, LessonInfo};
use phrasegate_core::store::ContentStore;

/// SQLite implementation of the [`ContentStore`] trait.
pub struct SqliteContentStore {
    pool: SqlitePool,
}

impl SqliteContentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ContentStore for SqliteContentStore {
    async fn fetch_complete_items(&self) -> Result<Vec<ContentItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, lesson_id, english_phrase, target_phrase, unit_number
            FROM lesson_content
            WHERE english_phrase IS NOT NULL
              AND target_phrase IS NOT NULL
            ORDER BY lesson_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| ContentItem {
                id: row.get("id"),
                lesson_id: row.get("lesson_id"),
                source_text: row.get("english_phrase"),
                target_text: row.get("target_phrase"),
                unit_number: row
                    .get::<Option<i64>, _>("unit_number")
                    .and_then(|u| u32::try_from(u).ok()),
            })
            .collect())
    }

    async fn lesson_info(&self, lesson_id: &str) -> Result<Option<LessonInfo>> {
        let row = sqlx::query("SELECT name, skill_name, cefr_level FROM lessons WHERE id = ?")
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| LessonInfo {
            lesson_name: r.get("name"),
            skill_name: r.get("skill_name"),
            cefr_level: r.get("cefr_level"),
        }))
    }

    async fn update_item_text(
        &self,
        id: &str,
        source_text: &str,
        target_text: &str,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE lesson_content
            SET english_phrase = ?, target_phrase = ?
            WHERE id = ?
            "#,
        )
        .bind(source_text)
        .bind(target_text)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            bail!("content item not found: {}", id);
        }
        Ok(())
    }

    async fn delete_items(&self, ids: &[String]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut deleted = 0u64;

        for id in ids {
            deleted += sqlx::query("DELETE FROM lesson_content WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        Ok(deleted)
    }

    async fn add_item(&self, item: &ContentItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO lesson_content (id, lesson_id, english_phrase, target_phrase, unit_number)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.lesson_id)
        .bind(&item.source_text)
        .bind(&item.target_text)
        .bind(item.unit_number.map(i64::from))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
