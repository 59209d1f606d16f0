use anyhow::Result;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    // Create lessons table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lessons (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            skill_name TEXT NOT NULL DEFAULT '',
            cefr_level TEXT
        )
        "#,
    )
    .execute(&pool)
    .await?;

    // Create lesson_content table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lesson_content (
            id TEXT PRIMARY KEY,
            lesson_id TEXT NOT NULL,
            english_phrase TEXT NOT NULL,
            target_phrase TEXT,
            unit_number INTEGER,
            word_type TEXT,
            grammar_category TEXT,
            FOREIGN KEY (lesson_id) REFERENCES lessons(id)
        )
        "#,
    )
    .execute(&pool)
    .await?;

    // Create indexes
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_lesson_content_lesson_id ON lesson_content(lesson_id)",
    )
    .execute(&pool)
    .await?;

    pool.close().await;
    Ok(())
}
