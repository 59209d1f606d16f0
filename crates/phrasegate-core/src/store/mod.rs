//! Content store abstraction.
//!
//! The [`ContentStore`] trait is the narrow interface the replacement
//! pipeline needs from whatever database owns the lesson content. Any
//! backend that can list complete items, look up lesson metadata, and
//! update an item's two text fields in place can drive a replacement run.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ContentItem, LessonInfo};

/// Abstract storage backend for lesson content.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`fetch_complete_items`](ContentStore::fetch_complete_items) | Items with both texts set |
/// | [`lesson_info`](ContentStore::lesson_info) | Lesson and skill names for a lesson id |
/// | [`update_item_text`](ContentStore::update_item_text) | Overwrite both texts of one item |
/// | [`delete_items`](ContentStore::delete_items) | Bulk removal, used only by purge |
/// | [`add_item`](ContentStore::add_item) | Insert refill content after a purge |
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All items whose English and Albanian texts are both set, ordered by
    /// lesson then id.
    async fn fetch_complete_items(&self) -> Result<Vec<ContentItem>>;

    /// Lesson metadata, or `None` when the lesson does not exist.
    async fn lesson_info(&self, lesson_id: &str) -> Result<Option<LessonInfo>>;

    /// Replace the texts of an existing item. The id never changes.
    ///
    /// Fails when no item has this id.
    async fn update_item_text(&self, id: &str, source_text: &str, target_text: &str)
        -> Result<()>;

    /// Delete items by id, returning how many rows were removed.
    async fn delete_items(&self, ids: &[String]) -> Result<u64>;

    /// Insert a new item. Fails when the id is already taken.
    async fn add_item(&self, item: &ContentItem) -> Result<()>;
}
