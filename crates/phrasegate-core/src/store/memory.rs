//! In-memory [`ContentStore`] implementation for tests and dry runs.
//!
//! Uses `BTreeMap`s behind `std::sync::RwLock` for thread safety.

use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::models::{ContentItem, LessonInfo};

use super::ContentStore;

/// In-memory content store.
pub struct InMemoryContentStore {
    items: RwLock<BTreeMap<String, ContentItem>>,
    lessons: RwLock<BTreeMap<String, LessonInfo>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            lessons: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn insert_item(&self, item: ContentItem) {
        self.items.write().unwrap().insert(item.id.clone(), item);
    }

    pub fn insert_lesson(&self, lesson_id: &str, info: LessonInfo) {
        self.lessons
            .write()
            .unwrap()
            .insert(lesson_id.to_string(), info);
    }

    /// Snapshot of one item, if present.
    pub fn item(&self, id: &str) -> Option<ContentItem> {
        self.items.read().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn fetch_complete_items(&self) -> Result<Vec<ContentItem>> {
        let items = self.items.read().unwrap();
        let mut complete: Vec<ContentItem> = items
            .values()
            .filter(|i| i.target_text.is_some())
            .cloned()
            .collect();
        complete.sort_by(|a, b| (&a.lesson_id, &a.id).cmp(&(&b.lesson_id, &b.id)));
        Ok(complete)
    }

    async fn lesson_info(&self, lesson_id: &str) -> Result<Option<LessonInfo>> {
        Ok(self.lessons.read().unwrap().get(lesson_id).cloned())
    }

    async fn update_item_text(
        &self,
        id: &str,
        source_text: &str,
        target_text: &str,
    ) -> Result<()> {
        let mut items = self.items.write().unwrap();
        match items.get_mut(id) {
            Some(item) => {
                item.source_text = source_text.to_string();
                item.target_text = Some(target_text.to_string());
                Ok(())
            }
            None => bail!("content item not found: {}", id),
        }
    }

    async fn delete_items(&self, ids: &[String]) -> Result<u64> {
        let mut items = self.items.write().unwrap();
        Ok(ids.iter().filter(|id| items.remove(*id).is_some()).count() as u64)
    }

    async fn add_item(&self, item: &ContentItem) -> Result<()> {
        let mut items = self.items.write().unwrap();
        if items.contains_key(&item.id) {
            bail!("content item already exists: {}", item.id);
        }
        items.insert(item.id.clone(), item.clone());
        Ok(())
    }
}
