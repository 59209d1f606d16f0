//! Selection rules for the bulk purge admin action.
//!
//! Purging is separate from per-item replacement: it removes items outright.
//! An item is selected when its English text contains any purge pattern
//! (case-insensitive substring), or either text exceeds its character
//! ceiling. Items whose English text starts with the exempt prefix (lesson
//! introductions) are never selected.

use crate::models::ContentItem;

pub const DEFAULT_PURGE_PATTERNS: &[&str] = &[
    "credibility",
    "sources",
    "evaluate",
    "consider",
    "analysis",
    "theoretical",
    "methodology",
    "hypothesis",
    "evidence",
    "scholarly",
    "research",
    "academic",
    "morpholog",
    "linguistic",
    "inflection",
    "comparative",
    "synthesiz",
    "furthermore",
    "moreover",
    "in addition",
    "however",
    "therefore",
    "consequently",
    "nevertheless",
    "nonetheless",
    "significant",
    "comprehensive",
    "sophisticated",
    "paradigm",
    "framework",
    "implementation",
    "utilization",
];

pub const DEFAULT_TARGET_PURGE_PATTERNS: &[&str] = &[
    "besueshmëri",
    "burime",
    "vlerësoj",
    "konsideru",
    "analizoj",
    "teorik",
    "metodologji",
    "hipotezë",
    "dëshmi",
    "akademik",
    "kërkime",
    "studime",
    "megjithatë",
    "sidoqoftë",
    "prandaj",
    "rrjedhimisht",
];

pub const DEFAULT_EXEMPT_PREFIX: &str = "In this lesson";

#[derive(Debug, Clone)]
pub struct PurgeRules {
    pub source_patterns: Vec<String>,
    pub target_patterns: Vec<String>,
    pub max_chars_source: usize,
    pub max_chars_target: usize,
    pub exempt_prefix: Option<String>,
}

impl Default for PurgeRules {
    fn default() -> Self {
        Self {
            source_patterns: DEFAULT_PURGE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            target_patterns: DEFAULT_TARGET_PURGE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            max_chars_source: 50,
            max_chars_target: 60,
            exempt_prefix: Some(DEFAULT_EXEMPT_PREFIX.to_string()),
        }
    }
}

impl PurgeRules {
    /// Whether `item` should be removed by a purge.
    pub fn selects(&self, item: &ContentItem) -> bool {
        if let Some(prefix) = &self.exempt_prefix {
            if item
                .source_text
                .to_lowercase()
                .starts_with(&prefix.to_lowercase())
            {
                return false;
            }
        }

        let source = item.source_text.to_lowercase();
        let target = item.target_text.as_deref().unwrap_or("").to_lowercase();

        self.source_patterns
            .iter()
            .any(|p| source.contains(&p.to_lowercase()))
            || self
                .target_patterns
                .iter()
                .any(|p| target.contains(&p.to_lowercase()))
            || item.source_text.chars().count() > self.max_chars_source
            || target.chars().count() > self.max_chars_target
    }

    /// Ids of every selected item, in input order.
    pub fn select_ids(&self, items: &[ContentItem]) -> Vec<String> {
        items
            .iter()
            .filter(|i| self.selects(i))
            .map(|i| i.id.clone())
            .collect()
    }
}
