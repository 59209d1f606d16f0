//! Core data models shared by the validation and replacement pipeline.
//!
//! These types describe the bilingual content items read from a lesson
//! store, the lesson context used for unit inference, and the template
//! pairs the generator draws replacements from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single bilingual teaching item as stored in the lesson database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub lesson_id: String,
    /// English phrase (the learner's native language).
    pub source_text: String,
    /// Albanian phrase. `None` while generation is still pending.
    pub target_text: Option<String>,
    /// Curriculum unit recorded alongside the item, if any.
    pub unit_number: Option<u32>,
}

/// Lesson metadata used to refine unit inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonInfo {
    pub lesson_name: String,
    pub skill_name: String,
    pub cefr_level: Option<String>,
}

/// A literal (English, Albanian) template, possibly with placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePair {
    #[serde(rename = "english")]
    pub source: String,
    #[serde(rename = "albanian")]
    pub target: String,
}

impl TemplatePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Shape of content a template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Phrase,
    Sentence,
}

impl ContentKind {
    pub const ALL: [ContentKind; 2] = [ContentKind::Phrase, ContentKind::Sentence];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Phrase => "phrase",
            ContentKind::Sentence => "sentence",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "phrase" => Ok(ContentKind::Phrase),
            "sentence" => Ok(ContentKind::Sentence),
            other => Err(format!(
                "unknown content kind '{}': must be phrase or sentence",
                other
            )),
        }
    }
}
