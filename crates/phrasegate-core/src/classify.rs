//! Heuristic curriculum-unit inference.
//!
//! [`UnitClassifier::classify`] is a deliberately crude, order-sensitive
//! keyword matcher over content text: units are checked in a fixed priority
//! order and the first unit with any matching keyword wins. Ties are never
//! resolved by match count.
//!
//! [`UnitClassifier::classify_lesson`] refines this with lesson metadata:
//! an explicit `Unit N` in the lesson or skill name wins outright, then the
//! lesson's topic keywords are tried in the same priority order.

use regex::Regex;

use crate::models::LessonInfo;

/// Ordered `(unit, keywords)` rules for content text.
const CONTENT_RULES: &[(u32, &[&str])] = &[
    (1, &["hello", "name", "how are"]),
    (2, &["family", "mother", "father"]),
    (3, &["school", "teacher", "study"]),
    (4, &["home", "room", "house"]),
    (5, &["food", "eat", "drink"]),
    (6, &["weather", "rain", "sun"]),
    (7, &["play", "music", "sport"]),
    (8, &["future", "plan", "dream"]),
];

/// Ordered `(unit, keywords)` rules for lesson names.
const LESSON_RULES: &[(u32, &[&str])] = &[
    (1, &["greeting", "introduction", "hello"]),
    (2, &["family"]),
    (3, &["school", "education"]),
    (4, &["home", "house", "daily"]),
    (5, &["food", "eat", "drink"]),
    (6, &["weather", "season", "climate"]),
    (7, &["hobby", "sport", "free time"]),
    (8, &["future", "plan", "dream"]),
];

/// Skill-name keywords that also place a lesson in a unit.
const SKILL_RULES: &[(u32, &str)] = &[(2, "family"), (3, "school")];

/// Unit returned when nothing matches.
pub const DEFAULT_UNIT: u32 = 1;

pub struct UnitClassifier {
    explicit_unit: Regex,
}

impl Default for UnitClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitClassifier {
    pub fn new() -> Self {
        Self {
            explicit_unit: Regex::new(r"(?i)\bunit\s*(\d+)\b")
                .expect("unit pattern is a valid literal"),
        }
    }

    /// Infer a unit from content text. Defaults to unit 1.
    pub fn classify(&self, text: &str) -> u32 {
        first_match(CONTENT_RULES, &text.to_lowercase()).unwrap_or(DEFAULT_UNIT)
    }

    /// Infer a unit from lesson context, if the lesson names one.
    ///
    /// Beyond the explicit `Unit N` check, skill names only count for the
    /// `family` and `school` topics.
    pub fn classify_lesson(&self, lesson: &LessonInfo) -> Option<u32> {
        for name in [&lesson.lesson_name, &lesson.skill_name] {
            if let Some(unit) = self
                .explicit_unit
                .captures(name)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .filter(|u| *u >= 1)
            {
                return Some(unit);
            }
        }

        let lesson_name = lesson.lesson_name.to_lowercase();
        let skill_name = lesson.skill_name.to_lowercase();
        LESSON_RULES.iter().find_map(|(unit, keywords)| {
            let lesson_hit = keywords.iter().any(|k| lesson_name.contains(k));
            let skill_hit = SKILL_RULES
                .iter()
                .any(|(u, k)| u == unit && skill_name.contains(k));
            (lesson_hit || skill_hit).then_some(*unit)
        })
    }
}

fn first_match(rules: &[(u32, &[&str])], lowered: &str) -> Option<u32> {
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(unit, _)| *unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(name: &str, skill: &str) -> LessonInfo {
        LessonInfo {
            lesson_name: name.to_string(),
            skill_name: skill.to_string(),
            cefr_level: None,
        }
    }

    #[test]
    fn test_family_checked_before_food() {
        let c = UnitClassifier::new();
        assert_eq!(c.classify("My family likes food"), 2);
    }

    #[test]
    fn test_defaults_to_unit_one() {
        let c = UnitClassifier::new();
        assert_eq!(
            c.classify("Furthermore, the methodology requires significant analysis"),
            1
        );
        assert_eq!(c.classify(""), 1);
    }

    #[test]
    fn test_each_unit_reachable() {
        let c = UnitClassifier::new();
        assert_eq!(c.classify("Hello there"), 1);
        assert_eq!(c.classify("My MOTHER"), 2);
        assert_eq!(c.classify("The teacher"), 3);
        assert_eq!(c.classify("A big house"), 4);
        assert_eq!(c.classify("I drink tea"), 5);
        assert_eq!(c.classify("It will rain"), 6);
        assert_eq!(c.classify("I like music"), 7);
        assert_eq!(c.classify("Big dreams"), 8);
    }

    #[test]
    fn test_substring_quirks_follow_priority() {
        let c = UnitClassifier::new();
        // "homework" contains "home", but "school" is checked first.
        assert_eq!(c.classify("School homework"), 3);
        // "Sunday" contains "sun".
        assert_eq!(c.classify("See you Sunday"), 6);
    }

    #[test]
    fn test_lesson_explicit_unit_wins() {
        let c = UnitClassifier::new();
        assert_eq!(c.classify_lesson(&lesson("Food words", "Unit 6: Weather")), Some(6));
        assert_eq!(c.classify_lesson(&lesson("Unit 3 review", "Family")), Some(3));
        assert_eq!(c.classify_lesson(&lesson("Recap", "unit 7")), Some(7));
        assert_eq!(c.classify_lesson(&lesson("Unit 0", "Basics")), None);
    }

    #[test]
    fn test_lesson_topic_keywords() {
        let c = UnitClassifier::new();
        assert_eq!(c.classify_lesson(&lesson("Greetings", "Basics")), Some(1));
        assert_eq!(c.classify_lesson(&lesson("Lesson A", "Family Life")), Some(2));
        assert_eq!(c.classify_lesson(&lesson("Seasons", "Nature")), Some(6));
        assert_eq!(c.classify_lesson(&lesson("My Free Time", "Leisure")), Some(7));
        assert_eq!(c.classify_lesson(&lesson("Lesson B", "Weather")), None);
        assert_eq!(c.classify_lesson(&lesson("Verbs", "Grammar")), None);
    }

    #[test]
    fn test_skill_name_only_counts_for_family_and_school() {
        let c = UnitClassifier::new();
        assert_eq!(c.classify_lesson(&lesson("Lesson C", "School Days")), Some(3));
        assert_eq!(c.classify_lesson(&lesson("Lesson D", "Education")), None);
        assert_eq!(c.classify_lesson(&lesson("Lesson E", "Sports and Hobbies")), None);
        assert_eq!(c.classify_lesson(&lesson("Education basics", "Misc")), Some(3));
    }
}
