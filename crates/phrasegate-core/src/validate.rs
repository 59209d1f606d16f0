//! Rule-based quality gate for bilingual content.
//!
//! A [`ContentValidator`] scores an (English, Albanian) pair against a fixed
//! [`ValidationRules`] set and returns a [`ValidationVerdict`]. Every rule is
//! evaluated independently and every violation is collected; nothing
//! short-circuits.
//!
//! # Rules (in evaluation order)
//!
//! 1. **Word count**: whitespace-separated tokens per language must not
//!    exceed `max_words`.
//! 2. **Character length**: each text must fit its language's ceiling,
//!    counted in characters rather than bytes.
//! 3. **Forbidden vocabulary**: every lower-cased word found in the
//!    language's forbidden set is reported separately.
//! 4. **Academic register**: a single case-insensitive pattern over the
//!    English text; any number of matches yields one issue.
//!
//! The score is `max(0, 100 - 20 × issues)`.
//!
//! ```rust
//! use phrasegate_core::validate::{ContentValidator, ValidationRules};
//!
//! let validator = ContentValidator::new(ValidationRules::default()).unwrap();
//! let verdict = validator.validate("Good morning", "Mirëmëngjes");
//! assert!(verdict.is_valid);
//! assert_eq!(verdict.score, 100);
//! ```

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::BTreeSet;

/// Points deducted per issue.
const ISSUE_PENALTY: u32 = 20;

const SOURCE_LANGUAGE: &str = "English";
const TARGET_LANGUAGE: &str = "Albanian";

/// Thresholds and vocabulary lists enforced by [`ContentValidator`].
#[derive(Debug, Clone)]
pub struct ValidationRules {
    pub max_words: usize,
    pub max_chars_source: usize,
    pub max_chars_target: usize,
    pub forbidden_source: BTreeSet<String>,
    pub forbidden_target: BTreeSet<String>,
    /// Terms matched as case-insensitive substrings of the English text.
    pub academic_terms: Vec<String>,
}

const DEFAULT_FORBIDDEN_ENGLISH: &[&str] = &[
    "academic",
    "alternatively",
    "analysis",
    "comparative",
    "comprehensive",
    "consequently",
    "considerably",
    "credibility",
    "criteria",
    "essentially",
    "evaluate",
    "evidence",
    "framework",
    "fundamentally",
    "furthermore",
    "however",
    "hypothesis",
    "implementation",
    "inflection",
    "linguistic",
    "methodology",
    "moreover",
    "nevertheless",
    "nonetheless",
    "paradigm",
    "particularly",
    "research",
    "scholarly",
    "significantly",
    "specifically",
    "subsequently",
    "substantially",
    "theoretical",
    "therefore",
    "ultimately",
    "utilization",
];

const DEFAULT_FORBIDDEN_ALBANIAN: &[&str] = &[
    "akademik",
    "analizoj",
    "besueshmëri",
    "burime",
    "dëshmi",
    "gjithashtu",
    "hipotezë",
    "kërkime",
    "konsideroj",
    "megjithatë",
    "metodologji",
    "prandaj",
    "përveç",
    "rrjedhimisht",
    "sidoqoftë",
    "studime",
    "teorik",
    "vlerësoj",
];

/// Academic-register terms. Matched as substrings, so `study` also
/// catches `studying`.
pub const DEFAULT_ACADEMIC_TERMS: &[&str] = &[
    "theory",
    "research",
    "analysis",
    "hypothesis",
    "methodology",
    "study",
    "investigation",
    "significant",
    "correlation",
    "empirical",
    "complex",
    "advanced",
    "professional",
    "academic",
    "intellectual",
];

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_words: 8,
            max_chars_source: 50,
            max_chars_target: 60,
            forbidden_source: DEFAULT_FORBIDDEN_ENGLISH
                .iter()
                .map(|w| w.to_string())
                .collect(),
            forbidden_target: DEFAULT_FORBIDDEN_ALBANIAN
                .iter()
                .map(|w| w.to_string())
                .collect(),
            academic_terms: DEFAULT_ACADEMIC_TERMS
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

/// Outcome of validating one pair. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub score: u32,
}

impl ValidationVerdict {
    fn from_issues(issues: Vec<String>) -> Self {
        let penalty = ISSUE_PENALTY.saturating_mul(issues.len() as u32);
        Self {
            is_valid: issues.is_empty(),
            score: 100u32.saturating_sub(penalty),
            issues,
        }
    }
}

/// Pure validator over an injected rule set.
#[derive(Debug, Clone)]
pub struct ContentValidator {
    rules: ValidationRules,
    academic: Option<Regex>,
}

impl ContentValidator {
    /// Build a validator, compiling the academic-register pattern.
    ///
    /// An empty `academic_terms` list disables rule 4.
    pub fn new(rules: ValidationRules) -> Result<Self, regex::Error> {
        let academic = if rules.academic_terms.is_empty() {
            None
        } else {
            let alternation = rules
                .academic_terms
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                RegexBuilder::new(&format!("({})", alternation))
                    .case_insensitive(true)
                    .build()?,
            )
        };
        Ok(Self { rules, academic })
    }

    /// Score a pair against every rule. Never fails.
    pub fn validate(&self, source: &str, target: &str) -> ValidationVerdict {
        let mut issues = Vec::new();

        let source_words = source.split_whitespace().count();
        let target_words = target.split_whitespace().count();
        if source_words > self.rules.max_words {
            issues.push(format!(
                "{} has {} words, max is {}",
                SOURCE_LANGUAGE, source_words, self.rules.max_words
            ));
        }
        if target_words > self.rules.max_words {
            issues.push(format!(
                "{} has {} words, max is {}",
                TARGET_LANGUAGE, target_words, self.rules.max_words
            ));
        }

        let source_chars = source.chars().count();
        let target_chars = target.chars().count();
        if source_chars > self.rules.max_chars_source {
            issues.push(format!(
                "{} has {} characters, max is {}",
                SOURCE_LANGUAGE, source_chars, self.rules.max_chars_source
            ));
        }
        if target_chars > self.rules.max_chars_target {
            issues.push(format!(
                "{} has {} characters, max is {}",
                TARGET_LANGUAGE, target_chars, self.rules.max_chars_target
            ));
        }

        for word in normalized_words(source) {
            if self.rules.forbidden_source.contains(&word) {
                issues.push(format!(
                    "Contains forbidden {} word: {}",
                    SOURCE_LANGUAGE, word
                ));
            }
        }
        for word in normalized_words(target) {
            if self.rules.forbidden_target.contains(&word) {
                issues.push(format!(
                    "Contains forbidden {} word: {}",
                    TARGET_LANGUAGE, word
                ));
            }
        }

        if let Some(re) = &self.academic {
            if re.is_match(source) {
                issues.push("Contains abstract or academic concepts".to_string());
            }
        }

        ValidationVerdict::from_issues(issues)
    }
}

/// Lower-case whitespace tokens with surrounding punctuation removed.
fn normalized_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> ContentValidator {
        ContentValidator::new(ValidationRules::default()).unwrap()
    }

    #[test]
    fn test_simple_pair_is_valid() {
        let v = validator().validate("Hello, my name is Ana", "Përshëndetje, unë quhem Ana");
        assert!(v.is_valid);
        assert!(v.issues.is_empty());
        assert_eq!(v.score, 100);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let val = validator();
        let a = val.validate(
            "Furthermore, the methodology requires significant analysis",
            "Megjithatë kjo është e vështirë",
        );
        let b = val.validate(
            "Furthermore, the methodology requires significant analysis",
            "Megjithatë kjo është e vështirë",
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_tracks_issue_count() {
        let val = validator();
        let samples = [
            ("Good morning", "Mirëmëngjes"),
            ("The research is complex", "Kërkime"),
            (
                "However the comprehensive research methodology is therefore very complex indeed",
                "Megjithatë prandaj rrjedhimisht akademik teorik studime burime dëshmi kërkime",
            ),
        ];
        for (s, t) in samples {
            let v = val.validate(s, t);
            let expected = 100i64 - 20 * v.issues.len() as i64;
            assert_eq!(v.score as i64, expected.max(0), "score for {:?}", s);
            assert_eq!(v.is_valid, v.issues.is_empty());
        }
    }

    #[test]
    fn test_score_floors_at_zero() {
        let v = validator().validate(
            "However the comprehensive research methodology is therefore very complex indeed",
            "Megjithatë prandaj rrjedhimisht akademik teorik studime burime dëshmi kërkime",
        );
        assert!(v.issues.len() > 5);
        assert_eq!(v.score, 0);
    }

    #[test]
    fn test_word_count_boundary() {
        let val = validator();
        let eight = "one two three four five six seven eight";
        let nine = "one two three four five six seven eight nine";

        let v = val.validate(eight, "Mirëdita");
        assert!(!v.issues.iter().any(|i| i.contains("words")));

        let v = val.validate(nine, "Mirëdita");
        assert!(v
            .issues
            .contains(&"English has 9 words, max is 8".to_string()));
    }

    #[test]
    fn test_target_word_count_reported_separately() {
        let v = validator().validate(
            "I prefer fresh fruit for snacks.",
            "Unë preferoj fruta të freskëta për ushqime të vogla.",
        );
        assert_eq!(v.issues, vec!["Albanian has 9 words, max is 8".to_string()]);
        assert_eq!(v.score, 80);
    }

    #[test]
    fn test_character_ceiling_counts_chars_not_bytes() {
        let rules = ValidationRules {
            max_chars_target: 12,
            ..ValidationRules::default()
        };
        let val = ContentValidator::new(rules).unwrap();
        // 12 characters, more than 12 bytes.
        let v = val.validate("Good morning", "Mirëmëngjes!");
        assert!(v.is_valid, "{:?}", v.issues);

        let v = val.validate("Good morning", "Mirëmëngjes!!");
        assert_eq!(
            v.issues,
            vec!["Albanian has 13 characters, max is 12".to_string()]
        );
    }

    #[test]
    fn test_academic_match_is_case_insensitive() {
        let val = validator();
        for text in ["I like RESEARCH", "I like research", "I like Research"] {
            let v = val.validate(text, "Më pëlqen");
            assert!(
                v.issues
                    .contains(&"Contains abstract or academic concepts".to_string()),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_academic_rule_reports_once() {
        let v = validator().validate("Theory and empirical study", "Teori");
        let academic = v
            .issues
            .iter()
            .filter(|i| i.as_str() == "Contains abstract or academic concepts")
            .count();
        assert_eq!(academic, 1);
    }

    #[test]
    fn test_forbidden_words_each_reported() {
        let v = validator().validate("however, therefore", "prandaj gjithashtu");
        assert_eq!(
            v.issues,
            vec![
                "Contains forbidden English word: however".to_string(),
                "Contains forbidden English word: therefore".to_string(),
                "Contains forbidden Albanian word: prandaj".to_string(),
                "Contains forbidden Albanian word: gjithashtu".to_string(),
            ]
        );
    }

    #[test]
    fn test_issue_order_follows_rule_order() {
        let v = validator().validate(
            "Furthermore, the methodology requires significant analysis of the whole thing",
            "...",
        );
        assert_eq!(v.issues[0], "English has 10 words, max is 8");
        assert_eq!(v.issues[1], "English has 77 characters, max is 50");
        assert_eq!(v.issues[2], "Contains forbidden English word: furthermore");
        assert_eq!(
            v.issues.last().unwrap(),
            "Contains abstract or academic concepts"
        );
    }

    #[test]
    fn test_empty_academic_terms_disable_rule() {
        let rules = ValidationRules {
            academic_terms: Vec::new(),
            ..ValidationRules::default()
        };
        let v = ContentValidator::new(rules)
            .unwrap()
            .validate("A study of birds", "Zogjtë");
        assert!(v.is_valid);
    }
}
