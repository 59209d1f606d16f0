//! Template-based content generation.
//!
//! [`ContentGenerator`] draws template pairs from a [`UnitTemplateBank`],
//! fills their placeholders from the bank's pool, and scores every draw with
//! the injected [`ContentValidator`]. All randomness comes from the injected
//! RNG, so a seeded generator reproduces the same sequence of draws.
//!
//! # Replacement search
//!
//! [`ContentGenerator::generate_replacement`] walks units downward from the
//! target unit to unit 1. At each unit it draws up to `attempts_per_unit`
//! phrase candidates and keeps the best-scoring valid one. The walk is a
//! bounded loop, so a bank with no usable content always ends in
//! [`GenerateError::Exhausted`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::classify::UnitClassifier;
use crate::error::GenerateError;
use crate::models::{ContentKind, TemplatePair};
use crate::templates::{Placeholder, PlaceholderPool, UnitTemplateBank};
use crate::validate::{ContentValidator, ValidationVerdict};

/// Candidates drawn per unit before stepping down.
pub const DEFAULT_ATTEMPTS_PER_UNIT: usize = 5;

/// A filled template together with its verdict.
///
/// The verdict is always computed; callers decide whether an invalid
/// candidate is acceptable.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub pair: TemplatePair,
    pub unit_number: u32,
    pub content_type: ContentKind,
    pub validation: ValidationVerdict,
}

/// A validated replacement chosen by the escalation search.
#[derive(Debug, Clone, Serialize)]
pub struct Replacement {
    #[serde(flatten)]
    pub pair: TemplatePair,
    /// Unit the search started from.
    pub requested_unit: u32,
    /// Unit the winning candidate was drawn from (≤ `requested_unit`).
    pub unit_number: u32,
    pub validation_score: u32,
}

/// Anything that can produce a replacement for a flagged item.
///
/// The batch replacer depends on this seam rather than on
/// [`ContentGenerator`] directly.
pub trait ReplacementSource {
    fn replacement_for(
        &mut self,
        original_source: &str,
        original_target: &str,
        unit_hint: Option<u32>,
    ) -> Result<Replacement, GenerateError>;
}

pub struct ContentGenerator<R = StdRng> {
    bank: UnitTemplateBank,
    validator: ContentValidator,
    classifier: UnitClassifier,
    rng: R,
    attempts_per_unit: usize,
}

impl ContentGenerator<StdRng> {
    /// Generator backed by [`StdRng`], seeded when `seed` is given and from
    /// OS entropy otherwise.
    pub fn seeded(bank: UnitTemplateBank, validator: ContentValidator, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self::new(bank, validator, rng)
    }
}

impl<R: Rng> ContentGenerator<R> {
    pub fn new(bank: UnitTemplateBank, validator: ContentValidator, rng: R) -> Self {
        Self {
            bank,
            validator,
            classifier: UnitClassifier::new(),
            rng,
            attempts_per_unit: DEFAULT_ATTEMPTS_PER_UNIT,
        }
    }

    /// Override the number of draws per unit. Values below 1 are raised to 1.
    pub fn with_attempts_per_unit(mut self, attempts: usize) -> Self {
        self.attempts_per_unit = attempts.max(1);
        self
    }

    pub fn bank(&self) -> &UnitTemplateBank {
        &self.bank
    }

    pub fn validator(&self) -> &ContentValidator {
        &self.validator
    }

    pub fn classifier(&self) -> &UnitClassifier {
        &self.classifier
    }

    /// Draw one template uniformly at random, fill it, and score it.
    pub fn generate_for_unit(
        &mut self,
        unit: u32,
        kind: ContentKind,
    ) -> Result<Candidate, GenerateError> {
        let template = self
            .bank
            .templates_for(unit, kind)
            .choose(&mut self.rng)
            .cloned()
            .ok_or(GenerateError::UnknownUnit { unit, kind })?;

        let pair = fill_template(&template, self.bank.placeholders(), &mut self.rng)?;
        let validation = self.validator.validate(&pair.source, &pair.target);

        Ok(Candidate {
            pair,
            unit_number: unit,
            content_type: kind,
            validation,
        })
    }

    /// Find a valid phrase to replace flagged content.
    ///
    /// Starts at `unit_hint`, or at the classifier's guess for
    /// `original_source`, and steps down toward unit 1 when a unit yields no
    /// valid candidate. Malformed templates are skipped.
    pub fn generate_replacement(
        &mut self,
        original_source: &str,
        _original_target: &str,
        unit_hint: Option<u32>,
    ) -> Result<Replacement, GenerateError> {
        let requested = unit_hint.unwrap_or_else(|| self.classifier.classify(original_source));
        // Units above the bank's highest have no templates.
        let first = requested.min(self.bank.highest_unit().unwrap_or(0));

        for unit in (1..=first).rev() {
            let mut best: Option<Candidate> = None;

            for _ in 0..self.attempts_per_unit {
                match self.generate_for_unit(unit, ContentKind::Phrase) {
                    Ok(candidate) if candidate.validation.is_valid => {
                        let better = best
                            .as_ref()
                            .map_or(true, |b| candidate.validation.score > b.validation.score);
                        if better {
                            best = Some(candidate);
                        }
                    }
                    Ok(_) | Err(GenerateError::MalformedTemplate { .. }) => {}
                    Err(GenerateError::UnknownUnit { .. }) => break,
                    Err(e) => return Err(e),
                }
            }

            if let Some(winner) = best {
                return Ok(Replacement {
                    pair: winner.pair,
                    requested_unit: requested,
                    unit_number: unit,
                    validation_score: winner.validation.score,
                });
            }
        }

        Err(GenerateError::Exhausted {
            start_unit: requested,
        })
    }

    /// Draw `count` items for `unit`, alternating phrase and sentence
    /// templates, and keep the valid ones.
    ///
    /// Fails only when the unit has no templates of any kind.
    pub fn generate_batch(
        &mut self,
        unit: u32,
        count: usize,
    ) -> Result<Vec<Candidate>, GenerateError> {
        if ContentKind::ALL
            .iter()
            .all(|k| self.bank.templates_for(unit, *k).is_empty())
        {
            return Err(GenerateError::UnknownUnit {
                unit,
                kind: ContentKind::Phrase,
            });
        }

        let mut results = Vec::new();
        for i in 0..count {
            let kind = ContentKind::ALL[i % ContentKind::ALL.len()];
            if let Ok(candidate) = self.generate_for_unit(unit, kind) {
                if candidate.validation.is_valid {
                    results.push(candidate);
                }
            }
        }
        Ok(results)
    }
}

impl<R: Rng> ReplacementSource for ContentGenerator<R> {
    fn replacement_for(
        &mut self,
        original_source: &str,
        original_target: &str,
        unit_hint: Option<u32>,
    ) -> Result<Replacement, GenerateError> {
        self.generate_replacement(original_source, original_target, unit_hint)
    }
}

/// Substitute every placeholder in both texts with one value drawn from the
/// pool. The same value is used for every occurrence within a draw.
fn fill_template<R: Rng>(
    template: &TemplatePair,
    pool: &PlaceholderPool,
    rng: &mut R,
) -> Result<TemplatePair, GenerateError> {
    let mut placeholders = placeholders_in(&template.source)?;
    for p in placeholders_in(&template.target)? {
        if !placeholders.contains(&p) {
            placeholders.push(p);
        }
    }

    let mut source = template.source.clone();
    let mut target = template.target.clone();
    for placeholder in placeholders {
        let value = pool
            .values(placeholder)
            .choose(rng)
            .ok_or_else(|| GenerateError::missing_value(&template.source, placeholder))?;
        source = source.replace(placeholder.token(), &value.source);
        target = target.replace(placeholder.token(), &value.target);
    }

    Ok(TemplatePair { source, target })
}

/// Placeholders in order of first appearance.
fn placeholders_in(text: &str) -> Result<Vec<Placeholder>, GenerateError> {
    let mut found = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| GenerateError::MalformedTemplate {
                template: text.to_string(),
                reason: "unterminated placeholder".to_string(),
            })?;
        let name = &after[..close];
        let placeholder =
            Placeholder::from_name(name).ok_or_else(|| GenerateError::MalformedTemplate {
                template: text.to_string(),
                reason: format!("unknown placeholder {{{}}}", name),
            })?;
        if !found.contains(&placeholder) {
            found.push(placeholder);
        }
        rest = &after[close + 1..];
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::UnitVocabularyProfile;
    use crate::validate::ValidationRules;
    use std::collections::{BTreeMap, BTreeSet};

    fn validator() -> ContentValidator {
        ContentValidator::new(ValidationRules::default()).unwrap()
    }

    fn generator(seed: u64) -> ContentGenerator {
        ContentGenerator::seeded(UnitTemplateBank::builtin(), validator(), Some(seed))
    }

    fn unit(number: u32, phrases: &[(&str, &str)]) -> UnitVocabularyProfile {
        let mut templates = BTreeMap::new();
        templates.insert(
            ContentKind::Phrase,
            phrases
                .iter()
                .map(|(s, t)| TemplatePair::new(*s, *t))
                .collect(),
        );
        UnitVocabularyProfile {
            unit_number: number,
            title: format!("Unit {}", number),
            key_vocabulary: BTreeSet::new(),
            templates,
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let mut a = generator(7);
        let mut b = generator(7);
        for _ in 0..20 {
            let x = a.generate_for_unit(1, ContentKind::Phrase).unwrap();
            let y = b.generate_for_unit(1, ContentKind::Phrase).unwrap();
            assert_eq!(x.pair, y.pair);
        }
    }

    #[test]
    fn test_placeholders_are_filled_consistently() {
        let mut g = generator(3);
        for _ in 0..50 {
            let c = g.generate_for_unit(1, ContentKind::Phrase).unwrap();
            assert!(!c.pair.source.contains('{'), "{}", c.pair.source);
            assert!(!c.pair.target.contains('{'), "{}", c.pair.target);
            if let Some(name) = c.pair.source.strip_prefix("Hello, my name is ") {
                assert_eq!(c.pair.target, format!("Përshëndetje, unë quhem {}", name));
            }
            if c.pair.source == "I am fifteen years old" {
                assert_eq!(c.pair.target, "Unë jam pesëmbëdhjetë vjeç");
            }
        }
    }

    #[test]
    fn test_generate_for_unit_attaches_verdict() {
        let bank = UnitTemplateBank::new(
            vec![unit(1, &[("The research is ongoing", "Kërkime")])],
            PlaceholderPool::builtin(),
        );
        let mut g = ContentGenerator::seeded(bank, validator(), Some(1));
        let c = g.generate_for_unit(1, ContentKind::Phrase).unwrap();
        assert!(!c.validation.is_valid);
        assert_eq!(c.unit_number, 1);
        assert_eq!(c.content_type, ContentKind::Phrase);
    }

    #[test]
    fn test_unknown_unit_errors() {
        let mut g = generator(1);
        assert_eq!(
            g.generate_for_unit(9, ContentKind::Phrase).unwrap_err(),
            GenerateError::UnknownUnit {
                unit: 9,
                kind: ContentKind::Phrase
            }
        );
    }

    #[test]
    fn test_missing_pool_value_is_malformed() {
        let bank = UnitTemplateBank::new(
            vec![unit(1, &[("Hello {name}", "Përshëndetje {name}")])],
            PlaceholderPool::default(),
        );
        let mut g = ContentGenerator::seeded(bank, validator(), Some(1));
        assert!(matches!(
            g.generate_for_unit(1, ContentKind::Phrase),
            Err(GenerateError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_unknown_and_unterminated_placeholders_are_malformed() {
        assert!(placeholders_in("Welcome to {city}").is_err());
        assert!(placeholders_in("Broken {name").is_err());
        assert_eq!(
            placeholders_in("{age} and {name} and {age}").unwrap(),
            vec![Placeholder::Age, Placeholder::Name]
        );
    }

    #[test]
    fn test_replacement_uses_hint_and_validates() {
        let mut g = generator(11);
        let r = g
            .generate_replacement("The methodology is complex", "...", Some(2))
            .unwrap();
        assert_eq!(r.requested_unit, 2);
        assert_eq!(r.unit_number, 2);
        assert_eq!(r.validation_score, 100);
        assert!(g.validator().validate(&r.pair.source, &r.pair.target).is_valid);
    }

    #[test]
    fn test_replacement_classifies_without_hint() {
        let mut g = generator(5);
        let r = g
            .generate_replacement("We discuss food in depth", "...", None)
            .unwrap();
        assert_eq!(r.requested_unit, 5);
    }

    #[test]
    fn test_replacement_escalates_to_simpler_unit() {
        let bank = UnitTemplateBank::new(
            vec![
                unit(1, &[("Good morning", "Mirëmëngjes")]),
                unit(2, &[("The research on family theory", "Kërkime")]),
                unit(3, &[("Advanced methodology", "Metodologji")]),
            ],
            PlaceholderPool::builtin(),
        );
        let mut g = ContentGenerator::seeded(bank, validator(), Some(9));
        let r = g.generate_replacement("anything", "...", Some(3)).unwrap();
        assert_eq!(r.requested_unit, 3);
        assert_eq!(r.unit_number, 1);
        assert_eq!(r.pair.source, "Good morning");
    }

    #[test]
    fn test_escalation_terminates_at_unit_one() {
        let bank = UnitTemplateBank::new(
            vec![unit(1, &[("A complex theory", "Teori")])],
            PlaceholderPool::builtin(),
        );
        let mut g = ContentGenerator::seeded(bank, validator(), Some(2));
        assert_eq!(
            g.generate_replacement("Hello", "Tung", Some(1)).unwrap_err(),
            GenerateError::Exhausted { start_unit: 1 }
        );
    }

    #[test]
    fn test_hint_above_bank_is_bounded() {
        let mut g = generator(4);
        let r = g
            .generate_replacement("anything", "...", Some(1_000_000))
            .unwrap();
        assert_eq!(r.requested_unit, 1_000_000);
        assert!(r.unit_number <= 8);
    }

    #[test]
    fn test_malformed_templates_are_skipped() {
        let bank = UnitTemplateBank::new(
            vec![unit(
                1,
                &[("Welcome to {city}", "Mirë se vini në {city}"), ("Please", "Ju lutem")],
            )],
            PlaceholderPool::builtin(),
        );
        let mut g = ContentGenerator::seeded(bank, validator(), Some(8))
            .with_attempts_per_unit(40);
        let r = g.generate_replacement("x", "y", Some(1)).unwrap();
        assert_eq!(r.pair.source, "Please");
    }

    #[test]
    fn test_batch_keeps_only_valid_items() {
        let mut g = generator(21);
        let batch = g.generate_batch(5, 30).unwrap();
        assert!(!batch.is_empty());
        assert!(batch.len() <= 30);
        for c in &batch {
            assert!(c.validation.is_valid);
            assert_eq!(c.unit_number, 5);
            // Nine Albanian words, always rejected.
            assert_ne!(c.pair.source, "I prefer fresh fruit for snacks.");
        }
        assert!(g.generate_batch(42, 5).is_err());
    }
}
