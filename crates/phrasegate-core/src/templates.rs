//! Static curriculum template bank.
//!
//! Maps each curriculum unit to its vocabulary profile and its literal
//! template pairs, grouped by [`ContentKind`]. The bank holds data only:
//! placeholder values live in a [`PlaceholderPool`] and are chosen by the
//! generator, never by the bank.
//!
//! The built-in bank covers eight units, from greetings (unit 1) up to
//! future plans (unit 8). A bank can also be loaded from a JSON curriculum
//! file with [`UnitTemplateBank::from_json`].

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::models::{ContentKind, TemplatePair};

/// The closed set of placeholder tokens a template may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placeholder {
    Name,
    Age,
}

impl Placeholder {
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::Name => "{name}",
            Placeholder::Age => "{age}",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Placeholder::Name),
            "age" => Some(Placeholder::Age),
            _ => None,
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One substitution value, spelled in both languages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaceholderValue {
    #[serde(rename = "english")]
    pub source: String,
    #[serde(rename = "albanian")]
    pub target: String,
}

impl PlaceholderValue {
    fn same(value: &str) -> Self {
        Self {
            source: value.to_string(),
            target: value.to_string(),
        }
    }

    fn pair(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// Bounded substitution pool per placeholder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PlaceholderPool {
    values: BTreeMap<Placeholder, Vec<PlaceholderValue>>,
}

impl PlaceholderPool {
    pub fn builtin() -> Self {
        let mut values = BTreeMap::new();
        values.insert(
            Placeholder::Name,
            ["Ana", "Mark", "Sara", "David", "Elena", "John"]
                .iter()
                .map(|n| PlaceholderValue::same(n))
                .collect(),
        );
        values.insert(
            Placeholder::Age,
            vec![
                PlaceholderValue::pair("fourteen", "katërmbëdhjetë"),
                PlaceholderValue::pair("fifteen", "pesëmbëdhjetë"),
                PlaceholderValue::pair("sixteen", "gjashtëmbëdhjetë"),
            ],
        );
        Self { values }
    }

    /// Values available for `placeholder`; empty when none are configured.
    pub fn values(&self, placeholder: Placeholder) -> &[PlaceholderValue] {
        self.values
            .get(&placeholder)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Vocabulary and templates for one curriculum unit.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitVocabularyProfile {
    pub unit_number: u32,
    #[serde(default)]
    pub title: String,
    /// Informational only; not enforced by the validator.
    #[serde(default)]
    pub key_vocabulary: BTreeSet<String>,
    #[serde(default)]
    pub templates: BTreeMap<ContentKind, Vec<TemplatePair>>,
}

impl UnitVocabularyProfile {
    fn new(unit_number: u32, title: &str, key_vocabulary: &[&str]) -> Self {
        Self {
            unit_number,
            title: title.to_string(),
            key_vocabulary: key_vocabulary.iter().map(|w| w.to_string()).collect(),
            templates: BTreeMap::new(),
        }
    }

    fn with(mut self, kind: ContentKind, pairs: &[(&str, &str)]) -> Self {
        self.templates.insert(
            kind,
            pairs
                .iter()
                .map(|(s, t)| TemplatePair::new(*s, *t))
                .collect(),
        );
        self
    }
}

#[derive(Deserialize)]
struct CurriculumFile {
    #[serde(default)]
    placeholders: Option<PlaceholderPool>,
    units: Vec<UnitVocabularyProfile>,
}

/// Keyed table of unit profiles plus the placeholder pool.
#[derive(Debug, Clone)]
pub struct UnitTemplateBank {
    units: BTreeMap<u32, UnitVocabularyProfile>,
    placeholders: PlaceholderPool,
}

impl UnitTemplateBank {
    pub fn new(units: Vec<UnitVocabularyProfile>, placeholders: PlaceholderPool) -> Self {
        Self {
            units: units.into_iter().map(|u| (u.unit_number, u)).collect(),
            placeholders,
        }
    }

    /// Parse a JSON curriculum file.
    ///
    /// Fails on malformed JSON, an empty unit list, duplicate unit numbers,
    /// or unit 0. A missing `placeholders` object falls back to the
    /// built-in pool.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CurriculumFile =
            serde_json::from_str(json).context("Failed to parse curriculum JSON")?;

        if file.units.is_empty() {
            bail!("curriculum must define at least one unit");
        }
        let mut seen = BTreeSet::new();
        for unit in &file.units {
            if unit.unit_number == 0 {
                bail!("unit numbers start at 1 (found unit 0)");
            }
            if !seen.insert(unit.unit_number) {
                bail!("duplicate unit {} in curriculum", unit.unit_number);
            }
        }

        Ok(Self::new(
            file.units,
            file.placeholders.unwrap_or_else(PlaceholderPool::builtin),
        ))
    }

    /// Templates for `(unit, kind)`. Unknown combinations yield an empty slice.
    pub fn templates_for(&self, unit: u32, kind: ContentKind) -> &[TemplatePair] {
        self.units
            .get(&unit)
            .and_then(|u| u.templates.get(&kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn profile(&self, unit: u32) -> Option<&UnitVocabularyProfile> {
        self.units.get(&unit)
    }

    pub fn unit_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.units.keys().copied()
    }

    pub fn highest_unit(&self) -> Option<u32> {
        self.units.keys().next_back().copied()
    }

    pub fn placeholders(&self) -> &PlaceholderPool {
        &self.placeholders
    }

    /// The eight-unit freshman curriculum.
    pub fn builtin() -> Self {
        use ContentKind::{Phrase, Sentence};

        let units = vec![
            UnitVocabularyProfile::new(
                1,
                "Greetings & Self-Introduction",
                &["hello", "name", "morning", "thank", "please", "meet"],
            )
            .with(
                Phrase,
                &[
                    ("Hello, my name is {name}", "Përshëndetje, unë quhem {name}"),
                    ("How are you?", "Si jeni?"),
                    ("I am {age} years old", "Unë jam {age} vjeç"),
                    ("Good morning", "Mirëmëngjes"),
                    ("Thank you very much", "Faleminderit shumë"),
                    ("Please", "Ju lutem"),
                    ("I am Albanian", "Unë jam shqiptar"),
                    ("Nice to meet you", "Gëzohem që ju njoh"),
                ],
            )
            .with(
                Sentence,
                &[
                    (
                        "My name is Maria and I am fifteen.",
                        "Unë quhem Maria dhe jam pesëmbëdhjetë vjeç.",
                    ),
                    ("Hello, how are you today?", "Përshëndetje, si jeni sot?"),
                    ("I am fine, thank you.", "Unë jam mirë, faleminderit."),
                    ("Good afternoon, teacher.", "Mirëdita, mësues."),
                ],
            ),
            UnitVocabularyProfile::new(
                2,
                "Family & Relationships",
                &["family", "mother", "father", "brother", "sister", "grandmother"],
            )
            .with(
                Phrase,
                &[
                    ("This is my mother", "Kjo është nëna ime"),
                    ("My father is tall", "Babai im është i lartë"),
                    ("I have one brother", "Unë kam një vëlla"),
                    ("My sister is young", "Motra ime është e re"),
                    ("My family is big", "Familja ime është e madhe"),
                    ("This is my grandmother", "Kjo është gjyshja ime"),
                    ("My grandfather is kind", "Gjyshi im është i mirë"),
                ],
            )
            .with(
                Sentence,
                &[
                    (
                        "I live with my parents and sister.",
                        "Unë jetoj me prindërit dhe motrën.",
                    ),
                    (
                        "My brother goes to university.",
                        "Vëllai im shkon në universitet.",
                    ),
                    ("We are a happy family.", "Ne jemi një familje e lumtur."),
                    (
                        "My grandmother makes good food.",
                        "Gjyshja ime gatuan ushqim të mirë.",
                    ),
                ],
            ),
            UnitVocabularyProfile::new(
                3,
                "School Life",
                &["school", "teacher", "book", "pencil", "classroom", "homework"],
            )
            .with(
                Phrase,
                &[
                    ("I go to school", "Unë shkoj në shkollë"),
                    ("My teacher is nice", "Mësuesi im është i mirë"),
                    ("I like mathematics", "Mua më pëlqen matematika"),
                    ("This is my book", "Ky është libri im"),
                    ("I have a pencil", "Unë kam një laps"),
                    ("The classroom is big", "Klasa është e madhe"),
                    ("History is interesting", "Historia është interesante"),
                ],
            )
            .with(
                Sentence,
                &[
                    ("I study Albanian at school.", "Unë studioj shqip në shkollë."),
                    (
                        "My favorite subject is art.",
                        "Lënda ime e preferuar është arti.",
                    ),
                    ("We have homework every day.", "Ne kemi detyra çdo ditë."),
                    ("The students are friendly.", "Nxënësit janë miqësorë."),
                ],
            ),
            UnitVocabularyProfile::new(
                4,
                "Home & Daily Life",
                &["home", "room", "kitchen", "house", "bed", "breakfast"],
            )
            .with(
                Phrase,
                &[
                    ("My room is small", "Dhoma ime është e vogël"),
                    ("This is our kitchen", "Kjo është kuzina jonë"),
                    ("I sleep in my bed", "Unë fle në shtratin tim"),
                    ("The house is beautiful", "Shtëpia është e bukur"),
                    ("I watch television", "Unë shikoj televizor"),
                    ("We eat breakfast", "Ne hamë mëngjes"),
                    ("I help at home", "Unë ndihmoj në shtëpi"),
                ],
            )
            .with(
                Sentence,
                &[
                    (
                        "I wake up at seven in the morning.",
                        "Unë zgjohem në orën shtatë të mëngjesit.",
                    ),
                    (
                        "My family eats dinner together.",
                        "Familja ime ha darkë së bashku.",
                    ),
                    (
                        "I clean my room on Saturday.",
                        "Unë pastroj dhomën time të shtunën.",
                    ),
                    (
                        "We relax in the living room.",
                        "Ne çlodhemi në dhomën e ndenjjes.",
                    ),
                ],
            ),
            UnitVocabularyProfile::new(
                5,
                "Food & Eating",
                &["food", "bread", "water", "fruit", "milk", "coffee"],
            )
            .with(
                Phrase,
                &[
                    ("I like bread", "Mua më pëlqen buka"),
                    ("This is good food", "Ky është ushqim i mirë"),
                    ("I want water", "Unë dua ujë"),
                    ("We eat fruit", "Ne hamë fruta"),
                    ("Milk is healthy", "Qumështi është i shëndetshëm"),
                    ("I drink coffee", "Unë pi kafe"),
                    ("Vegetables are important", "Perimet janë të rëndësishme"),
                ],
            )
            .with(
                Sentence,
                &[
                    (
                        "I eat breakfast at home every day.",
                        "Unë ha mëngjes në shtëpi çdo ditë.",
                    ),
                    (
                        "My mother cooks delicious meals.",
                        "Nëna ime gatuan ushqime të shijshme.",
                    ),
                    (
                        "We buy groceries at the market.",
                        "Ne blejmë ushqime në treg.",
                    ),
                    (
                        "I prefer fresh fruit for snacks.",
                        "Unë preferoj fruta të freskëta për ushqime të vogla.",
                    ),
                ],
            ),
            UnitVocabularyProfile::new(
                6,
                "Weather & Seasons",
                &["sunny", "rain", "summer", "winter", "wind", "spring"],
            )
            .with(
                Phrase,
                &[
                    ("Today is sunny", "Sot bën diell"),
                    ("It is raining", "Po bie shi"),
                    ("I like summer", "Mua më pëlqen vera"),
                    ("Winter is cold", "Dimri është i ftohtë"),
                    ("The wind is strong", "Era është e fortë"),
                    ("Spring is beautiful", "Pranvera është e bukur"),
                    ("It will snow tomorrow", "Nesër do të bjerë borë"),
                ],
            )
            .with(
                Sentence,
                &[
                    ("We play outside when it's sunny.", "Ne luajmë jashtë kur bën diell."),
                    ("I wear a coat in winter.", "Unë vesh pallto në dimër."),
                    ("The flowers bloom in spring.", "Lulet çelin në pranverë."),
                    ("Swimming is fun in summer.", "Noti është argëtues në verë."),
                ],
            ),
            UnitVocabularyProfile::new(
                7,
                "Free Time & Hobbies",
                &["football", "music", "reading", "movies", "sports", "friends"],
            )
            .with(
                Phrase,
                &[
                    ("I play football", "Unë luaj futboll"),
                    ("Music is fun", "Muzika është argëtuese"),
                    ("I like reading", "Mua më pëlqen leximi"),
                    ("We watch movies", "Ne shikojmë filma"),
                    ("Sports are healthy", "Sportet janë të shëndetshme"),
                    ("I meet my friends", "Unë takoj miqtë e mi"),
                    ("Games are entertaining", "Lojërat janë argëtuese"),
                ],
            )
            .with(
                Sentence,
                &[
                    (
                        "I play basketball with my friends.",
                        "Unë luaj basketboll me miqtë e mi.",
                    ),
                    (
                        "We listen to music after school.",
                        "Ne dëgjojmë muzikë pas shkollës.",
                    ),
                    ("Reading books is my hobby.", "Leximi i librave është hobi im."),
                    (
                        "My family watches TV together.",
                        "Familja ime shikon TV së bashku.",
                    ),
                ],
            ),
            UnitVocabularyProfile::new(
                8,
                "Future Plans & Dreams",
                &["dream", "travel", "future", "plans", "education", "succeed"],
            )
            .with(
                Phrase,
                &[
                    ("I want to study", "Unë dua të studioj"),
                    ("My dream is big", "Ëndrra ime është e madhe"),
                    ("I will travel", "Unë do të udhëtoj"),
                    ("The future is bright", "E ardhmja është e ndritshme"),
                    ("I have plans", "Unë kam plane"),
                    ("Education is important", "Arsimi është i rëndësishëm"),
                    ("I will succeed", "Unë do të kem sukses"),
                ],
            )
            .with(
                Sentence,
                &[
                    ("I want to become a teacher.", "Unë dua të bëhem mësues."),
                    (
                        "Next year I will study harder.",
                        "Vitin e ardhshëm do të studioj më shumë.",
                    ),
                    (
                        "My goal is to visit Albania.",
                        "Qëllimi im është të vizitoj Shqipërinë.",
                    ),
                    (
                        "I hope to learn Albanian well.",
                        "Shpresoj të mësoj shqip mirë.",
                    ),
                ],
            ),
        ];

        Self::new(units, PlaceholderPool::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_eight_units() {
        let bank = UnitTemplateBank::builtin();
        assert_eq!(bank.unit_numbers().collect::<Vec<_>>(), (1..=8).collect::<Vec<_>>());
        assert_eq!(bank.highest_unit(), Some(8));
        for unit in 1..=8 {
            for kind in ContentKind::ALL {
                assert!(
                    !bank.templates_for(unit, kind).is_empty(),
                    "unit {} {} is empty",
                    unit,
                    kind
                );
            }
        }
    }

    #[test]
    fn test_unknown_unit_or_kind_is_empty() {
        let bank = UnitTemplateBank::builtin();
        assert!(bank.templates_for(0, ContentKind::Phrase).is_empty());
        assert!(bank.templates_for(42, ContentKind::Sentence).is_empty());

        let sparse = UnitTemplateBank::new(
            vec![UnitVocabularyProfile::new(1, "Only phrases", &[])
                .with(ContentKind::Phrase, &[("Hi", "Tung")])],
            PlaceholderPool::default(),
        );
        assert!(sparse.templates_for(1, ContentKind::Sentence).is_empty());
    }

    #[test]
    fn test_builtin_pool_pairs_ages() {
        let pool = PlaceholderPool::builtin();
        let ages = pool.values(Placeholder::Age);
        assert_eq!(ages.len(), 3);
        assert_eq!(ages[1].source, "fifteen");
        assert_eq!(ages[1].target, "pesëmbëdhjetë");
        assert!(pool
            .values(Placeholder::Name)
            .iter()
            .all(|v| v.source == v.target));
    }

    #[test]
    fn test_from_json_loads_units_and_pool() {
        let json = r#"{
            "placeholders": { "name": [{ "english": "Drita", "albanian": "Drita" }] },
            "units": [
                {
                    "unit_number": 1,
                    "title": "Greetings",
                    "key_vocabulary": ["hello"],
                    "templates": {
                        "phrase": [{ "english": "Hello {name}", "albanian": "Përshëndetje {name}" }]
                    }
                }
            ]
        }"#;
        let bank = UnitTemplateBank::from_json(json).unwrap();
        assert_eq!(bank.templates_for(1, ContentKind::Phrase).len(), 1);
        assert_eq!(bank.profile(1).unwrap().title, "Greetings");
        assert_eq!(bank.placeholders().values(Placeholder::Name)[0].source, "Drita");
        assert!(bank.placeholders().values(Placeholder::Age).is_empty());
    }

    #[test]
    fn test_from_json_rejects_duplicates_and_zero() {
        let dup = r#"{"units":[{"unit_number":2},{"unit_number":2}]}"#;
        assert!(UnitTemplateBank::from_json(dup).is_err());

        let zero = r#"{"units":[{"unit_number":0}]}"#;
        assert!(UnitTemplateBank::from_json(zero).is_err());

        assert!(UnitTemplateBank::from_json(r#"{"units":[]}"#).is_err());
        assert!(UnitTemplateBank::from_json("not json").is_err());
    }
}
