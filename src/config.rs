//! TOML configuration parsing and validation.
//!
//! Only `[db]` is required. Every other section falls back to the built-in
//! defaults, which reproduce the freshman content rules.
//!
//! ```toml
//! [db]
//! path = "./data/pgate.sqlite"
//!
//! [rules]
//! max_words = 8
//! max_chars_english = 50
//! max_chars_albanian = 60
//! extra_forbidden_english = ["paradigm"]
//!
//! [generation]
//! attempts_per_unit = 5
//! seed = 42
//! curriculum = "./data/curriculum.json"
//!
//! [replace]
//! delay_ms = 100
//! report_dir = "./data"
//! scan_preview = 10
//!
//! [purge]
//! patterns = ["research", "methodology"]
//! exempt_prefix = "In this lesson"
//! refill_per_lesson = 8
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use phrasegate_core::purge::{PurgeRules, DEFAULT_EXEMPT_PREFIX};
use phrasegate_core::templates::UnitTemplateBank;
use phrasegate_core::validate::ValidationRules;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub replace: ReplaceConfig,
    #[serde(default)]
    pub purge: PurgeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RulesConfig {
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    #[serde(default = "default_max_chars_english")]
    pub max_chars_english: usize,
    #[serde(default = "default_max_chars_albanian")]
    pub max_chars_albanian: usize,
    #[serde(default)]
    pub extra_forbidden_english: Vec<String>,
    #[serde(default)]
    pub extra_forbidden_albanian: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_words: default_max_words(),
            max_chars_english: default_max_chars_english(),
            max_chars_albanian: default_max_chars_albanian(),
            extra_forbidden_english: Vec::new(),
            extra_forbidden_albanian: Vec::new(),
        }
    }
}

fn default_max_words() -> usize {
    8
}
fn default_max_chars_english() -> usize {
    50
}
fn default_max_chars_albanian() -> usize {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_attempts_per_unit")]
    pub attempts_per_unit: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    /// JSON curriculum file. The built-in bank is used when unset.
    #[serde(default)]
    pub curriculum: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            attempts_per_unit: default_attempts_per_unit(),
            seed: None,
            curriculum: None,
        }
    }
}

fn default_attempts_per_unit() -> usize {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaceConfig {
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    #[serde(default = "default_scan_preview")]
    pub scan_preview: usize,
}

impl Default for ReplaceConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            report_dir: default_report_dir(),
            scan_preview: default_scan_preview(),
        }
    }
}

fn default_delay_ms() -> u64 {
    100
}
fn default_report_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_scan_preview() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct PurgeConfig {
    /// Replaces the built-in English patterns when set.
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
    #[serde(default)]
    pub exempt_prefix: Option<String>,
    /// Draws per affected lesson when refilling after a purge. 0 disables.
    #[serde(default = "default_refill_per_lesson")]
    pub refill_per_lesson: usize,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            patterns: None,
            exempt_prefix: None,
            refill_per_lesson: default_refill_per_lesson(),
        }
    }
}

fn default_refill_per_lesson() -> usize {
    8
}

impl Config {
    /// Defaults for commands that never touch the database.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/pgate.sqlite"),
            },
            rules: RulesConfig::default(),
            generation: GenerationConfig::default(),
            replace: ReplaceConfig::default(),
            purge: PurgeConfig::default(),
        }
    }

    /// Built-in rules with the configured ceilings and extra vocabulary.
    pub fn validation_rules(&self) -> ValidationRules {
        let mut rules = ValidationRules {
            max_words: self.rules.max_words,
            max_chars_source: self.rules.max_chars_english,
            max_chars_target: self.rules.max_chars_albanian,
            ..ValidationRules::default()
        };
        rules.forbidden_source.extend(
            self.rules
                .extra_forbidden_english
                .iter()
                .map(|w| w.to_lowercase()),
        );
        rules.forbidden_target.extend(
            self.rules
                .extra_forbidden_albanian
                .iter()
                .map(|w| w.to_lowercase()),
        );
        rules
    }

    pub fn purge_rules(&self) -> PurgeRules {
        let defaults = PurgeRules::default();
        PurgeRules {
            source_patterns: self
                .purge
                .patterns
                .clone()
                .unwrap_or(defaults.source_patterns),
            target_patterns: defaults.target_patterns,
            max_chars_source: self.rules.max_chars_english,
            max_chars_target: self.rules.max_chars_albanian,
            exempt_prefix: Some(
                self.purge
                    .exempt_prefix
                    .clone()
                    .unwrap_or_else(|| DEFAULT_EXEMPT_PREFIX.to_string()),
            )
            .filter(|p| !p.is_empty()),
        }
    }

    /// Load the curriculum bank named in `[generation]`, or the built-in one.
    pub fn template_bank(&self) -> Result<UnitTemplateBank> {
        match &self.generation.curriculum {
            Some(path) => {
                let json = std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read curriculum file: {}", path.display())
                })?;
                UnitTemplateBank::from_json(&json)
                    .with_context(|| format!("Invalid curriculum file: {}", path.display()))
            }
            None => Ok(UnitTemplateBank::builtin()),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate rules
    if config.rules.max_words == 0 {
        anyhow::bail!("rules.max_words must be >= 1");
    }
    if config.rules.max_chars_english == 0 || config.rules.max_chars_albanian == 0 {
        anyhow::bail!("rules.max_chars_english and rules.max_chars_albanian must be >= 1");
    }

    // Validate generation
    if config.generation.attempts_per_unit == 0 {
        anyhow::bail!("generation.attempts_per_unit must be >= 1");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let file = write_config("[db]\npath = \"./x.sqlite\"\n");
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.rules.max_words, 8);
        assert_eq!(cfg.generation.attempts_per_unit, 5);
        assert_eq!(cfg.replace.delay_ms, 100);
        assert_eq!(cfg.replace.scan_preview, 10);
        assert_eq!(cfg.purge.refill_per_lesson, 8);
        assert!(cfg.generation.seed.is_none());
    }

    #[test]
    fn test_rules_overrides_flow_into_validation() {
        let file = write_config(
            "[db]\npath = \"./x.sqlite\"\n\n[rules]\nmax_words = 3\nextra_forbidden_english = [\"Homework\"]\n",
        );
        let cfg = load_config(file.path()).unwrap();
        let rules = cfg.validation_rules();
        assert_eq!(rules.max_words, 3);
        assert!(rules.forbidden_source.contains("homework"));
        assert!(rules.forbidden_source.contains("research"));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let file =
            write_config("[db]\npath = \"./x.sqlite\"\n\n[generation]\nattempts_per_unit = 0\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_zero_word_ceiling_rejected() {
        let file = write_config("[db]\npath = \"./x.sqlite\"\n\n[rules]\nmax_words = 0\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_curriculum_file_is_an_error() {
        let mut cfg = Config::minimal();
        cfg.generation.curriculum = Some(PathBuf::from("/nonexistent/curriculum.json"));
        assert!(cfg.template_bank().is_err());
    }

    #[test]
    fn test_empty_exempt_prefix_disables_exemption() {
        let mut cfg = Config::minimal();
        cfg.purge.exempt_prefix = Some(String::new());
        assert!(cfg.purge_rules().exempt_prefix.is_none());
    }

    #[test]
    fn test_refill_can_be_disabled() {
        let file =
            write_config("[db]\npath = \"./x.sqlite\"\n\n[purge]\nrefill_per_lesson = 0\n");
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.purge.refill_per_lesson, 0);
    }
}
