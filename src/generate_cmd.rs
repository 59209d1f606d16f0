//! Commands that exercise the quality gate and the generator without a
//! database: `pgate validate`, `pgate generate`, `pgate batch`, and
//! `pgate suggest`.
//!
//! Each prints pretty JSON on stdout so it can be piped into other tools.

use anyhow::Result;
use serde::Serialize;

use phrasegate_core::generate::Replacement;
use phrasegate_core::models::ContentKind;
use phrasegate_core::validate::ValidationVerdict;

use crate::config::Config;
use crate::replace::{build_generator, build_validator};

/// Default number of draws for `pgate batch`.
pub const DEFAULT_BATCH_COUNT: usize = 20;

/// Output of `pgate suggest`.
#[derive(Serialize)]
struct Suggestion<'a> {
    english: &'a str,
    albanian: &'a str,
    validation: ValidationVerdict,
    replacement: Replacement,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn run_validate(config: &Config, english: &str, albanian: &str) -> Result<()> {
    let validator = build_validator(config)?;
    print_json(&validator.validate(english, albanian))
}

pub fn run_generate(config: &Config, unit: u32, kind: ContentKind) -> Result<()> {
    let mut generator = build_generator(config)?;
    let candidate = generator.generate_for_unit(unit, kind)?;
    print_json(&candidate)
}

pub fn run_batch(config: &Config, unit: u32, count: Option<usize>) -> Result<()> {
    let mut generator = build_generator(config)?;
    let batch = generator.generate_batch(unit, count.unwrap_or(DEFAULT_BATCH_COUNT))?;
    if batch.is_empty() {
        eprintln!("Warning: no valid content generated for unit {}", unit);
    }
    print_json(&batch)
}

/// Pick a replacement for one literal pair. Without `unit` the target unit
/// is classified from the English text.
pub fn run_suggest(
    config: &Config,
    english: &str,
    albanian: &str,
    unit: Option<u32>,
) -> Result<()> {
    let validator = build_validator(config)?;
    let mut generator = build_generator(config)?;
    let replacement = generator.generate_replacement(english, albanian, unit)?;
    print_json(&Suggestion {
        english,
        albanian,
        validation: validator.validate(english, albanian),
        replacement,
    })
}
