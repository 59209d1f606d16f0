//! # Phrasegate Core
//!
//! Pure logic for Phrasegate: the content quality gate, the curriculum
//! template bank, seedable content generation, unit classification, run
//! reporting, and the content store abstraction.
//!
//! This crate contains no tokio, sqlx, or filesystem I/O. Every component
//! receives its rules, templates, and randomness as explicit arguments, so
//! tests can substitute fixtures.

pub mod classify;
pub mod error;
pub mod generate;
pub mod models;
pub mod purge;
pub mod report;
pub mod store;
pub mod templates;
pub mod validate;

pub use error::GenerateError;
