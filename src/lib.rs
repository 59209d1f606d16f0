//! # Phrasegate
//!
//! A batch quality gate for bilingual (English/Albanian) curriculum content.
//!
//! Phrasegate scans a lesson database for phrases that are too long or too
//! academic for beginners, infers which curriculum unit each item belongs to,
//! and replaces failing items with validated template content drawn from that
//! unit. Every run writes a JSON report of what changed.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌──────────────┐   ┌──────────┐
//! │  SQLite  │──▶│  Validator  │──▶│  Classifier  │──▶│Generator │
//! │ lessons  │   │ (scan)      │   │ (unit)       │   │(template)│
//! └────▲─────┘   └─────────────┘   └──────────────┘   └────┬─────┘
//!      │                                                   │
//!      └──────────────── update + report ◀─────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! pgate init                        # create database
//! pgate import fixtures.json        # load lessons and items
//! pgate scan                        # list failing items
//! pgate test                        # preview one replacement
//! pgate replace                     # replace everything flagged
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite content store |
//! | [`replace`] | Scan and replacement pipeline |
//! | [`progress`] | Replacement progress reporting |
//! | [`generate_cmd`] | Database-free validate and generate commands |
//! | [`import`] | JSON fixture import |
//! | [`purge`] | Bulk deletion of inappropriate content |
//! | [`stats`] | Database statistics |

pub mod config;
pub mod db;
pub mod generate_cmd;
pub mod import;
pub mod migrate;
pub mod progress;
pub mod purge;
pub mod replace;
pub mod sqlite_store;
pub mod stats;
