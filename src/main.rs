//! # Phrasegate CLI (`pgate`)
//!
//! The `pgate` binary is the primary interface for Phrasegate. It provides
//! commands for database setup, fixture import, scanning, replacement, and
//! trying out the quality gate and generator by hand.
//!
//! ## Usage
//!
//! ```bash
//! pgate --config ./config/pgate.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pgate init` | Create the SQLite database and run schema migrations |
//! | `pgate import <file>` | Load lessons and content items from a JSON fixture |
//! | `pgate scan` | List items that fail the quality gate |
//! | `pgate replace [limit]` | Replace flagged items and write a report |
//! | `pgate test` | Preview a replacement for the first flagged item |
//! | `pgate validate <en> <sq>` | Print the verdict for one pair |
//! | `pgate generate <unit>` | Print one generated candidate |
//! | `pgate batch <unit> [count]` | Print a batch of valid candidates |
//! | `pgate suggest <en> <sq> [--unit N]` | Print a replacement for one pair |
//! | `pgate purge` | Delete inappropriate items and refill their lessons |
//! | `pgate stats` | Show database statistics |
//!
//! ## Examples
//!
//! ```bash
//! # Check a pair against the rules
//! pgate validate "Good morning" "Mirëmëngjes"
//!
//! # Replace at most 50 items, with JSON progress on stderr
//! pgate replace 50 --progress json --config ./config/pgate.toml
//!
//! # See what a purge would remove
//! pgate purge --dry-run
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use phrasegate::config;
use phrasegate::progress::ProgressMode;
use phrasegate::{generate_cmd, import, migrate, purge, replace, stats};
use phrasegate_core::models::ContentKind;

/// Phrasegate CLI: a batch quality gate for bilingual curriculum content.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/pgate.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "pgate",
    about = "Phrasegate: validate, classify, and replace bilingual curriculum content",
    version,
    long_about = "Phrasegate scans a lesson database for English/Albanian phrases that are too \
    long or too academic for beginners, and replaces them with validated template content \
    from the matching curriculum unit."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/pgate.toml`. The database-free commands
    /// (`validate`, `generate`, `batch`, `suggest`) fall back to built-in
    /// defaults when the file is missing.
    #[arg(long, global = true, default_value = "./config/pgate.toml")]
    config: PathBuf,

    /// Progress output: `auto` (human on a TTY), `off`, `human`, or `json`.
    #[arg(long, global = true, default_value = "auto")]
    progress: ProgressMode,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file with the `lessons` and
    /// `lesson_content` tables. Running it more than once is safe.
    Init,

    /// Load lessons and content items from a JSON fixture.
    Import {
        /// Path to a `{ "lessons": [...], "items": [...] }` file.
        file: PathBuf,
    },

    /// List items that fail the quality gate. Writes nothing.
    Scan {
        /// Number of flagged items to print (default from `[replace].scan_preview`).
        #[arg(long)]
        preview: Option<usize>,
    },

    /// Replace flagged items with validated template content.
    ///
    /// Items are processed one at a time. Failures are recorded in the
    /// report and do not stop the run.
    Replace {
        /// Maximum number of flagged items to process.
        limit: Option<usize>,
    },

    /// Generate a replacement for the first flagged item without writing it.
    Test,

    /// Validate an English/Albanian pair and print the verdict as JSON.
    Validate {
        english: String,
        albanian: String,
    },

    /// Generate one candidate for a unit and print it as JSON.
    Generate {
        /// Curriculum unit number.
        unit: u32,

        /// Template kind: `phrase` or `sentence`.
        #[arg(long, default_value = "phrase")]
        kind: ContentKind,
    },

    /// Generate a batch of valid candidates for a unit and print them as JSON.
    Batch {
        /// Curriculum unit number.
        unit: u32,

        /// Number of draws (default 20). Invalid draws are dropped.
        count: Option<usize>,
    },

    /// Suggest a validated replacement for one pair and print it as JSON.
    ///
    /// Nothing is read from or written to the database.
    Suggest {
        english: String,
        albanian: String,

        /// Unit to start from. Classified from the English text when omitted.
        #[arg(long)]
        unit: Option<u32>,
    },

    /// Delete inappropriate items and refill their lessons.
    ///
    /// Removes items containing purge patterns or exceeding the character
    /// ceilings. Lesson introductions are kept. Each affected lesson then
    /// gets `[purge].refill_per_lesson` validated draws from its unit.
    Purge {
        /// List what would be deleted and refilled without writing anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show lesson, item, and flagged counts.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that don't require the database
    match &cli.command {
        Commands::Validate { english, albanian } => {
            let cfg =
                config::load_config(&cli.config).unwrap_or_else(|_| config::Config::minimal());
            generate_cmd::run_validate(&cfg, english, albanian)?;
            return Ok(());
        }
        Commands::Generate { unit, kind } => {
            let cfg =
                config::load_config(&cli.config).unwrap_or_else(|_| config::Config::minimal());
            generate_cmd::run_generate(&cfg, *unit, *kind)?;
            return Ok(());
        }
        Commands::Batch { unit, count } => {
            let cfg =
                config::load_config(&cli.config).unwrap_or_else(|_| config::Config::minimal());
            generate_cmd::run_batch(&cfg, *unit, *count)?;
            return Ok(());
        }
        Commands::Suggest {
            english,
            albanian,
            unit,
        } => {
            let cfg =
                config::load_config(&cli.config).unwrap_or_else(|_| config::Config::minimal());
            generate_cmd::run_suggest(&cfg, english, albanian, *unit)?;
            return Ok(());
        }
        _ => {}
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import { file } => {
            import::run_import(&cfg, &file).await?;
        }
        Commands::Scan { preview } => {
            replace::run_scan(&cfg, preview).await?;
        }
        Commands::Replace { limit } => {
            replace::run_replace(&cfg, limit, cli.progress).await?;
        }
        Commands::Test => {
            replace::run_test(&cfg).await?;
        }
        Commands::Purge { dry_run } => {
            purge::run_purge(&cfg, dry_run).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Validate { .. }
        | Commands::Generate { .. }
        | Commands::Batch { .. }
        | Commands::Suggest { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
