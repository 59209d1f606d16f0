//! Replacement progress reporting.
//!
//! Reports observable progress during `pgate replace` so operators see which
//! item is being processed, how many are left, and which ones failed.
//! Progress is emitted on **stderr** so stdout remains parseable for scripts.

use std::io::Write;
use std::str::FromStr;

/// A single progress event for a scan or replacement run.
#[derive(Clone, Debug)]
pub enum ReplaceProgressEvent {
    /// Scan finished: `flagged` of `total` items failed validation.
    Scanned { flagged: u64, total: u64 },
    /// Item `n` of `total` is being replaced.
    Processing { n: u64, total: u64, id: String },
    /// Item was rewritten with new text.
    Replaced { id: String, english: String },
    /// Item could not be replaced; the run continues.
    Failed { id: String, error: String },
}

/// Reports replacement progress. Implementations write to stderr (human or JSON).
pub trait ReplaceProgressReporter: Send + Sync {
    /// Emit a progress event. Called from the replacement pipeline.
    fn report(&self, event: ReplaceProgressEvent);
}

/// Human-friendly progress on stderr: "replace  [3/120]  item 42".
pub struct StderrProgress;

impl ReplaceProgressReporter for StderrProgress {
    fn report(&self, event: ReplaceProgressEvent) {
        let line = match &event {
            ReplaceProgressEvent::Scanned { flagged, total } => format!(
                "scan  {} of {} items need replacement\n",
                format_number(*flagged),
                format_number(*total)
            ),
            ReplaceProgressEvent::Processing { n, total, id } => format!(
                "replace  [{}/{}]  item {}\n",
                format_number(*n),
                format_number(*total),
                id
            ),
            ReplaceProgressEvent::Replaced { id, english } => {
                format!("replace  item {}  ok  \"{}\"\n", id, english)
            }
            ReplaceProgressEvent::Failed { id, error } => {
                format!("replace  item {}  failed: {}\n", id, error)
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ReplaceProgressReporter for JsonProgress {
    fn report(&self, event: ReplaceProgressEvent) {
        let obj = match &event {
            ReplaceProgressEvent::Scanned { flagged, total } => serde_json::json!({
                "event": "progress",
                "phase": "scanned",
                "flagged": flagged,
                "total": total
            }),
            ReplaceProgressEvent::Processing { n, total, id } => serde_json::json!({
                "event": "progress",
                "phase": "processing",
                "n": n,
                "total": total,
                "id": id
            }),
            ReplaceProgressEvent::Replaced { id, english } => serde_json::json!({
                "event": "replaced",
                "id": id,
                "english": english
            }),
            ReplaceProgressEvent::Failed { id, error } => serde_json::json!({
                "event": "failed",
                "id": id,
                "error": error
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ReplaceProgressReporter for NoProgress {
    fn report(&self, _event: ReplaceProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: auto, off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Auto,
    Off,
    Human,
    Json,
}

impl FromStr for ProgressMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ProgressMode::Auto),
            "off" => Ok(ProgressMode::Off),
            "human" => Ok(ProgressMode::Human),
            "json" => Ok(ProgressMode::Json),
            other => Err(format!(
                "invalid progress mode '{}': must be auto, off, human, or json",
                other
            )),
        }
    }
}

impl ProgressMode {
    /// Resolve `Auto`: human progress when stderr is a TTY, otherwise off.
    pub fn resolve(self) -> Self {
        match self {
            ProgressMode::Auto => {
                if atty::is(atty::Stream::Stderr) {
                    ProgressMode::Human
                } else {
                    ProgressMode::Off
                }
            }
            other => other,
        }
    }

    /// Build a reporter for this mode.
    pub fn reporter(&self) -> Box<dyn ReplaceProgressReporter> {
        match self.resolve() {
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
            ProgressMode::Off | ProgressMode::Auto => Box::new(NoProgress),
        }
    }
}
