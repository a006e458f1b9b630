use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::BotError;

/// One logged user action, self-contained on its own line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEntry {
    pub chat_id: i64,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only JSON Lines log of user actions, aggregated for the admin
/// stats view.
pub struct ActionLogger {
    path: PathBuf,
}

impl ActionLogger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one entry. Each call writes a single complete line, so
    /// concurrent appends cannot interleave inside an entry.
    pub fn record(&self, chat_id: i64, action: &str) -> Result<(), BotError> {
        let entry = ActionEntry {
            chat_id,
            action: action.to_string(),
            timestamp: Utc::now(),
        };
        let mut line =
            serde_json::to_string(&entry).map_err(|e| BotError::Internal(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| BotError::Internal(e.to_string()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| BotError::Internal(e.to_string()))?;

        info!(target: "actions", chat_id, action, "action logged");
        Ok(())
    }

    /// Log an action, swallowing failures: the log is best-effort and
    /// must never break the handling of an event.
    pub fn record_lossy(&self, chat_id: i64, action: &str) {
        if let Err(e) = self.record(chat_id, action) {
            warn!(target: "actions", chat_id, action, "action log write failed: {e}");
        }
    }

    /// Occurrence count per action name. A log that does not exist yet
    /// aggregates to empty; lines that fail to parse are skipped.
    pub fn aggregate(&self) -> BTreeMap<String, usize> {
        let mut stats = BTreeMap::new();
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(_) => return stats,
        };

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<ActionEntry>(line) {
                Ok(entry) => *stats.entry(entry.action).or_default() += 1,
                Err(e) => warn!(target: "actions", "skipping malformed log line: {e}"),
            }
        }
        stats
    }
}
