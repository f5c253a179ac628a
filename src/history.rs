// THEORY:
// `HistoryLog` is the host-side record of past analyses: a bounded,
// newest-first list of small summaries that survives restarts as JSON. It is
// deliberately outside the core. Analyses never read it, and recording an entry
// never changes a result.
//
// The log keeps at most `capacity` entries; recording into a full log evicts the
// oldest one.

use crate::core_modules::result_assembler::AnalysisResult;
use crate::error::AnalysisError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A persisted summary of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Display name of the primary condition.
    pub primary: String,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    /// Host-supplied preview of the image, for example a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl HistoryEntry {
    pub fn from_result(result: &AnalysisResult, timestamp: DateTime<Utc>, thumbnail: Option<String>) -> Self {
        Self {
            primary: result.primary.name.to_string(),
            confidence: result.primary.confidence,
            timestamp,
            thumbnail,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a summary of `result` stamped with the current time.
    pub fn record(&mut self, result: &AnalysisResult, thumbnail: Option<String>) -> &HistoryEntry {
        self.push(HistoryEntry::from_result(result, Utc::now(), thumbnail))
    }

    /// Adds `entry` as the newest item, evicting the oldest when full.
    pub fn push(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Restores a log from JSON written by `to_json`. Entries beyond `capacity`
    /// (the oldest ones) are dropped.
    pub fn from_json(json: &str, capacity: usize) -> Result<Self, AnalysisError> {
        let entries: Vec<HistoryEntry> = serde_json::from_str(json)?;
        let mut log = Self::new(capacity);
        log.entries.extend(entries.into_iter().take(log.capacity));
        Ok(log)
    }
}
