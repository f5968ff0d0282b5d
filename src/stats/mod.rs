#![allow(dead_code)]
//! Completed-game results tracking
//!
//! Append-only history for the lifetime of the process. Records survive
//! game resets; nothing here is persisted to disk.

use chrono::NaiveDate;

/// Final stats of one completed game. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub elapsed_seconds: u32,
    pub move_count: u32,
    pub score: u32,
    pub completed_on: NaiveDate,
}

/// Accumulates completed-game results in recording order.
#[derive(Debug, Clone, Default)]
pub struct SessionRecorder {
    records: Vec<ScoreRecord>,
}

impl SessionRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed-game result.
    pub fn record(&mut self, record: ScoreRecord) {
        self.records.push(record);
    }

    /// All results in recording order.
    pub fn history(&self) -> &[ScoreRecord] {
        &self.records
    }

    /// The highest-scoring result so far, if any.
    pub fn best(&self) -> Option<&ScoreRecord> {
        self.records.iter().max_by_key(|r| r.score)
    }
}
