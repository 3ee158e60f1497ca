//! Session History Store: append-only list of successful interpretations for one session.
//! Only the view is capped; the underlying list grows until cleared or the session ends.

use chrono::Local;
use serde::Serialize;

use crate::options::{HumorLevel, InterpretationStyle};
use crate::prompt::InterpretationRequest;

/// Number of entries the page shows.
pub const RECENT_LIMIT: usize = 5;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One successful generation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpretationRecord {
    word: String,
    text: String,
    timestamp: String,
    humor_level: HumorLevel,
    style: InterpretationStyle,
}

impl InterpretationRecord {
    /// Record stamped with the current local time.
    pub fn now(request: &InterpretationRequest, text: impl Into<String>) -> Self {
        Self::with_timestamp(
            request,
            text,
            Local::now().format(TIMESTAMP_FORMAT).to_string(),
        )
    }

    pub fn with_timestamp(
        request: &InterpretationRequest,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            word: request.word().to_string(),
            text: text.into(),
            timestamp: timestamp.into(),
            humor_level: request.humor_level(),
            style: request.style(),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn humor_level(&self) -> HumorLevel {
        self.humor_level
    }

    pub fn style(&self) -> InterpretationStyle {
        self.style
    }
}

/// Insertion-ordered history. Never reordered or deduplicated.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    records: Vec<InterpretationRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: InterpretationRecord) {
        self.records.push(record);
    }

    /// Last `n` records, most recent first.
    pub fn recent(&self, n: usize) -> Vec<&InterpretationRecord> {
        self.records.iter().rev().take(n).collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
