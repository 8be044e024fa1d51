use std::collections::VecDeque;

use crate::{AnalysisResult, HP};

/// Most recent analyses, newest first. Pushing past capacity evicts the oldest.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<AnalysisResult>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(HP.history_capacity)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, result: AnalysisResult) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(result);
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&AnalysisResult> {
        self.entries.front()
    }

    /// Reselect an earlier analysis; index 0 is the newest.
    pub fn get(&self, index: usize) -> Option<&AnalysisResult> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

const PREVIEW_CHARS: usize = 100;

/// One-line listing: text preview, time, counts and rounded mean confidence.
pub fn summary_line(result: &AnalysisResult) -> String {
    let preview: String = result
        .text
        .chars()
        .take(PREVIEW_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    format!(
        "{preview}... [{}] {} arguments, {} claims, {}% avg confidence",
        result.timestamp.format("%H:%M:%S"),
        result.arguments.len(),
        result.claims.len(),
        result.statistics.average_confidence.round() as i64
    )
}
