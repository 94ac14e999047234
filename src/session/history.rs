// Append-only log of manually triggered analyses.
//
// Only the manual path writes here. Replaying an entry is the coordinator's
// job since it has to start a fresh request cycle.

use serde::Serialize;

use crate::predictor::traits::AnalysisResult;

/// A completed manual analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub text: String,
    pub confidence: f64,
    pub toxic: bool,
}

impl HistoryEntry {
    pub fn from_result(text: &str, result: &AnalysisResult) -> Self {
        Self {
            text: text.to_string(),
            confidence: result.confidence,
            toxic: result.toxic,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisHistoryStore {
    entries: Vec<HistoryEntry>,
}

impl AnalysisHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// All entries in insertion order, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
