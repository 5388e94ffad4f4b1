use chrono::{DateTime, Local};

/// Immutable record of one completed session.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub wpm: u32,
    pub accuracy: u8,
    pub errors: usize,
    pub completed_at: DateTime<Local>,
}

/// Append-only list of completed sessions, scoped to the process lifetime.
/// Never written to durable storage.
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// WPM of each completed session in completion order, for the progress
    /// chart on the results screen.
    pub fn wpm_series(&self) -> Vec<(f64, f64)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| ((i + 1) as f64, e.wpm as f64))
            .collect()
    }
}
