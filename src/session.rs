use std::time::SystemTime;

use crate::config::TimeLimit;
use crate::metrics::{accuracy, classify, wpm, MetricsSnapshot};

/// Lifecycle of a session. Transitions only Idle -> Running -> Finished,
/// plus reset back to Idle from any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Running,
    Finished,
}

/// One timed typing attempt. A plain value owned by the engine; all timing
/// flows through the clock the engine was built with.
#[derive(Clone, Debug)]
pub struct Session {
    /// Immutable for the session lifetime.
    pub reference_text: String,
    /// Grows as the user types. Backspace suppression is presentation
    /// policy, so a shrinking buffer is tolerated here.
    pub typed_text: String,
    pub time_limit: TimeLimit,
    pub started_at: Option<SystemTime>,
    /// One increment per input event while running, never per character.
    pub total_keystrokes: u64,
    /// Snapshot of the current buffer, recomputed on every update.
    pub correct_keystrokes: usize,
    /// Snapshot of currently-mismatched characters in the buffer.
    pub error_count: usize,
    pub status: Status,
    /// Last displayed WPM, retained across the sub-second window where no
    /// time has elapsed yet.
    pub last_wpm: u32,
}

impl Session {
    pub fn new(reference_text: String, time_limit: TimeLimit) -> Self {
        Self {
            reference_text,
            typed_text: String::new(),
            time_limit,
            started_at: None,
            total_keystrokes: 0,
            correct_keystrokes: 0,
            error_count: 0,
            status: Status::Idle,
            last_wpm: 0,
        }
    }

    pub fn elapsed_ms(&self, now: SystemTime) -> u64 {
        match self.started_at {
            Some(started) => now
                .duration_since(started)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
            None => 0,
        }
    }

    pub fn remaining_secs(&self, now: SystemTime) -> u64 {
        self.time_limit
            .as_secs()
            .saturating_sub(self.elapsed_ms(now) / 1000)
    }

    pub fn expired(&self, now: SystemTime) -> bool {
        self.elapsed_ms(now) >= self.time_limit.as_secs() * 1000
    }

    /// Recompute both counters from a full pass over the typed buffer.
    /// Never incrementally drifted.
    pub fn reclassify(&mut self) {
        let c = classify(&self.reference_text, &self.typed_text);
        self.correct_keystrokes = c.correct;
        self.error_count = c.errors;
    }

    /// Current metrics. Updates the retained WPM reading whenever elapsed
    /// time allows one to be computed.
    pub fn snapshot(&mut self, now: SystemTime) -> MetricsSnapshot {
        if let Some(w) = wpm(self.correct_keystrokes, self.elapsed_ms(now)) {
            self.last_wpm = w;
        }

        MetricsSnapshot {
            wpm: self.last_wpm,
            accuracy: accuracy(self.total_keystrokes, self.error_count),
            errors: self.error_count,
        }
    }
}
