use chrono::Local;
use rand::Rng;

use crate::clock::{Clock, TickSource};
use crate::config::TimeLimit;
use crate::corpus::Corpus;
use crate::history::{History, HistoryEntry};
use crate::session::{Session, Status};
use crate::sink::{EventSink, SessionEvent};

/// Controller that owns the active session, the corpus it draws passages
/// from, and the process-lifetime history. Driven from the outside by a
/// keystroke feed and a tick gate; pushes metric and lifecycle
/// notifications to the sink.
///
/// All collaborators are injected, so a whole session can run under a
/// manual clock in tests.
#[derive(Debug)]
pub struct Engine<C, T, S, R> {
    corpus: Corpus,
    session: Session,
    history: History,
    time_limit: TimeLimit,
    clock: C,
    ticks: T,
    sink: S,
    rng: R,
}

impl<C, T, S, R> Engine<C, T, S, R>
where
    C: Clock,
    T: TickSource,
    S: EventSink,
    R: Rng,
{
    /// Build an engine with an initial passage already selected. `Corpus`
    /// construction has validated non-emptiness, so selection is total.
    pub fn new(
        corpus: Corpus,
        time_limit: TimeLimit,
        clock: C,
        ticks: T,
        sink: S,
        mut rng: R,
    ) -> Self {
        let reference = corpus.pick(&mut rng).to_string();
        Self {
            corpus,
            session: Session::new(reference, time_limit),
            history: History::new(),
            time_limit,
            clock,
            ticks,
            sink,
            rng,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn status(&self) -> Status {
        self.session.status
    }

    pub fn time_limit(&self) -> TimeLimit {
        self.time_limit
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn remaining_secs(&self) -> u64 {
        self.session.remaining_secs(self.clock.now())
    }

    /// Change the configured time limit. Ignored while a session is
    /// running; the limit is fixed at start.
    pub fn set_time_limit(&mut self, limit: TimeLimit) {
        if self.session.status == Status::Running {
            return;
        }
        self.time_limit = limit;
        self.session.time_limit = limit;
    }

    /// Begin a timed session on the current passage. Valid from Idle or
    /// Finished; a no-op while already running.
    pub fn start(&mut self) {
        if self.session.status == Status::Running {
            return;
        }

        self.session.typed_text.clear();
        self.session.total_keystrokes = 0;
        self.session.correct_keystrokes = 0;
        self.session.error_count = 0;
        self.session.last_wpm = 0;
        self.session.time_limit = self.time_limit;
        self.session.started_at = Some(self.clock.now());
        self.session.status = Status::Running;

        self.ticks.arm();
        self.sink.handle(SessionEvent::Started);
    }

    /// Advance the running clock by one tick. Ignored unless running: a
    /// tick racing a finish or reset is expected, not an error.
    pub fn tick(&mut self) {
        if self.session.status != Status::Running {
            return;
        }

        let now = self.clock.now();
        if self.session.expired(now) {
            self.finish();
            return;
        }

        let snapshot = self.session.snapshot(now);
        self.sink.handle(SessionEvent::Metrics(snapshot));
    }

    /// Accept the raw typed buffer after an input event. Ignored unless
    /// running; a disabled input cannot produce events, and late events
    /// racing the timer are dropped the same way.
    ///
    /// One keystroke is counted per event, not per character: a paste
    /// arriving as a single event counts once, preserved from the original
    /// measurement behavior.
    pub fn on_input(&mut self, raw: &str) {
        if self.session.status != Status::Running {
            return;
        }

        self.session.typed_text = raw.to_string();
        self.session.total_keystrokes += 1;
        self.session.reclassify();

        let snapshot = self.session.snapshot(self.clock.now());
        self.sink.handle(SessionEvent::Metrics(snapshot));
    }

    /// End the running session: freeze metrics, record exactly one history
    /// entry, release the tick source. Idempotent: timer expiry and an
    /// external stop may race, so a second call is a no-op.
    pub fn finish(&mut self) {
        if self.session.status != Status::Running {
            return;
        }

        if self.ticks.is_armed() {
            self.ticks.disarm();
        }

        let snapshot = self.session.snapshot(self.clock.now());
        let entry = HistoryEntry {
            wpm: snapshot.wpm,
            accuracy: snapshot.accuracy,
            errors: snapshot.errors,
            completed_at: Local::now(),
        };
        self.history.push(entry.clone());
        self.session.status = Status::Finished;

        self.sink.handle(SessionEvent::Finished(entry));
    }

    /// Abandon the current session and select a fresh passage. Safe from
    /// any state; a finished session's history entry is untouched.
    pub fn reset(&mut self) {
        if self.ticks.is_armed() {
            self.ticks.disarm();
        }

        let reference = self.corpus.pick(&mut self.rng).to_string();
        self.session = Session::new(reference, self.time_limit);

        self.sink.handle(SessionEvent::Reset);
    }

    /// Fresh passage, same time limit, immediately running.
    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }
}
