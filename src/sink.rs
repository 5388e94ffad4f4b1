use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::history::HistoryEntry;
use crate::metrics::MetricsSnapshot;

/// Notifications the engine pushes to the presentation layer. The consumer
/// renders them; the engine never touches the screen itself.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Started,
    Metrics(MetricsSnapshot),
    Finished(HistoryEntry),
    Reset,
}

pub trait EventSink {
    fn handle(&mut self, event: SessionEvent);
}

/// Sink that discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn handle(&mut self, _event: SessionEvent) {}
}

/// Test sink recording every notification in order.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub events: Vec<SessionEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> Vec<MetricsSnapshot> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Metrics(m) => Some(*m),
                _ => None,
            })
            .collect()
    }

    pub fn finished_entries(&self) -> Vec<&HistoryEntry> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Finished(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MemorySink {
    fn handle(&mut self, event: SessionEvent) {
        self.events.push(event);
    }
}

/// Front-end sink for the single-threaded event loop: the engine pushes
/// notifications, the loop drains them after each engine call. Clones share
/// the queue, so the loop keeps a handle while the engine owns another.
#[derive(Clone, Debug, Default)]
pub struct QueueSink {
    queue: Rc<RefCell<VecDeque<SessionEvent>>>,
}

impl QueueSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<SessionEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }
}

impl EventSink for QueueSink {
    fn handle(&mut self, event: SessionEvent) {
        self.queue.borrow_mut().push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn snapshot(wpm: u32) -> MetricsSnapshot {
        MetricsSnapshot {
            wpm,
            accuracy: 100,
            errors: 0,
        }
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let mut sink = MemorySink::new();
        sink.handle(SessionEvent::Started);
        sink.handle(SessionEvent::Metrics(snapshot(10)));
        sink.handle(SessionEvent::Reset);

        assert_eq!(sink.events.len(), 3);
        assert_eq!(sink.events[0], SessionEvent::Started);
        assert_eq!(sink.metrics(), vec![snapshot(10)]);
    }

    #[test]
    fn test_memory_sink_finished_entries() {
        let mut sink = MemorySink::new();
        let entry = HistoryEntry {
            wpm: 42,
            accuracy: 98,
            errors: 1,
            completed_at: Local::now(),
        };
        sink.handle(SessionEvent::Finished(entry.clone()));

        assert_eq!(sink.finished_entries(), vec![&entry]);
    }

    #[test]
    fn test_queue_sink_clones_share_queue() {
        let observer = QueueSink::new();
        let mut engine_side = observer.clone();

        engine_side.handle(SessionEvent::Started);
        engine_side.handle(SessionEvent::Metrics(snapshot(10)));

        let drained = observer.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], SessionEvent::Started);
    }

    #[test]
    fn test_queue_sink_drain_empties_queue() {
        let sink = QueueSink::new();
        let mut handle = sink.clone();
        handle.handle(SessionEvent::Reset);

        assert_eq!(sink.drain().len(), 1);
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn test_null_sink_ignores_everything() {
        let mut sink = NullSink;
        sink.handle(SessionEvent::Started);
        sink.handle(SessionEvent::Reset);
    }
}
