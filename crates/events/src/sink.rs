//! Event sink abstraction.
//!
//! Lets the session publish events without knowing who listens: a UI bridge,
//! a JSON-lines writer, or a test recorder.

use std::sync::{Arc, Mutex};

use crate::EngineEvent;

/// Receives engine events.
pub trait EventSink: Send + Sync {
    /// Deliver one event. Must not block the frame loop for long.
    fn publish(&self, event: &EngineEvent);
}

/// Type alias for shared sink reference.
pub type EventSinkRef = Arc<dyn EventSink>;

/// Captures every published event for later inspection.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<EngineEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of everything published so far, oldest first.
    pub fn events(&self) -> Vec<EngineEvent> {
        self.lock().clone()
    }

    /// Recorded events whose topic is `topic`.
    pub fn events_for(&self, topic: &str) -> Vec<EngineEvent> {
        self.lock()
            .iter()
            .filter(|e| e.topic() == topic)
            .cloned()
            .collect()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &EngineEvent) {
        self.lock().push(event.clone());
    }
}

/// Discards everything.
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: &EngineEvent) {}
}
