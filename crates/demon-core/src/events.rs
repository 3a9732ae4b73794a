// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Event Sinks
// ─────────────────────────────────────────────────────────────────────
//! Fire-and-forget delivery of simulation events to the display layer.
//!
//! The clock hands each tick's events to every subscribed sink after the
//! tick has completed. Sinks must not block.

use parking_lot::Mutex;

use demon_types::SimulationEvent;

/// Receiver of simulation events.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &SimulationEvent);
}

/// Buffers events in memory until drained.
///
/// Thread-safe: the buffer is guarded by a `parking_lot::Mutex`.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SimulationEvent>>,
    capacity: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the most recent `capacity` events.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            events: Mutex::new(Vec::with_capacity(capacity)),
            capacity: Some(capacity),
        }
    }

    /// Take every buffered event.
    pub fn drain(&self) -> Vec<SimulationEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn events(&self) -> Vec<SimulationEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn on_event(&self, event: &SimulationEvent) {
        let mut events = self.events.lock();
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            if events.len() >= capacity {
                let excess = events.len() + 1 - capacity;
                events.drain(..excess);
            }
        }
        events.push(*event);
    }
}

type EventFn = Box<dyn Fn(&SimulationEvent) + Send + Sync>;

/// Forwards each event to a closure.
///
/// Used by the Python bindings to call back into the display layer.
pub struct CallbackSink {
    callback: EventFn,
}

impl CallbackSink {
    pub fn new(callback: impl Fn(&SimulationEvent) + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }
}

impl EventSink for CallbackSink {
    fn on_event(&self, event: &SimulationEvent) {
        (self.callback)(event)
    }
}
