use std::collections::VecDeque;

use crate::frame::Frame;

pub const EVENT_CLEAR: &str = "clear";
pub const EVENT_DRAW: &str = "draw";
pub const EVENT_LIFECYCLE: &str = "lifecycle";
pub const EVENT_SETUP_FAILURE: &str = "setup_failure";

/// Events kept by [`EventBus::new`]: a handful of frames worth of clears and
/// draws plus the setup record.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// One step the renderer took: a layer cleared, a pass drawn, a lifecycle
/// change or a setup failure, tagged with the tick it happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Ordered record of the most recent events. Once full, the oldest event is
/// dropped for each new one, so an endless animation holds a fixed amount.
#[derive(Debug)]
pub struct EventBus {
    events: VecDeque<Event>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// A bus holding at most `capacity` events (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn emit(&mut self, frame: Frame, kind: &'static str, message: impl Into<String>) {
        self.emit_at(frame.index, kind, message);
    }

    /// Records an event outside of any tick (setup, dataset load).
    pub fn emit_at(&mut self, frame_index: u64, kind: &'static str, message: impl Into<String>) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(Event {
            frame_index,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events pushed out since the bus was created.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{EVENT_CLEAR, EVENT_DRAW, EventBus};
    use crate::frame::Frame;
    use foundation::time::Timestamp;

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        let f = Frame::new(2, Timestamp(40.0));
        bus.emit(f, EVENT_CLEAR, "shadow");
        bus.emit(f, EVENT_DRAW, "shadow");
        assert_eq!(bus.len(), 2);
        assert_eq!(bus.events().next().map(|e| e.frame_index), Some(2));
        assert_eq!(bus.of_kind(EVENT_DRAW).count(), 1);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit_at(0, "k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn oldest_events_fall_off_when_full() {
        let mut bus = EventBus::with_capacity(4);
        for index in 0..10 {
            bus.emit_at(index, EVENT_DRAW, "pass");
        }
        assert_eq!(bus.len(), 4);
        assert_eq!(bus.dropped(), 6);
        let kept: Vec<u64> = bus.events().map(|e| e.frame_index).collect();
        assert_eq!(kept, vec![6, 7, 8, 9]);
    }

    #[test]
    fn zero_capacity_still_keeps_the_latest() {
        let mut bus = EventBus::with_capacity(0);
        bus.emit_at(0, EVENT_CLEAR, "a");
        bus.emit_at(1, EVENT_CLEAR, "b");
        assert_eq!(bus.capacity(), 1);
        assert_eq!(bus.events().map(|e| e.message.as_str()).collect::<Vec<_>>(), vec!["b"]);
    }
}
