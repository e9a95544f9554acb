use std::collections::VecDeque;

/// An event stamped with its position in the session's event stream.
#[derive(Clone, Debug, PartialEq)]
pub struct SequencedEvent<E> {
    pub sequence: u64,
    pub event: E,
}

/// Opaque position in the event stream; obtain the next one from
/// [`EventLog::since`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventCursor(pub u64);

/// Bounded event log with cursor-based retrieval. Slow readers lose the
/// oldest entries instead of stalling the session.
pub struct EventLog<E> {
    buffer: VecDeque<SequencedEvent<E>>,
    capacity: usize,
    next_sequence: u64,
}

impl<E: Clone> EventLog<E> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            next_sequence: 0,
        }
    }

    pub fn push(&mut self, event: E) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(SequencedEvent {
            sequence: self.next_sequence,
            event,
        });
        self.next_sequence += 1;
    }

    /// Everything at or after the cursor, plus the cursor for the next call.
    /// A cursor older than the retained window silently skips to the oldest
    /// available entry.
    pub fn since(&self, cursor: EventCursor) -> (Vec<SequencedEvent<E>>, EventCursor) {
        let events = self
            .buffer
            .iter()
            .filter(|e| e.sequence >= cursor.0)
            .cloned()
            .collect();
        (events, EventCursor(self.next_sequence))
    }

    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }
}
