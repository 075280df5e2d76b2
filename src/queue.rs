/// Time-ordered priority queue over pending reaction events.
///
/// Uses a `BinaryHeap` with reversed `Ord` on `Event` to act as a
/// min-heap keyed by `(time, event_id)`. Event IDs are strictly
/// increasing, so dequeue order is deterministic even among ties.
///
/// Invalidation is *eager*: when a site's state changes, every queued
/// event touching that site is removed immediately with a linear scan
/// and heap rebuild. That costs O(queue) per firing but guarantees
/// `pop_min` never returns a stale event. The queue never mixes in
/// lazy pop-time validity checks.

use std::collections::BinaryHeap;

use crate::event::Event;
use crate::surface::NodeId;

/// Min-priority queue of pending events.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Event>,
}

impl EventQueue {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        EventQueue {
            heap: BinaryHeap::new(),
        }
    }

    /// Insert an event. O(log n).
    pub fn push(&mut self, event: Event) {
        self.heap.push(event);
    }

    /// Remove and return the earliest event, or `None` when empty.
    pub fn pop_min(&mut self) -> Option<Event> {
        self.heap.pop()
    }

    /// Peek at the earliest event without removing it.
    pub fn peek(&self) -> Option<&Event> {
        self.heap.peek()
    }

    /// Remove every queued event whose participants include `node`.
    ///
    /// Returns the number of events removed.
    pub fn invalidate_participant(&mut self, node: NodeId) -> usize {
        let before = self.heap.len();
        self.heap.retain(|event| !event.involves(node));
        before - self.heap.len()
    }

    /// Returns `true` if no events are pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Drop all pending events.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Drain all events in deterministic time order into a `Vec`.
    /// Useful for testing and snapshotting.
    pub fn drain_ordered(&mut self) -> Vec<Event> {
        let mut events = Vec::with_capacity(self.heap.len());
        while let Some(event) = self.heap.pop() {
            events.push(event);
        }
        events
    }
}
