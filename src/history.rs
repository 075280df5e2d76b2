/// Append-only record of fired reactions.
///
/// External consumers (visualization, replay verification) read the
/// history; the kernel only ever appends to it. A deterministic trace
/// hash condenses an entire trajectory into one value, so two runs can
/// be compared without storing both traces.

use crate::event::Event;

// ── Hash utilities ────────────────────────────────────────────────────

/// Combine two u64 hashes deterministically.
pub fn hash_combine(a: u64, b: u64) -> u64 {
    let mut h = a;
    h = h.wrapping_mul(0x517cc1b727220a95);
    h = h.wrapping_add(b);
    h ^= h >> 32;
    h
}

/// Hash a byte slice deterministically (FNV-1a variant).
pub fn hash_bytes(data: &[u8]) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for &b in data {
        h ^= b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

// ── Event History ─────────────────────────────────────────────────────

/// Append-only log of fired reaction events.
#[derive(Debug, Clone, Default)]
pub struct EventHistory {
    events: Vec<Event>,
}

impl EventHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        EventHistory { events: Vec::new() }
    }

    /// Record a fired event.
    pub fn record(&mut self, event: &Event) {
        self.events.push(event.clone());
    }

    /// Access the recorded events, in firing order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Compute a deterministic hash of the entire trajectory.
    ///
    /// Covers firing time, rule, and participant order for every
    /// event — two runs with equal hashes fired the same reactions at
    /// the same times on the same sites.
    pub fn trace_hash(&self) -> u64 {
        let mut h: u64 = 0;
        for event in &self.events {
            h = hash_combine(h, event.id.raw());
            h = hash_combine(h, event.time.value().to_bits());
            h = hash_combine(h, event.rule.index() as u64);
            for &node in &event.participants {
                h = hash_combine(h, node.raw() as u64);
            }
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventId;
    use crate::rule::RuleId;
    use crate::surface::NodeId;
    use crate::time::SimTime;

    fn event(id: u64, time: f64, participants: Vec<NodeId>) -> Event {
        Event::new(
            EventId::new(id),
            SimTime::new(time),
            RuleId::new(0),
            participants,
            SimTime::ZERO,
        )
    }

    #[test]
    fn test_record_and_read_back() {
        let mut history = EventHistory::new();
        assert!(history.is_empty());

        history.record(&event(0, 1.0, vec![NodeId::new(0)]));
        history.record(&event(1, 2.0, vec![NodeId::new(1)]));

        assert_eq!(history.len(), 2);
        assert_eq!(history.events()[0].id, EventId::new(0));
        assert_eq!(history.events()[1].id, EventId::new(1));
    }

    #[test]
    fn test_trace_hash_deterministic() {
        let mut h1 = EventHistory::new();
        let mut h2 = EventHistory::new();
        for i in 0..5 {
            let e = event(i, i as f64 * 0.5, vec![NodeId::new(i as u32)]);
            h1.record(&e);
            h2.record(&e);
        }
        assert_eq!(h1.trace_hash(), h2.trace_hash());
    }

    #[test]
    fn test_trace_hash_sensitive_to_participant_order() {
        let mut h1 = EventHistory::new();
        let mut h2 = EventHistory::new();
        h1.record(&event(0, 1.0, vec![NodeId::new(0), NodeId::new(1)]));
        h2.record(&event(0, 1.0, vec![NodeId::new(1), NodeId::new(0)]));
        assert_ne!(h1.trace_hash(), h2.trace_hash());
    }

    #[test]
    fn test_trace_hash_sensitive_to_time() {
        let mut h1 = EventHistory::new();
        let mut h2 = EventHistory::new();
        h1.record(&event(0, 1.0, vec![NodeId::new(0)]));
        h2.record(&event(0, 1.5, vec![NodeId::new(0)]));
        assert_ne!(h1.trace_hash(), h2.trace_hash());
    }

    #[test]
    fn test_clear() {
        let mut history = EventHistory::new();
        history.record(&event(0, 1.0, vec![NodeId::new(0)]));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.trace_hash(), EventHistory::new().trace_hash());
    }

    #[test]
    fn test_hash_bytes_known_properties() {
        assert_eq!(hash_bytes(b"abc"), hash_bytes(b"abc"));
        assert_ne!(hash_bytes(b"abc"), hash_bytes(b"abd"));
        assert_ne!(hash_bytes(b""), 0);
    }
}
