/// Scheduled candidate reactions.
///
/// Every pending reaction is modeled as an `Event`: an immutable record
/// of which rule would fire, on which sites, and when. Events live only
/// in the event queue and are destroyed either by being popped and
/// applied, or by eager invalidation when a participant's state changes
/// under them.

use std::cmp::Ordering;

use crate::rule::RuleId;
use crate::surface::NodeId;
use crate::time::SimTime;

// ── Event ID ──────────────────────────────────────────────────────────

/// A globally unique, strictly increasing event identifier.
///
/// The monotonic nature of `EventId` breaks ties in the queue: two
/// events scheduled at the same `SimTime` are ordered by their
/// `EventId`, which corresponds to creation order. That keeps dequeue
/// order fully deterministic under a fixed seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct EventId(u64);

impl EventId {
    /// Wrap a raw u64 into an `EventId`.
    #[inline]
    pub fn new(raw: u64) -> Self {
        EventId(raw)
    }

    /// Return the raw value.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E#{}", self.0)
    }
}

// ── Event ID Generator ───────────────────────────────────────────────

/// Deterministic, strictly-increasing event-ID generator.
///
/// Each scheduler owns exactly one. The simulation is single-threaded,
/// so the counter is trivially deterministic.
#[derive(Debug, Clone, Default)]
pub struct EventIdGen {
    next: u64,
}

impl EventIdGen {
    /// Create a generator starting at 0.
    pub fn new() -> Self {
        EventIdGen { next: 0 }
    }

    /// Mint the next event ID.
    pub fn next_id(&mut self) -> EventId {
        let id = EventId(self.next);
        self.next += 1;
        id
    }
}

// ── Event ─────────────────────────────────────────────────────────────

/// A scheduled candidate reaction.
///
/// `participants` holds one or two node handles, ordered to match the
/// rule's reactant slots. `time_issued` records the scheduler clock at
/// discovery time; under eager invalidation it is diagnostic only and
/// plays no part in validity checks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Unique identifier (monotonically increasing).
    pub id: EventId,

    /// Absolute simulation time at which the reaction would fire.
    pub time: SimTime,

    /// The rule that would fire.
    pub rule: RuleId,

    /// The reacting sites, in rule-input slot order (1 or 2 entries).
    pub participants: Vec<NodeId>,

    /// Scheduler clock when this event was computed.
    pub time_issued: SimTime,
}

impl Event {
    /// Convenience constructor.
    pub fn new(
        id: EventId,
        time: SimTime,
        rule: RuleId,
        participants: Vec<NodeId>,
        time_issued: SimTime,
    ) -> Self {
        Event {
            id,
            time,
            rule,
            participants,
            time_issued,
        }
    }

    /// The first reactant's node.
    #[inline]
    pub fn first_participant(&self) -> NodeId {
        self.participants[0]
    }

    /// The second reactant's node, for bimolecular events.
    #[inline]
    pub fn second_participant(&self) -> Option<NodeId> {
        self.participants.get(1).copied()
    }

    /// Whether `node` takes part in this event.
    #[inline]
    pub fn involves(&self, node: NodeId) -> bool {
        self.participants.contains(&node)
    }
}

/// Ordering: smallest `(time, id)` first.
///
/// Rust's `BinaryHeap` is a *max*-heap, so the natural ordering is
/// reversed here to turn it into a min-heap.
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: u64, time: f64) -> Event {
        Event::new(
            EventId::new(id),
            SimTime::new(time),
            RuleId::new(0),
            vec![NodeId::new(0)],
            SimTime::ZERO,
        )
    }

    #[test]
    fn test_event_id_monotonic() {
        let mut id_gen = EventIdGen::new();
        let a = id_gen.next_id();
        let b = id_gen.next_id();
        let c = id_gen.next_id();
        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);
        assert_eq!(c.raw(), 2);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_event_ordering_by_time() {
        let e1 = event(0, 1.0);
        let e2 = event(1, 2.0);
        // e1 fires first (smaller time) → in reversed ordering e1 > e2.
        assert!(e1 > e2);
    }

    #[test]
    fn test_event_ordering_tiebreak_by_id() {
        let e1 = event(0, 1.0);
        let e2 = event(1, 1.0);
        // Same time → smaller ID wins → e1 > e2 in reversed ordering.
        assert!(e1 > e2);
    }

    #[test]
    fn test_involves() {
        let e = Event::new(
            EventId::new(0),
            SimTime::new(1.0),
            RuleId::new(0),
            vec![NodeId::new(3), NodeId::new(7)],
            SimTime::ZERO,
        );
        assert!(e.involves(NodeId::new(3)));
        assert!(e.involves(NodeId::new(7)));
        assert!(!e.involves(NodeId::new(5)));
        assert_eq!(e.first_participant(), NodeId::new(3));
        assert_eq!(e.second_participant(), Some(NodeId::new(7)));
    }

    #[test]
    fn test_unimolecular_has_no_second_participant() {
        let e = event(0, 1.0);
        assert_eq!(e.second_participant(), None);
    }
}
