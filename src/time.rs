/// Simulation time for the stochastic kernel.
///
/// Represents an absolute point on the continuous simulation clock.
/// Time advances only when the scheduler fires a reaction — never from
/// wall-clock observation.

use std::cmp::Ordering;

/// A point in continuous simulation time.
///
/// Waiting times are exponentially distributed, so the clock is a
/// float rather than a tick counter. Every `SimTime` held by the
/// kernel is finite: non-finite waiting times are rejected during
/// reaction discovery, before an event is ever created. That makes
/// `total_cmp` a genuine total order here.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(f64);

impl SimTime {
    /// The zero-point of simulation time.
    pub const ZERO: SimTime = SimTime(0.0);

    /// Create a new `SimTime` from a raw clock value.
    #[inline]
    pub fn new(value: f64) -> Self {
        SimTime(value)
    }

    /// Return the raw clock value.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// The absolute time that is `delta` after `self`.
    #[inline]
    pub fn plus(self, delta: f64) -> SimTime {
        SimTime(self.0 + delta)
    }

    /// Returns `true` if `self` is strictly before `other`.
    #[inline]
    pub fn is_before(self, other: SimTime) -> bool {
        self < other
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t={}", self.0)
    }
}
