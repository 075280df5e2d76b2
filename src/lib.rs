//! # Kinetica — Stochastic Surface Reaction Kernel
//!
//! An event-driven simulator for chemical reaction networks on a fixed
//! spatial surface: a graph of sites, each holding a discrete chemical
//! state, reacting with themselves or with weighted neighbors under
//! probabilistic rate rules. The scheduling core is a spatial variant
//! of the Gillespie next-reaction method with eager invalidation. No
//! async, no threads, no wall-clock time — one seeded generator drives
//! the whole trajectory.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────┐
//! │     ReactionScheduler       │ ← next-reaction loop + discovery
//! │  ┌──────────────────────┐  │
//! │  │      EventQueue       │  │ ← min-heap + eager invalidation
//! │  └──────────────────────┘  │
//! │  ┌──────────┐ ┌─────────┐  │
//! │  │ RuleIndex │ │ ChaCha8 │  │ ← state→rules map, seeded RNG
//! │  └──────────┘ └─────────┘  │
//! │  ┌──────────────────────┐  │
//! │  │       Surface         │  │ ← arena-owned sites + adjacency
//! │  └──────────────────────┘  │
//! └────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use kinetica::{ReactionScheduler, Rule, Surface};
//!
//! let surface = Surface::square_grid(4, 4, "A");
//! let rules = vec![Rule::unimolecular("A", "B", 1.0).unwrap()];
//! let mut scheduler = ReactionScheduler::new(surface, rules, 42, 100.0);
//!
//! while !scheduler.done() {
//!     scheduler.process_next_reaction();
//! }
//! ```

pub mod error;
pub mod event;
pub mod history;
pub mod profiler;
pub mod queue;
pub mod readers;
pub mod rule;
pub mod scheduler;
pub mod surface;
pub mod time;

// Re-exports for convenience.
pub use error::{KineticaError, KineticaResult};
pub use event::{Event, EventId, EventIdGen};
pub use history::EventHistory;
pub use profiler::TimeProfiler;
pub use queue::EventQueue;
pub use readers::{parse_constraints, parse_rules, DistanceConstraint};
pub use rule::{Rule, RuleId, RuleIndex, Species};
pub use scheduler::ReactionScheduler;
pub use surface::{GlobalState, NodeId, Position, Surface};
pub use time::SimTime;
