//! The reaction scheduler — the event-driven core of the kernel.
//!
//! Implements a spatial variant of the Gillespie next-reaction method:
//! every candidate reaction gets an exponentially distributed waiting
//! time, candidates sit in a time-ordered queue, and the earliest one
//! fires. Firing mutates the surface, eagerly invalidates every pending
//! event that touched the changed sites, and re-discovers fresh
//! candidates for them.
//!
//! Everything runs synchronously on one thread: the scheduler
//! exclusively owns its surface, rule table, queue, and random
//! generator. Parallel multi-trajectory runs need one scheduler (and
//! one surface clone) per trajectory.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::error::KineticaResult;
use crate::event::{Event, EventIdGen};
use crate::queue::EventQueue;
use crate::rule::{Rule, RuleId, RuleIndex};
use crate::surface::{GlobalState, NodeId, Surface};
use crate::time::SimTime;

/// Event-driven stochastic scheduler over a reactive surface.
///
/// Construction seeds the queue; the driving loop then calls
/// [`process_next_reaction`](Self::process_next_reaction) until
/// [`done`](Self::done). External consumers read `time()` and the
/// surface between steps; they never mutate either directly.
#[derive(Debug, Clone)]
pub struct ReactionScheduler {
    surface: Surface,
    rules: Vec<Rule>,
    index: RuleIndex,
    queue: EventQueue,
    id_gen: EventIdGen,
    rng: ChaCha8Rng,
    seed: u64,
    time: SimTime,
    simulation_duration: SimTime,
    /// Surface snapshot taken at construction, used by `reset(None)`.
    initial_state: GlobalState,
}

impl ReactionScheduler {
    /// Create a scheduler over `surface` with the given rule table.
    ///
    /// Snapshots the surface's initial global state, builds the
    /// state→rules index, and seeds the queue with every initially
    /// possible reaction. Rules are already validated by construction
    /// ([`Rule::new`] is the only way to obtain one), so no
    /// configuration error can survive to this point.
    pub fn new(
        surface: Surface,
        rules: Vec<Rule>,
        seed: u64,
        simulation_duration: f64,
    ) -> Self {
        let initial_state = surface.global_state();
        let index = RuleIndex::build(&rules);
        let mut scheduler = ReactionScheduler {
            surface,
            rules,
            index,
            queue: EventQueue::new(),
            id_gen: EventIdGen::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            time: SimTime::ZERO,
            simulation_duration: SimTime::new(simulation_duration),
            initial_state,
        };
        scheduler.seed_reactions();
        scheduler
    }

    // ── Driving interface ─────────────────────────────────────────

    /// Clear the queue, restore the surface (to `state`, or to the
    /// initial snapshot when `None`), rewind the clock to zero, and
    /// re-seed the queue.
    ///
    /// The random generator is *not* reseeded: successive resets give
    /// independent trajectories, which repeated-trial harnesses rely
    /// on. Use [`reseed`](Self::reseed) for explicit reproduction.
    pub fn reset(&mut self, state: Option<&GlobalState>) -> KineticaResult<()> {
        match state {
            Some(state) => self.surface.set_global_state(state)?,
            // The initial snapshot covers exactly this surface.
            None => self.surface.set_global_state(&self.initial_state)?,
        }
        self.time = SimTime::ZERO;
        self.seed_reactions();
        Ok(())
    }

    /// Restart the random generator from `seed`. Combined with
    /// [`reset`](Self::reset), this reproduces a trajectory exactly.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// True iff no transitions are left: the queue is empty or the
    /// clock has reached the simulation duration. Pure query.
    pub fn done(&self) -> bool {
        self.queue.is_empty() || self.time >= self.simulation_duration
    }

    /// Fire the earliest pending reaction.
    ///
    /// Returns the fired event, or `None` when the run is over — either
    /// the queue was empty or the popped event lay beyond the duration
    /// bound (such an event is discarded; it never fires). In both
    /// terminal cases the clock is pinned to the duration. Safe to call
    /// again after termination.
    pub fn process_next_reaction(&mut self) -> Option<Event> {
        let Some(event) = self.queue.pop_min() else {
            self.time = self.simulation_duration;
            return None;
        };
        if event.time > self.simulation_duration {
            self.time = self.simulation_duration;
            return None;
        }
        self.time = event.time;

        // Apply products in participant order.
        let outputs = self.rules[event.rule.index()].outputs().to_vec();
        for (slot, &node) in event.participants.iter().enumerate() {
            self.surface.set_state(node, outputs[slot].clone());
        }

        // Every other pending event touching a changed site is now
        // based on stale state.
        for &node in &event.participants {
            let removed = self.queue.invalidate_participant(node);
            if removed > 0 {
                trace!(node = %node, removed, "invalidated stale events");
            }
        }

        // Re-discover for the settled sites. The second participant
        // excludes the first so the just-fired pairing is not
        // immediately re-derived from the other direction.
        let first = event.first_participant();
        self.discover_reactions_for(first, false, &[]);
        if let Some(second) = event.second_participant() {
            self.discover_reactions_for(second, false, &[first]);
        }

        debug!(
            event = %event.id,
            rule = %self.rules[event.rule.index()],
            time = %self.time,
            pending = self.queue.len(),
            "fired reaction"
        );
        Some(event)
    }

    // ── Accessors ─────────────────────────────────────────────────

    /// Current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// The duration bound for this run.
    pub fn simulation_duration(&self) -> SimTime {
        self.simulation_duration
    }

    /// The seed the generator was last (re)started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Read access to the surface (for visualization and inspection).
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The rule table.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Resolve a rule handle carried by an event.
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    /// Number of pending candidate events.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    // ── Reaction discovery ────────────────────────────────────────

    /// Seed the queue from scratch.
    ///
    /// `first_reactant_only` pins each node to reactant slot 0 so that
    /// a matching pair is seeded exactly once, not once per ordering.
    fn seed_reactions(&mut self) {
        self.queue.clear();
        let nodes: Vec<NodeId> = self.surface.node_ids().collect();
        for node in nodes {
            self.discover_reactions_for(node, true, &[]);
        }
        debug!(pending = self.queue.len(), "seeded initial reactions");
    }

    /// Enumerate and enqueue every physically possible next reaction in
    /// which `node` is a reactant.
    ///
    /// With `first_reactant_only`, the node's state must match the
    /// rule's first input slot exactly (setup mode); otherwise it may
    /// occupy either slot. Neighbors in `exclusion` are not eligible as
    /// the second reactant.
    fn discover_reactions_for(
        &mut self,
        node: NodeId,
        first_reactant_only: bool,
        exclusion: &[NodeId],
    ) {
        let state = self.surface.state(node).clone();
        let candidates = self.index.rules_for(&state).to_vec();
        if candidates.is_empty() {
            trace!(node = %node, state = %state, "no rules for state");
            return;
        }
        for rule_id in candidates {
            let rule = self.rules[rule_id.index()].clone();
            let eligible = if first_reactant_only {
                state == rule.inputs()[0]
            } else {
                rule.inputs().contains(&state)
            };
            if !eligible {
                continue;
            }

            match rule.arity() {
                1 => {
                    if let Some(wait) = self.sample_waiting_time(rule.rate()) {
                        self.enqueue(rule_id, vec![node], wait);
                    }
                }
                2 => {
                    // Eligibility guarantees the state appears in the
                    // inputs; in setup mode that occurrence is slot 0.
                    let slot = rule
                        .inputs()
                        .iter()
                        .position(|s| *s == state)
                        .unwrap_or(0);
                    let other_label = rule.inputs()[1 - slot].clone();

                    // A + A rules are combinatorially symmetric: each
                    // eligible pair is drawn twice, once per reactant
                    // ordering, each with an independent waiting time.
                    // Setup mode seeds each pair exactly once.
                    let instances = if rule.is_symmetric() && !first_reactant_only {
                        2
                    } else {
                        1
                    };

                    let neighbors = self.surface.neighbors(node).to_vec();
                    for (neighbor, weight) in neighbors {
                        if *self.surface.state(neighbor) != other_label {
                            continue;
                        }
                        if exclusion.contains(&neighbor) {
                            continue;
                        }
                        for instance in 0..instances {
                            let Some(wait) =
                                self.sample_waiting_time(rule.rate() * weight)
                            else {
                                continue;
                            };
                            let mut participants = if slot == 0 {
                                vec![node, neighbor]
                            } else {
                                vec![neighbor, node]
                            };
                            // The second draw of a symmetric pair
                            // carries the swapped ordering.
                            if instance == 1 {
                                participants.reverse();
                            }
                            self.enqueue(rule_id, participants, wait);
                        }
                    }
                }
                arity => unreachable!("rule arity {} rejected at construction", arity),
            }
        }
    }

    /// Draw an exponential waiting time `ln(1/U) / rate`.
    ///
    /// Returns `None` for non-finite results (the rate-zero degenerate
    /// case, or a zero uniform draw) — expected, silently skipped.
    fn sample_waiting_time(&mut self, rate: f64) -> Option<f64> {
        let u: f64 = self.rng.gen();
        let wait = (1.0 / u).ln() / rate;
        wait.is_finite().then_some(wait)
    }

    fn enqueue(&mut self, rule: RuleId, participants: Vec<NodeId>, wait: f64) {
        let event = Event::new(
            self.id_gen.next_id(),
            self.time.plus(wait),
            rule,
            participants,
            self.time,
        );
        trace!(event = %event.id, time = %event.time, rule = %rule, "enqueued candidate");
        self.queue.push(event);
    }
}
