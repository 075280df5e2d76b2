//! The reactive surface: an arena-owned graph of sites with positional
//! identity, per-site chemical state, and weighted adjacency.
//!
//! Nodes are owned by the `Surface` for their lifetime. Neighbor lists
//! are back-edges into the same arena, represented as `(NodeId, weight)`
//! pairs — a node never owns its neighbors, so mutating one site's state
//! in place cannot alias another.

use std::collections::{BTreeMap, HashMap};

use crate::error::{KineticaError, KineticaResult};
use crate::rule::Species;

// ── Position ──────────────────────────────────────────────────────────

/// A node's spatial identity — a grid-style coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Create a position from row/column coordinates.
    #[inline]
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ── Node ID ───────────────────────────────────────────────────────────

/// A lightweight handle to a node in the surface arena.
///
/// `NodeId` is a non-owning index: cheap to copy, hashable, and only
/// meaningful for the surface that minted it (or a clone of it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a raw index into a `NodeId`.
    #[inline]
    pub fn new(raw: u32) -> Self {
        NodeId(raw)
    }

    /// Return the raw index.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "N{}", self.0)
    }
}

// ── Surface ───────────────────────────────────────────────────────────

/// A full snapshot of every node's species, keyed by position.
///
/// Used for simulation reset, not incremental updates.
pub type GlobalState = BTreeMap<Position, Species>;

/// A single reactive site.
#[derive(Debug, Clone)]
struct Node {
    position: Position,
    state: Species,
    /// Weighted back-edges into the owning arena.
    neighbors: Vec<(NodeId, f64)>,
}

/// Graph of reactive sites with weighted adjacency.
///
/// The surface owns the node collection and the adjacency structure.
/// It is `Clone` so that parallel multi-trajectory runs can give each
/// scheduler its own copy — node state is mutated in place, so a live
/// surface must never be shared between schedulers.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    nodes: Vec<Node>,
    by_position: HashMap<Position, NodeId>,
}

impl Surface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Surface {
            nodes: Vec::new(),
            by_position: HashMap::new(),
        }
    }

    /// Build a `rows` x `cols` square lattice with 4-neighbour adjacency,
    /// all edges weight 1.0, every site starting in `state`.
    pub fn square_grid(rows: u32, cols: u32, state: impl Into<Species>) -> Self {
        let state = state.into();
        let mut surface = Surface::new();
        for row in 0..rows as i32 {
            for col in 0..cols as i32 {
                // Positions are unique by construction.
                let _ = surface.add_node(Position::new(row, col), state.clone());
            }
        }
        let id_at = |row: i32, col: i32| NodeId::new((row * cols as i32 + col) as u32);
        for row in 0..rows as i32 {
            for col in 0..cols as i32 {
                let here = id_at(row, col);
                if col + 1 < cols as i32 {
                    surface.link(here, id_at(row, col + 1), 1.0);
                }
                if row + 1 < rows as i32 {
                    surface.link(here, id_at(row + 1, col), 1.0);
                }
            }
        }
        surface
    }

    /// Add a node at `position` in the given initial state.
    ///
    /// Fails if a node already exists at that position.
    pub fn add_node(
        &mut self,
        position: Position,
        state: impl Into<Species>,
    ) -> KineticaResult<NodeId> {
        if self.by_position.contains_key(&position) {
            return Err(KineticaError::DuplicatePosition(position));
        }
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node {
            position,
            state: state.into(),
            neighbors: Vec::new(),
        });
        self.by_position.insert(position, id);
        Ok(id)
    }

    /// Add a symmetric weighted edge between two nodes.
    ///
    /// The weight is a positive multiplier on bimolecular reaction rates
    /// across this edge.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> KineticaResult<()> {
        if a.index() >= self.nodes.len() {
            return Err(KineticaError::UnknownNode(a));
        }
        if b.index() >= self.nodes.len() {
            return Err(KineticaError::UnknownNode(b));
        }
        if !(weight.is_finite() && weight > 0.0) {
            return Err(KineticaError::InvalidWeight { weight });
        }
        self.link(a, b, weight);
        Ok(())
    }

    /// Internal edge insertion; ids and weight already validated.
    fn link(&mut self, a: NodeId, b: NodeId, weight: f64) {
        self.nodes[a.index()].neighbors.push((b, weight));
        self.nodes[b.index()].neighbors.push((a, weight));
    }

    /// Number of nodes on the surface.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the surface has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all node ids in arena (insertion) order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId::new)
    }

    /// Look up the node at a position.
    pub fn node_at(&self, position: Position) -> Option<NodeId> {
        self.by_position.get(&position).copied()
    }

    /// A node's position. Ids are minted by this surface, so the lookup
    /// is infallible for ids obtained from it.
    pub fn position(&self, id: NodeId) -> Position {
        self.nodes[id.index()].position
    }

    /// A node's current species.
    pub fn state(&self, id: NodeId) -> &Species {
        &self.nodes[id.index()].state
    }

    /// Overwrite a node's species in place.
    pub fn set_state(&mut self, id: NodeId, state: Species) {
        self.nodes[id.index()].state = state;
    }

    /// A node's weighted neighbor list, in insertion order.
    pub fn neighbors(&self, id: NodeId) -> &[(NodeId, f64)] {
        &self.nodes[id.index()].neighbors
    }

    /// Snapshot every node's species, keyed by position.
    pub fn global_state(&self) -> GlobalState {
        self.nodes
            .iter()
            .map(|node| (node.position, node.state.clone()))
            .collect()
    }

    /// Restore node species from a snapshot.
    ///
    /// Every entry must name a position that exists on this surface;
    /// positions absent from the snapshot keep their current state.
    pub fn set_global_state(&mut self, state: &GlobalState) -> KineticaResult<()> {
        for (position, species) in state {
            let id = self
                .by_position
                .get(position)
                .copied()
                .ok_or(KineticaError::UnknownPosition(*position))?;
            self.nodes[id.index()].state = species.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_and_lookup() {
        let mut surface = Surface::new();
        let id = surface.add_node(Position::new(0, 0), "A").unwrap();
        assert_eq!(surface.len(), 1);
        assert_eq!(surface.state(id).as_str(), "A");
        assert_eq!(surface.position(id), Position::new(0, 0));
        assert_eq!(surface.node_at(Position::new(0, 0)), Some(id));
        assert_eq!(surface.node_at(Position::new(1, 1)), None);
    }

    #[test]
    fn test_duplicate_position_rejected() {
        let mut surface = Surface::new();
        surface.add_node(Position::new(0, 0), "A").unwrap();
        let err = surface.add_node(Position::new(0, 0), "B").unwrap_err();
        assert_eq!(err, KineticaError::DuplicatePosition(Position::new(0, 0)));
    }

    #[test]
    fn test_edges_are_symmetric() {
        let mut surface = Surface::new();
        let a = surface.add_node(Position::new(0, 0), "A").unwrap();
        let b = surface.add_node(Position::new(0, 1), "B").unwrap();
        surface.add_edge(a, b, 2.5).unwrap();

        assert_eq!(surface.neighbors(a), &[(b, 2.5)]);
        assert_eq!(surface.neighbors(b), &[(a, 2.5)]);
    }

    #[test]
    fn test_edge_to_unknown_node_rejected() {
        let mut surface = Surface::new();
        let a = surface.add_node(Position::new(0, 0), "A").unwrap();
        let err = surface.add_edge(a, NodeId::new(9), 1.0).unwrap_err();
        assert_eq!(err, KineticaError::UnknownNode(NodeId::new(9)));
    }

    #[test]
    fn test_bad_weight_rejected() {
        let mut surface = Surface::new();
        let a = surface.add_node(Position::new(0, 0), "A").unwrap();
        let b = surface.add_node(Position::new(0, 1), "B").unwrap();
        for weight in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = surface.add_edge(a, b, weight).unwrap_err();
            assert!(matches!(err, KineticaError::InvalidWeight { .. }));
        }
    }

    #[test]
    fn test_square_grid_adjacency() {
        let surface = Surface::square_grid(3, 3, "A");
        assert_eq!(surface.len(), 9);

        // Corner has 2 neighbors, edge midpoint 3, center 4.
        let corner = surface.node_at(Position::new(0, 0)).unwrap();
        let edge = surface.node_at(Position::new(0, 1)).unwrap();
        let center = surface.node_at(Position::new(1, 1)).unwrap();
        assert_eq!(surface.neighbors(corner).len(), 2);
        assert_eq!(surface.neighbors(edge).len(), 3);
        assert_eq!(surface.neighbors(center).len(), 4);

        for id in surface.node_ids() {
            assert_eq!(surface.state(id).as_str(), "A");
            for &(_, weight) in surface.neighbors(id) {
                assert_eq!(weight, 1.0);
            }
        }
    }

    #[test]
    fn test_global_state_roundtrip() {
        let mut surface = Surface::square_grid(2, 2, "A");
        let snapshot = surface.global_state();
        assert_eq!(snapshot.len(), 4);

        let id = surface.node_at(Position::new(1, 1)).unwrap();
        surface.set_state(id, Species::from("B"));
        assert_eq!(surface.state(id).as_str(), "B");

        surface.set_global_state(&snapshot).unwrap();
        assert_eq!(surface.state(id).as_str(), "A");
    }

    #[test]
    fn test_set_global_state_unknown_position() {
        let mut surface = Surface::square_grid(2, 2, "A");
        let mut state = GlobalState::new();
        state.insert(Position::new(9, 9), Species::from("B"));
        let err = surface.set_global_state(&state).unwrap_err();
        assert_eq!(err, KineticaError::UnknownPosition(Position::new(9, 9)));
    }
}
