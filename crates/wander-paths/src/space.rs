//! The search-space seam: node storage and relaxation policy live behind
//! [`SearchSpace`], so the same engine drives both the single-actor table
//! and the multi-actor chain table.

use std::collections::HashSet;

use wander_core::{Layer, MapSize, Mover, Pos};

use crate::node::{Accessibility, BaseNode, Blocker, NodeAction, NodeId};
use crate::table::PathTable;

/// How a space resolved a blocked relaxation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bypass {
    /// Proceed with the ordinary improvement check and commit.
    Accept,
    /// The space committed a substitute node itself (e.g. a battle-marked
    /// chain node); the engine only decides whether to push it.
    Committed(NodeId),
}

/// Node storage plus relaxation policy for one search variant.
///
/// The engine owns the queue and the movement rules; the space owns the
/// nodes, decides which node a (tile, layer) step lands in, and judges
/// improvements and blocked steps.
pub trait SearchSpace {
    fn size(&self) -> MapSize;

    /// Install a fresh cell with its static accessibility.
    fn reset_cell(&mut self, pos: Pos, layer: Layer, accessible: Accessibility);

    /// Seed nodes, already carrying turn 0 state.
    fn initial_nodes(&mut self) -> Vec<NodeId>;

    /// Candidate destination nodes for a step from `source` onto
    /// `(target, layer)`. May be empty when the space prunes the step.
    fn next_nodes(&mut self, source: NodeId, target: Pos, layer: Layer) -> Vec<NodeId>;

    /// The actor whose rules and bonuses apply at this node.
    fn mover_of(&self, node: NodeId) -> &Mover;

    fn base(&self, node: NodeId) -> &BaseNode;

    fn is_locked(&self, node: NodeId) -> bool;

    fn lock(&mut self, node: NodeId);

    /// Whether arriving at `dest` with `remains` points on `turn` beats
    /// whatever is stored there.
    fn better_way(&self, dest: NodeId, _source: NodeId, remains: u32, turn: u8) -> bool {
        let dp = self.base(dest);
        !dp.reachable() || dp.turns > turn || (dp.turns >= turn && dp.move_remains < remains)
    }

    /// Store the improved way into `dest`. Returns `false` when the space
    /// rejects the link after all (chain spaces refuse degenerate links).
    fn commit(
        &mut self,
        dest: NodeId,
        source: NodeId,
        turn: u8,
        remains: u32,
        action: NodeAction,
        blocker: Option<Blocker>,
    ) -> bool;

    /// Ask the space to resolve a blocked step. `None` drops the step.
    fn try_bypass(
        &mut self,
        source: NodeId,
        dest: NodeId,
        blocker: Blocker,
        turn: u8,
        remains: u32,
        action: NodeAction,
    ) -> Option<Bypass>;

    /// Whether the search cannot move at all (zero-radius patrol).
    fn is_start_locked(&self) -> bool {
        false
    }

    /// Patrol filter on destination tiles.
    fn allows_move_to(&self, _pos: Pos) -> bool {
        true
    }

    fn teleports_enabled(&self) -> bool {
        true
    }

    /// Extra same-source transitions the space wants expanded after a node
    /// is settled (recall casts, actor hand-offs). Returned nodes are
    /// already committed; the engine only pushes them.
    fn special_transitions(&mut self, _source: NodeId) -> Vec<NodeId> {
        Vec::new()
    }
}

/// Patrol assignment restricting a mover's search.
#[derive(Clone, Debug, Default)]
pub enum PatrolState {
    /// No patrol; the whole map is in scope.
    #[default]
    Free,
    /// Zero-radius patrol: the mover may not move at all.
    Locked,
    /// The mover may only enter the precomputed tile set.
    Radius(HashSet<Pos>),
}

impl PatrolState {
    /// Patrol around `center` within Manhattan distance `radius`. A zero
    /// radius locks the mover in place.
    pub fn around(size: MapSize, center: Pos, radius: i32) -> Self {
        if radius == 0 {
            return PatrolState::Locked;
        }

        let mut tiles = HashSet::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() + dy.abs() > radius {
                    continue;
                }
                let pos = center.shift(dx, dy);
                if size.contains(pos) {
                    tiles.insert(pos);
                }
            }
        }
        PatrolState::Radius(tiles)
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        matches!(self, PatrolState::Locked)
    }

    #[inline]
    pub fn allows(&self, pos: Pos) -> bool {
        match self {
            PatrolState::Radius(tiles) => tiles.contains(&pos),
            _ => true,
        }
    }

    /// Patrolling movers never use teleport networks; goal logic elsewhere
    /// is not aware of patrol bounds and would route through them.
    #[inline]
    pub fn blocks_teleports(&self) -> bool {
        matches!(self, PatrolState::Radius(_))
    }
}

/// The single-actor search space: one [`PathTable`], one mover, an
/// optional patrol restriction.
pub struct SingleSpace<'a> {
    table: &'a mut PathTable,
    mover: &'a Mover,
    patrol: PatrolState,
}

impl<'a> SingleSpace<'a> {
    pub fn new(table: &'a mut PathTable, mover: &'a Mover, patrol: PatrolState) -> Self {
        Self {
            table,
            mover,
            patrol,
        }
    }
}

impl SearchSpace for SingleSpace<'_> {
    fn size(&self) -> MapSize {
        self.table.size()
    }

    fn reset_cell(&mut self, pos: Pos, layer: Layer, accessible: Accessibility) {
        self.table.reset_cell(pos, layer, accessible);
    }

    fn initial_nodes(&mut self) -> Vec<NodeId> {
        let Some(id) = self.table.id_of(self.mover.position, self.mover.start_layer()) else {
            return Vec::new();
        };
        let node = self.table.by_id_mut(id);
        node.base.turns = 0;
        node.base.move_remains = self.mover.movement;
        vec![id]
    }

    fn next_nodes(&mut self, _source: NodeId, target: Pos, layer: Layer) -> Vec<NodeId> {
        self.table.id_of(target, layer).into_iter().collect()
    }

    fn mover_of(&self, _node: NodeId) -> &Mover {
        self.mover
    }

    fn base(&self, node: NodeId) -> &BaseNode {
        &self.table.by_id(node).base
    }

    fn is_locked(&self, node: NodeId) -> bool {
        self.table.by_id(node).locked
    }

    fn lock(&mut self, node: NodeId) {
        self.table.by_id_mut(node).locked = true;
    }

    fn commit(
        &mut self,
        dest: NodeId,
        source: NodeId,
        turn: u8,
        remains: u32,
        action: NodeAction,
        _blocker: Option<Blocker>,
    ) -> bool {
        // Two nodes must never point at each other.
        debug_assert_ne!(dest, source);
        debug_assert_ne!(self.table.by_id(source).prev, dest);
        if dest == source || self.table.by_id(source).prev == dest {
            return false;
        }

        let node = self.table.by_id_mut(dest);
        node.base.move_remains = remains;
        node.base.turns = turn;
        node.base.action = action;
        node.prev = source;
        true
    }

    fn try_bypass(
        &mut self,
        _source: NodeId,
        _dest: NodeId,
        blocker: Blocker,
        _turn: u8,
        _remains: u32,
        _action: NodeAction,
    ) -> Option<Bypass> {
        match blocker {
            // A lone mover cannot leave a guarded tile it did not start on.
            Blocker::SourceGuarded => None,
            // Destination stops are ordinary final nodes here; the push
            // gate already keeps the search from continuing past them.
            Blocker::DestinationGuarded
            | Blocker::DestinationBlockVis
            | Blocker::DestinationVisit => Some(Bypass::Accept),
        }
    }

    fn is_start_locked(&self) -> bool {
        self.patrol.is_locked()
    }

    fn allows_move_to(&self, pos: Pos) -> bool {
        self.patrol.allows(pos)
    }

    fn teleports_enabled(&self) -> bool {
        !self.patrol.blocks_teleports()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patrol_radius_is_manhattan() {
        let size = MapSize::new(10, 10, 1);
        let patrol = PatrolState::around(size, Pos::new(5, 5, 0), 2);
        assert!(patrol.allows(Pos::new(5, 5, 0)));
        assert!(patrol.allows(Pos::new(6, 6, 0)));
        assert!(patrol.allows(Pos::new(5, 3, 0)));
        assert!(!patrol.allows(Pos::new(7, 6, 0)));
        assert!(!patrol.is_locked());
        assert!(patrol.blocks_teleports());
    }

    #[test]
    fn zero_radius_patrol_locks() {
        let size = MapSize::new(10, 10, 1);
        let patrol = PatrolState::around(size, Pos::new(5, 5, 0), 0);
        assert!(patrol.is_locked());
        assert!(!patrol.blocks_teleports());
    }

    #[test]
    fn free_state_allows_everything() {
        let patrol = PatrolState::default();
        assert!(patrol.allows(Pos::new(0, 0, 0)));
        assert!(!patrol.is_locked());
        assert!(!patrol.blocks_teleports());
    }

    #[test]
    fn single_space_seeds_the_start_cell() {
        let size = MapSize::new(6, 6, 1);
        let mut table = PathTable::new(size);
        for idx in 0..size.tile_count() {
            table.reset_cell(size.pos_at(idx), Layer::Land, Accessibility::Accessible);
        }
        let mover = wander_world::test_mover(Pos::new(2, 2, 0));
        let mut space = SingleSpace::new(&mut table, &mover, PatrolState::Free);

        let seeds = space.initial_nodes();
        assert_eq!(seeds.len(), 1);
        let start = space.base(seeds[0]);
        assert_eq!(start.pos, Pos::new(2, 2, 0));
        assert_eq!(start.turns, 0);
        assert_eq!(start.move_remains, mover.movement);
    }
}
