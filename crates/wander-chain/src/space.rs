//! Multi-actor chain search space.
//!
//! Runs the shared relaxation engine over [`ChainTable`] slots: each node
//! carries the actor set that produced it and the army it still has, slots
//! compete per cell, and guarded steps can fork into battle-marked chains.

use wander_core::{DangerModel, Layer, MapSize, Mover, Pos, World};
use wander_paths::{Accessibility, BaseNode, Blocker, Bypass, NodeAction, NodeId, SearchSpace};

use crate::actor::ChainActors;
use crate::mask::ChainMask;
use crate::table::{ChainNode, ChainTable};

pub struct ChainSpace<'a, W: World, D: DangerModel> {
    world: &'a W,
    danger: &'a D,
    actors: &'a ChainActors,
    table: &'a mut ChainTable,
}

impl<'a, W: World, D: DangerModel> ChainSpace<'a, W, D> {
    pub fn new(
        world: &'a W,
        danger: &'a D,
        actors: &'a ChainActors,
        table: &'a mut ChainTable,
    ) -> Self {
        Self {
            world,
            danger,
            actors,
            table,
        }
    }

    /// Dominance prune on a freshly resolved destination slot: drop the step
    /// when a sibling slot at the cell already carries a chain that is at
    /// least as strong and at least as early as the candidate. The two
    /// clauses are deliberately asymmetric: an equal-strength sibling must
    /// strictly beat the candidate's time, a strictly stronger one cancels
    /// on a time tie as well.
    fn should_cancel(&self, dest: NodeId, candidate: &ChainNode) -> bool {
        let cell = self.table.by_id(dest).base;
        for id in self.table.slot_ids(cell.pos, cell.layer) {
            if id == dest {
                continue;
            }
            let other = self.table.by_id(id);
            if !other.in_use() || !other.base.reachable() {
                continue;
            }
            if other.army_value >= candidate.army_value
                && (other.base.turns < candidate.base.turns
                    || (other.base.turns == candidate.base.turns
                        && other.base.move_remains > candidate.base.move_remains))
            {
                return true;
            }
            if other.army_value > candidate.army_value
                && other.base.turns == candidate.base.turns
                && other.base.move_remains >= candidate.base.move_remains
            {
                return true;
            }
        }
        false
    }

    /// Recall casts: jump from the actor's start to friendly recall sites,
    /// paying the cast's movement toll. Basic casters only reach the
    /// nearest site.
    fn recall_transitions(&mut self, source: NodeId, out: &mut Vec<NodeId>) {
        let cp = *self.table.by_id(source);
        let mover = self.actors.get(cp.actor);
        if cp.base.pos != mover.position || !mover.can_cast_recall() {
            return;
        }
        let Some(recall) = mover.recall else {
            return;
        };
        if cp.base.move_remains < recall.move_cost {
            return;
        }

        let mut sites = self.world.recall_sites(mover.faction);
        sites.retain(|site| *site != cp.base.pos);
        if !recall.advanced {
            sites = sites
                .into_iter()
                .min_by_key(|site| cp.base.pos.dist2d_sq(*site))
                .into_iter()
                .collect();
        }

        let remains = cp.base.move_remains - recall.move_cost;
        for site in sites {
            let Some(id) = self.table.allocate(site, Layer::Land, cp.mask, cp.actor) else {
                continue;
            };
            if !self.better_way(id, source, remains, cp.base.turns) {
                continue;
            }
            if self.commit(
                id,
                source,
                cp.base.turns,
                remains,
                NodeAction::TeleportNormal,
                None,
            ) {
                out.push(id);
            }
        }
    }

    /// Actor hand-offs: a chain ending on a waiting friendly actor's start
    /// tile continues as that actor, carrying the combined army. The
    /// receiving actor spends nothing to take over; its own budget for the
    /// arrival turn applies.
    fn handoff_transitions(&mut self, source: NodeId, out: &mut Vec<NodeId>) {
        let cp = *self.table.by_id(source);
        let giver = self.actors.get(cp.actor);

        for (j, other) in self.actors.iter().enumerate() {
            if j == cp.actor
                || cp.mask.contains(j)
                || other.faction != giver.faction
                || other.position != cp.base.pos
                || other.start_layer() != cp.base.layer
            {
                continue;
            }

            let merged_mask = cp.mask.union(ChainMask::actor(j));
            let merged_army = cp.army_value + other.army;
            let remains = if cp.base.turns == 0 {
                other.movement
            } else {
                other.profile(cp.base.turns).max_points(other.start_layer())
            };

            let Some(id) = self.table.allocate(cp.base.pos, cp.base.layer, merged_mask, j) else {
                continue;
            };
            let existing = self.table.by_id(id);
            let improved = !existing.base.reachable()
                || merged_army > existing.army_value
                || existing.base.turns > cp.base.turns
                || (existing.base.turns >= cp.base.turns
                    && existing.base.move_remains < remains);
            if !improved {
                continue;
            }

            let danger = cp.danger;
            let node = self.table.by_id_mut(id);
            node.base.turns = cp.base.turns;
            node.base.move_remains = remains;
            // The hand-off is a stop of its own, so later commits keep it
            // in the chain link.
            node.base.action = NodeAction::BlockingVisit;
            node.prev = source;
            node.army_value = merged_army;
            node.army_loss = cp.army_loss;
            node.danger = danger;
            out.push(id);
        }
    }
}

impl<W: World, D: DangerModel> SearchSpace for ChainSpace<'_, W, D> {
    fn size(&self) -> MapSize {
        self.table.size()
    }

    fn reset_cell(&mut self, pos: Pos, layer: Layer, accessible: Accessibility) {
        self.table.reset_cell(pos, layer, accessible);
    }

    fn initial_nodes(&mut self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.actors.len());
        for (i, mover) in self.actors.iter().enumerate() {
            let Some(id) =
                self.table
                    .allocate(mover.position, mover.start_layer(), ChainMask::actor(i), i)
            else {
                continue;
            };
            let node = self.table.by_id_mut(id);
            node.base.turns = 0;
            node.base.move_remains = mover.movement;
            node.army_value = mover.army;
            node.army_loss = 0;
            node.danger = 0;
            out.push(id);
        }
        out
    }

    fn next_nodes(&mut self, source: NodeId, target: Pos, layer: Layer) -> Vec<NodeId> {
        let src = *self.table.by_id(source);

        // Merged chains only explore the first two turns; deeper horizons
        // belong to the single-actor searches.
        if src.base.turns > 1 && !src.mask.is_single_actor(src.actor) {
            return Vec::new();
        }

        let Some(id) = self.table.allocate(target, layer, src.mask, src.actor) else {
            return Vec::new();
        };
        if self.should_cancel(id, &src) {
            return Vec::new();
        }
        vec![id]
    }

    fn mover_of(&self, node: NodeId) -> &Mover {
        self.actors.get(self.table.by_id(node).actor)
    }

    fn base(&self, node: NodeId) -> &BaseNode {
        &self.table.by_id(node).base
    }

    // Chain slots are never settled for good: a later arrival with a
    // stronger army may still improve them, so every pop re-expands.
    fn is_locked(&self, _node: NodeId) -> bool {
        false
    }

    fn lock(&mut self, _node: NodeId) {}

    fn better_way(&self, dest: NodeId, source: NodeId, remains: u32, turn: u8) -> bool {
        let target = self.table.by_id(dest);
        if self.table.by_id(source).army_value > target.army_value {
            return true;
        }
        let dp = &target.base;
        !dp.reachable() || dp.turns > turn || (dp.turns >= turn && dp.move_remains < remains)
    }

    fn commit(
        &mut self,
        dest: NodeId,
        source: NodeId,
        turn: u8,
        remains: u32,
        action: NodeAction,
        blocker: Option<Blocker>,
    ) -> bool {
        let parent = *self.table.by_id(source);
        // A chain with no army left cannot push further.
        if parent.army_value == 0 {
            return false;
        }

        // Link compression: only significant nodes (stops, guard tiles,
        // hand-offs) appear in the chain; plain steps inherit the parent's
        // link.
        let mut prev = parent.prev;
        if blocker == Some(Blocker::SourceGuarded)
            && self.world.guard_position(parent.base.pos) == Some(parent.base.pos)
        {
            prev = source;
        }
        if matches!(
            parent.base.action,
            NodeAction::Visit | NodeAction::BlockingVisit
        ) {
            prev = source;
        }

        debug_assert_ne!(dest, source);
        debug_assert_ne!(prev, dest);
        if dest == source || prev == dest {
            return false;
        }

        let dest_pos = self.table.by_id(dest).base.pos;
        let danger = self.danger.danger_at(dest_pos).max(parent.danger);

        let node = self.table.by_id_mut(dest);
        node.base.move_remains = remains;
        node.base.turns = turn;
        node.base.action = action;
        node.prev = prev;
        node.army_value = parent.army_value;
        node.army_loss = parent.army_loss;
        node.danger = danger;
        true
    }

    fn try_bypass(
        &mut self,
        source: NodeId,
        dest: NodeId,
        blocker: Blocker,
        turn: u8,
        remains: u32,
        action: NodeAction,
    ) -> Option<Bypass> {
        let src = *self.table.by_id(source);
        let dst_base = self.table.by_id(dest).base;

        match blocker {
            // A blocking stop is only worth chaining through when the
            // object vanishes on pickup.
            Blocker::DestinationBlockVis => {
                let pickup = self
                    .world
                    .top_object(dst_base.pos)
                    .is_some_and(|obj| obj.kind.is_pickup());
                pickup.then_some(Bypass::Accept)
            }
            Blocker::DestinationVisit => Some(Bypass::Accept),
            // Leaving a guarded tile is allowed once the chain has already
            // committed to a battle, unless a guard shared by source and
            // destination stands on some third tile.
            Blocker::SourceGuarded => {
                if !src.mask.has_battle() {
                    return None;
                }
                let dst_guards = self.world.guards(dst_base.pos);
                for guard in self.world.guards(src.base.pos) {
                    if !dst_guards.contains(&guard) {
                        continue;
                    }
                    if guard != src.base.pos && guard != dst_base.pos {
                        return None;
                    }
                }
                Some(Bypass::Accept)
            }
            Blocker::DestinationGuarded => {
                let src_guards = self.world.guards(src.base.pos);
                let dst_guards = self.world.guards(dst_base.pos);
                if dst_guards.is_empty() {
                    return None;
                }
                // Guards fully shared with the source tile were already
                // fought by this chain.
                if src.mask.has_battle()
                    && dst_guards.iter().all(|guard| src_guards.contains(guard))
                {
                    return Some(Bypass::Accept);
                }

                // Fork a battle-marked chain that pays the estimated loss.
                let battle_id = self.table.allocate(
                    dst_base.pos,
                    dst_base.layer,
                    src.mask.with_battle(),
                    src.actor,
                )?;
                let mover = self.actors.get(src.actor);
                let loss = self
                    .danger
                    .estimate_loss(mover, dst_base.pos, src.army_value);
                if src.army_value <= loss {
                    return None;
                }
                if self.table.by_id(battle_id).army_value >= src.army_value - loss {
                    return None;
                }
                if !self.better_way(battle_id, source, remains, turn) {
                    return None;
                }
                if !self.commit(
                    battle_id,
                    source,
                    turn,
                    remains,
                    action,
                    Some(Blocker::DestinationGuarded),
                ) {
                    return None;
                }
                let node = self.table.by_id_mut(battle_id);
                node.army_loss = src.army_loss + loss;
                node.army_value = src.army_value - loss;
                Some(Bypass::Committed(battle_id))
            }
        }
    }

    fn special_transitions(&mut self, source: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.recall_transitions(source, &mut out);
        self.handoff_transitions(source, &mut out);
        out
    }
}
