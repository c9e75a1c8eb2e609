//! The turn-aware layered Dijkstra engine.
//!
//! The engine owns the priority queue and the movement semantics (costs,
//! turn rollover, layer transitions, teleports); everything storage- and
//! policy-specific is delegated to the injected [`SearchSpace`].

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use log::{debug, trace};
use wander_core::{
    Faction, Layer, MapObject, Mover, MoverId, ObjectKind, Pos, Relation, TurnProfile, World,
};

use crate::cost;
use crate::node::{Accessibility, BaseNode, Blocker, NodeAction, NodeId, TURN_UNREACHED};
use crate::options::SearchOptions;
use crate::rules::{self, MoveContext, MoveVerdict};
use crate::space::{Bypass, SearchSpace};
use crate::turn::TurnCache;

/// Queue entry: a snapshot of the node's key at push time. Entries whose
/// snapshot no longer matches the node are stale and skipped on pop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct QueueEntry {
    turns: u8,
    remains: u32,
    id: NodeId,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: fewer turns first, then more points remaining.
        other
            .turns
            .cmp(&self.turns)
            .then(self.remains.cmp(&other.remains))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One search pass over a [`SearchSpace`].
pub struct Engine<'a, W: World, S: SearchSpace> {
    world: &'a W,
    options: &'a SearchOptions,
    faction: Faction,
    space: &'a mut S,
    caches: HashMap<MoverId, TurnCache>,
    queue: BinaryHeap<QueueEntry>,
}

impl<'a, W: World, S: SearchSpace> Engine<'a, W, S> {
    pub fn new(
        world: &'a W,
        options: &'a SearchOptions,
        faction: Faction,
        space: &'a mut S,
    ) -> Self {
        Self {
            world,
            options,
            faction,
            space,
            caches: HashMap::new(),
            queue: BinaryHeap::new(),
        }
    }

    /// Runs the full relaxation until the queue drains.
    pub fn run(&mut self) {
        self.initialize_graph();

        if self.space.is_start_locked() {
            debug!("search start is patrol-locked, nothing to do");
            return;
        }

        for id in self.space.initial_nodes() {
            self.push(id);
        }

        let mut settled = 0usize;
        while let Some(entry) = self.queue.pop() {
            {
                let cp = self.space.base(entry.id);
                if cp.turns != entry.turns || cp.move_remains != entry.remains {
                    continue; // stale
                }
            }
            if self.space.is_locked(entry.id) {
                continue;
            }
            self.space.lock(entry.id);
            settled += 1;
            self.expand(entry.id);
        }
        debug!("search finished, {settled} nodes settled");
    }

    /// Seeds every cell of the space with its static accessibility. Rock
    /// cells stay uninitialized; water carries the sail layer, land the
    /// land layer, and the special layers follow the option switches.
    fn initialize_graph(&mut self) {
        let size = self.space.size();
        for idx in 0..size.tile_count() {
            let pos = size.pos_at(idx);
            let Some(tile) = self.world.tile(pos) else {
                continue;
            };
            if tile.terrain.is_rock() {
                continue;
            }

            let mut layers: Vec<Layer> = Vec::with_capacity(3);
            if tile.terrain.is_water() {
                layers.push(Layer::Sail);
                if self.options.use_flying {
                    layers.push(Layer::Air);
                }
                if self.options.use_water_walking {
                    layers.push(Layer::Water);
                }
            } else {
                layers.push(Layer::Land);
                if self.options.use_flying {
                    layers.push(Layer::Air);
                }
            }

            for layer in layers {
                let access =
                    rules::evaluate_accessibility(self.world, pos, tile, layer, self.faction);
                self.space.reset_cell(pos, layer, access);
            }
        }
    }

    fn push(&mut self, id: NodeId) {
        let node = self.space.base(id);
        self.queue.push(QueueEntry {
            turns: node.turns,
            remains: node.move_remains,
            id,
        });
    }

    fn profile(&mut self, mover: &Mover, turn: u8) -> TurnProfile {
        self.caches.entry(mover.id).or_default().at(mover, turn)
    }

    fn expand(&mut self, cp_id: NodeId) {
        let world = self.world;
        let opts = self.options;
        let cp = *self.space.base(cp_id);
        let mover = self.space.mover_of(cp_id).clone();

        let mut turn = cp.turns;
        let mut movement = cp.move_remains;
        if movement == 0 {
            if turn >= TURN_UNREACHED - 1 {
                return;
            }
            turn += 1;
            movement = self.profile(&mover, turn).max_points(cp.layer);
            if !pass_one_turn_limit(&cp, opts) {
                return;
            }
        }

        let Some(ct) = world.tile(cp.pos) else {
            return;
        };
        let ct_obj = world.top_object(cp.pos).copied();

        let mut neighbour_buf = Vec::with_capacity(8);
        rules::neighbour_tiles(
            world,
            ct,
            cp.pos,
            None,
            cp.layer == Layer::Sail,
            &mut neighbour_buf,
        );
        // Steps off a visitable object obey its entry-direction rules.
        if let Some(obj) = rules::visitable_obj(ct_obj.as_ref(), cp.layer) {
            let obj_pos = obj.pos;
            neighbour_buf.retain(|&tile| world.can_move_between(tile, obj_pos));
        }

        for &neighbour in &neighbour_buf {
            if !self.space.allows_move_to(neighbour) {
                continue;
            }
            let Some(dt) = world.tile(neighbour) else {
                continue;
            };
            let dt_obj = world.top_object(neighbour).copied();

            for layer in Layer::ALL {
                let profile = self.profile(&mover, turn);
                if !layer_enabled(layer, opts, &profile) {
                    continue;
                }
                if cp.layer != layer
                    && !rules::layer_transition_possible(&cp, mover.position, layer, dt, opts)
                {
                    continue;
                }

                for dp_id in self.space.next_nodes(cp_id, neighbour, layer) {
                    if self.space.is_locked(dp_id) {
                        continue;
                    }
                    let dp = *self.space.base(dp_id);
                    if dp.accessible == Accessibility::NotSet {
                        continue;
                    }
                    if cp.layer != layer && !rules::node_transition_possible(&cp, &dp, dt, opts) {
                        continue;
                    }

                    let ctx = MoveContext {
                        faction: mover.faction,
                        start_pos: mover.position,
                        src: &cp,
                        src_tile: ct,
                        src_obj: ct_obj.as_ref(),
                        dst: &dp,
                        dst_tile: dt,
                        dst_obj: dt_obj.as_ref(),
                    };
                    let verdict = rules::movement_to_dest(world, &ctx, opts);
                    if verdict == MoveVerdict::Denied {
                        continue;
                    }

                    let action = rules::dest_action(world, &ctx, opts);

                    let mut turn_next = turn;
                    let mut move_next = movement;
                    let mut profile_next = profile;
                    let mut cost = cost::step_cost(
                        world, &profile_next, mover.has_boat, cp.pos, ct, dp.pos, dt, move_next,
                        true,
                    );
                    if cost > move_next {
                        // Not affordable this turn; recompute against the
                        // next turn's full budget on the destination layer.
                        if turn_next >= TURN_UNREACHED - 1 {
                            continue;
                        }
                        turn_next += 1;
                        profile_next = self.profile(&mover, turn_next);
                        move_next = profile_next.max_points(layer);
                        cost = cost::step_cost(
                            world, &profile_next, mover.has_boat, cp.pos, ct, dp.pos, dt,
                            move_next, true,
                        );
                    }
                    let mut remains = move_next.saturating_sub(cost);
                    if matches!(action, NodeAction::Embark | NodeAction::Disembark) {
                        // Land <-> sail transitions still pay the step; the
                        // boarding bonus only removes the extra forfeit.
                        remains = cost::points_after_boarding(move_next, cost, &profile_next);
                    }

                    let blocker = match verdict {
                        MoveVerdict::SourceGuarded => Some(Blocker::SourceGuarded),
                        _ => match action {
                            NodeAction::Battle => Some(Blocker::DestinationGuarded),
                            NodeAction::BlockingVisit => Some(Blocker::DestinationBlockVis),
                            NodeAction::Visit => Some(Blocker::DestinationVisit),
                            _ => None,
                        },
                    };

                    let committed = match blocker {
                        None => {
                            self.accept(dp_id, cp_id, &cp, turn_next, remains, action, None, opts)
                        }
                        Some(blocker) => match self.space.try_bypass(
                            cp_id, dp_id, blocker, turn_next, remains, action,
                        ) {
                            None => None,
                            Some(Bypass::Accept) => self.accept(
                                dp_id,
                                cp_id,
                                &cp,
                                turn_next,
                                remains,
                                action,
                                Some(blocker),
                                opts,
                            ),
                            Some(Bypass::Committed(id)) => Some(id),
                        },
                    };

                    if let Some(id) = committed {
                        trace!(
                            "settle candidate {} -> {} turn {} remains {} via {:?}",
                            cp.pos, dp.pos, turn_next, remains, action
                        );
                        if rules::movement_after_dest(world, &ctx, opts, &mover, &profile_next, action)
                        {
                            self.push(id);
                        }
                    }
                }
            }
        }

        if self.space.teleports_enabled() {
            self.expand_teleports(cp_id, &cp, ct_obj.as_ref(), &mover, turn, movement);
        }

        for id in self.space.special_transitions(cp_id) {
            self.push(id);
        }
    }

    /// Ordinary improvement check and commit. Returns the committed node.
    #[allow(clippy::too_many_arguments)]
    fn accept(
        &mut self,
        dp_id: NodeId,
        cp_id: NodeId,
        cp: &BaseNode,
        turn: u8,
        remains: u32,
        action: NodeAction,
        blocker: Option<Blocker>,
        opts: &SearchOptions,
    ) -> Option<NodeId> {
        let in_this_turn = cp.turns == turn && remains > 0;
        if !self.space.better_way(dp_id, cp_id, remains, turn) {
            return None;
        }
        if !(in_this_turn || pass_one_turn_limit(cp, opts)) {
            return None;
        }
        self.space
            .commit(dp_id, cp_id, turn, remains, action, blocker)
            .then_some(dp_id)
    }

    /// Teleport pass: all passable exits of the channel the source object
    /// belongs to, plus the friendly gate network from a gate town. Free
    /// transit: exits inherit the source's turn and movement untouched.
    fn expand_teleports(
        &mut self,
        cp_id: NodeId,
        cp: &BaseNode,
        ct_obj: Option<&MapObject>,
        mover: &Mover,
        turn: u8,
        movement: u32,
    ) {
        let world = self.world;
        let opts = self.options;
        let Some(obj) = rules::visitable_obj(ct_obj, cp.layer) else {
            return;
        };
        let obj = *obj;

        let mut exits: Vec<Pos> = Vec::new();
        let profile = self.profile(mover, turn);

        if rules::allowed_teleport_entrance(world, &obj, mover, &profile, opts) {
            if let Some(channel) = world.channel_of(obj.id) {
                for exit_id in world.channel_exits(channel, mover.faction) {
                    if exit_id == obj.id {
                        continue;
                    }
                    let Some(exit) = world.object(exit_id) else {
                        continue;
                    };
                    if exit.kind == ObjectKind::Vortex
                        || world.is_exit_passable(exit_id, mover, mover.faction)
                    {
                        exits.push(exit.pos);
                    }
                }
            }
        }

        if opts.use_castle_gate
            && obj.kind == ObjectKind::Town
            && rules::relation_to(world, &obj, mover.faction) != Relation::Enemy
        {
            for site in world.gate_sites(mover.faction) {
                if site != obj.pos {
                    exits.push(site);
                }
            }
        }

        for exit_pos in exits {
            for dp_id in self.space.next_nodes(cp_id, exit_pos, cp.layer) {
                if self.space.is_locked(dp_id) {
                    continue;
                }
                let dp = *self.space.base(dp_id);
                if matches!(dp.accessible, Accessibility::NotSet | Accessibility::Blocked) {
                    continue;
                }

                if !self.space.better_way(dp_id, cp_id, movement, turn) {
                    continue;
                }
                let dt_obj = world.top_object(exit_pos).copied();
                let action =
                    rules::teleport_dest_action(world, dt_obj.as_ref(), dp.layer, mover.faction);
                if !self.space.commit(dp_id, cp_id, turn, movement, action, None) {
                    continue;
                }
                // Only plain teleport arrivals keep the search going; an
                // occupied exit ends the walk there.
                if action == NodeAction::TeleportNormal {
                    self.push(dp_id);
                }
            }
        }
    }
}

/// Whether a turn boundary may be crossed while standing on this node.
/// The water-walk layer never spans a turn; the air layer only does so
/// under the original ruleset when hovering over an accessible tile.
fn pass_one_turn_limit(cp: &BaseNode, opts: &SearchOptions) -> bool {
    if !opts.one_turn_special_layers {
        return true;
    }
    match cp.layer {
        Layer::Water => false,
        Layer::Air => {
            opts.original_movement_rules && cp.accessible == Accessibility::Accessible
        }
        Layer::Land | Layer::Sail => true,
    }
}

fn layer_enabled(layer: Layer, opts: &SearchOptions, profile: &TurnProfile) -> bool {
    match layer {
        Layer::Air => opts.use_flying && profile.layer_available(layer),
        Layer::Water => opts.use_water_walking && profile.layer_available(layer),
        Layer::Land | Layer::Sail => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_prefers_fewer_turns_then_more_points() {
        let mut heap = BinaryHeap::new();
        heap.push(QueueEntry { turns: 1, remains: 900, id: 0 });
        heap.push(QueueEntry { turns: 0, remains: 100, id: 1 });
        heap.push(QueueEntry { turns: 0, remains: 700, id: 2 });

        assert_eq!(heap.pop().unwrap().id, 2);
        assert_eq!(heap.pop().unwrap().id, 1);
        assert_eq!(heap.pop().unwrap().id, 0);
    }

    #[test]
    fn one_turn_limit_by_layer() {
        let opts = SearchOptions::default();
        let mut node = BaseNode::unreached(Pos::new(0, 0, 0), Layer::Water, Accessibility::Accessible);
        assert!(!pass_one_turn_limit(&node, &opts));
        node.layer = Layer::Land;
        assert!(pass_one_turn_limit(&node, &opts));
        node.layer = Layer::Air;
        assert!(pass_one_turn_limit(&node, &opts));
        node.accessible = Accessibility::Flyable;
        assert!(!pass_one_turn_limit(&node, &opts));
    }
}
