//! Movement legality rules: which tiles neighbour each other, when a layer
//! change is allowed, how guards restrict movement, and what action a step
//! onto a tile implies.

use wander_core::{
    Faction, Layer, MapObject, Mover, ObjectKind, Pos, Relation, Tile, TurnProfile, World,
};

use crate::node::{Accessibility, BaseNode, NodeAction};
use crate::options::SearchOptions;

/// Outcome of the per-step feasibility check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveVerdict {
    Allowed,
    Denied,
    /// The step itself is fine but the source tile is watched by a guard;
    /// only a search space that accounts for the fight may take it.
    SourceGuarded,
}

/// Everything the per-step rules need to know about one candidate move.
pub struct MoveContext<'a> {
    pub faction: Faction,
    pub start_pos: Pos,
    pub src: &'a BaseNode,
    pub src_tile: Tile,
    pub src_obj: Option<&'a MapObject>,
    pub dst: &'a BaseNode,
    pub dst_tile: Tile,
    pub dst_obj: Option<&'a MapObject>,
}

impl MoveContext<'_> {
    fn src_visitable(&self) -> Option<&MapObject> {
        visitable_obj(self.src_obj, self.src.layer)
    }

    pub fn dst_visitable(&self) -> Option<&MapObject> {
        visitable_obj(self.dst_obj, self.dst.layer)
    }
}

/// Objects can only be interacted with from the land and sail layers, and
/// placed events are invisible to planning.
pub fn visitable_obj(obj: Option<&MapObject>, layer: Layer) -> Option<&MapObject> {
    match layer {
        Layer::Land | Layer::Sail => obj.filter(|o| o.kind != ObjectKind::Event),
        Layer::Air | Layer::Water => None,
    }
}

pub(crate) fn relation_to<W: World>(world: &W, obj: &MapObject, faction: Faction) -> Relation {
    match obj.owner {
        Some(owner) => world.relation(owner, faction),
        None => Relation::Neutral,
    }
}

/// Collects the walkable 8-neighbourhood of `pos` into `out`.
///
/// When sailing (`limit_coast_sailing`), a diagonal water move must not cut a
/// corner over the coast: both flanking tiles have to be water too. `on_land`
/// filters the result to land (`Some(true)`) or water (`Some(false)`) tiles.
pub(crate) fn neighbour_tiles<W: World>(
    world: &W,
    src_tile: Tile,
    pos: Pos,
    on_land: Option<bool>,
    limit_coast_sailing: bool,
    out: &mut Vec<Pos>,
) {
    for next in pos.neighbors_8() {
        let Some(tile) = world.tile(next) else {
            continue;
        };
        if tile.terrain.is_rock() {
            continue;
        }

        if src_tile.terrain.is_water()
            && limit_coast_sailing
            && tile.terrain.is_water()
            && pos.is_diagonal_to(next)
        {
            let flank_x = Pos::new(next.x, pos.y, pos.level);
            let flank_y = Pos::new(pos.x, next.y, pos.level);
            let both_water = world.tile(flank_x).is_some_and(|t| t.terrain.is_water())
                && world.tile(flank_y).is_some_and(|t| t.terrain.is_water());
            if !both_water {
                continue;
            }
        }

        match on_land {
            Some(land) if land != !tile.terrain.is_water() => continue,
            _ => out.push(next),
        }
    }
}

pub fn is_source_guarded<W: World>(world: &W, src_pos: Pos, start_pos: Pos) -> bool {
    // Moving away from the guarded start tile is always allowed; the guard
    // only stops movers that entered its zone mid-route.
    world.guard_position(src_pos).is_some() && src_pos != start_pos
}

pub fn is_destination_guarded<W: World>(
    world: &W,
    dst_pos: Pos,
    dst_accessible: Accessibility,
    ignore_accessibility: bool,
) -> bool {
    // Garrisons are visitable and guarded at the same time, hence the
    // accessibility override.
    world.guard_position(dst_pos).is_some()
        && (ignore_accessibility || dst_accessible == Accessibility::BlockVis)
}

pub fn is_destination_guardian<W: World>(world: &W, src_pos: Pos, dst_pos: Pos) -> bool {
    world.guard_position(src_pos) == Some(dst_pos)
}

/// First transition phase: rules that depend only on the source node and the
/// destination tile, checked before destination nodes are even looked up.
pub fn layer_transition_possible(
    src: &BaseNode,
    start_pos: Pos,
    dst_layer: Layer,
    dst_tile: Tile,
    opts: &SearchOptions,
) -> bool {
    // No layer change straight out of a fight.
    if src.action == NodeAction::Battle {
        return false;
    }

    match src.layer {
        Layer::Land => match dst_layer {
            Layer::Air => !opts.lightweight_flying || src.pos == start_pos,
            Layer::Sail => dst_tile.terrain.is_water(),
            _ => true,
        },
        Layer::Sail => dst_layer == Layer::Land && !dst_tile.terrain.is_water(),
        Layer::Air | Layer::Water => dst_layer == Layer::Land,
    }
}

/// Second transition phase: rules that need the destination node's
/// accessibility, checked once the node exists.
pub fn node_transition_possible(
    src: &BaseNode,
    dst: &BaseNode,
    dst_tile: Tile,
    opts: &SearchOptions,
) -> bool {
    if src.layer == dst.layer {
        return true;
    }

    match src.layer {
        Layer::Land => {
            // Empty water cannot be entered from land; there has to be a
            // boat or port to board.
            !(dst.layer == Layer::Sail && dst.accessible == Accessibility::Accessible)
        }
        Layer::Sail => {
            // Disembarking needs a clear tile; unblocked blockvis is fine
            // (clear coast watched by a guard), visitable tiles are not.
            let clear = dst.accessible == Accessibility::Accessible
                || (dst.accessible == Accessibility::BlockVis && !dst_tile.blocked);
            clear && !dst_tile.visitable
        }
        Layer::Air => {
            if opts.original_movement_rules {
                matches!(
                    src.accessible,
                    Accessibility::Accessible | Accessibility::Visitable
                ) || matches!(
                    dst.accessible,
                    Accessibility::Accessible | Accessibility::Visitable
                )
            } else {
                // A flyer may only land on accessible tiles.
                src.accessible == Accessibility::Accessible
                    || dst.accessible == Accessibility::Accessible
            }
        }
        Layer::Water => matches!(
            dst.accessible,
            Accessibility::Accessible | Accessibility::Visitable
        ),
    }
}

pub fn movement_to_dest<W: World>(
    world: &W,
    ctx: &MoveContext<'_>,
    opts: &SearchOptions,
) -> MoveVerdict {
    if ctx.dst.accessible == Accessibility::Blocked {
        return MoveVerdict::Denied;
    }

    match ctx.dst.layer {
        Layer::Land => {
            if !world.can_move_between(ctx.src.pos, ctx.dst.pos) {
                return MoveVerdict::Denied;
            }
            if is_source_guarded(world, ctx.src.pos, ctx.start_pos)
                && !(opts.original_movement_rules && ctx.src.layer == Layer::Air)
                && !is_destination_guardian(world, ctx.src.pos, ctx.dst.pos)
            {
                return MoveVerdict::SourceGuarded;
            }
        }

        Layer::Sail => {
            if !world.can_move_between(ctx.src.pos, ctx.dst.pos) {
                return MoveVerdict::Denied;
            }
            if is_source_guarded(world, ctx.src.pos, ctx.start_pos)
                // A mover that boarded on a guarded tile must be able to
                // sail away from it.
                && ctx.src.action != NodeAction::Embark
                && !is_destination_guardian(world, ctx.src.pos, ctx.dst.pos)
            {
                return MoveVerdict::SourceGuarded;
            }

            if ctx.src.layer == Layer::Land {
                match ctx.dst_visitable() {
                    Some(obj)
                        if matches!(obj.kind, ObjectKind::Boat | ObjectKind::Hero) => {}
                    _ => return MoveVerdict::Denied,
                }
            } else if ctx
                .dst_visitable()
                .is_some_and(|obj| obj.kind == ObjectKind::Boat)
            {
                // A mover already in a boat cannot visit empty boats.
                return MoveVerdict::Denied;
            }
        }

        Layer::Water => {
            if !world.can_move_between(ctx.src.pos, ctx.dst.pos)
                || ctx.dst.accessible != Accessibility::Accessible
            {
                return MoveVerdict::Denied;
            }
            if is_destination_guarded(world, ctx.dst.pos, ctx.dst.accessible, false) {
                return MoveVerdict::Denied;
            }
        }

        Layer::Air => {}
    }

    MoveVerdict::Allowed
}

/// Classifies what settling on the destination would mean.
pub fn dest_action<W: World>(
    world: &W,
    ctx: &MoveContext<'_>,
    opts: &SearchOptions,
) -> NodeAction {
    match ctx.dst.layer {
        Layer::Air | Layer::Water => return NodeAction::Normal,
        Layer::Land if ctx.src.layer == Layer::Sail => return NodeAction::Disembark,
        Layer::Land | Layer::Sail => {}
    }

    let mut action = NodeAction::Normal;
    if let Some(obj) = ctx.dst_visitable() {
        let rel = relation_to(world, obj, ctx.faction);
        match obj.kind {
            ObjectKind::Boat => action = NodeAction::Embark,
            ObjectKind::Hero => {
                action = if rel == Relation::Enemy {
                    NodeAction::Battle
                } else {
                    NodeAction::BlockingVisit
                };
            }
            ObjectKind::Town => {
                if obj.passable_for(rel) {
                    action = NodeAction::Visit;
                } else if rel == Relation::Enemy {
                    action = NodeAction::Battle;
                }
            }
            ObjectKind::Garrison => {
                if obj.passable_for(rel) {
                    if is_destination_guarded(world, ctx.dst.pos, ctx.dst.accessible, true) {
                        action = NodeAction::Battle;
                    }
                } else if rel == Relation::Enemy {
                    action = NodeAction::Battle;
                }
            }
            ObjectKind::BorderGate => {
                if obj.passable_for(rel) {
                    if is_destination_guarded(world, ctx.dst.pos, ctx.dst.accessible, true) {
                        action = NodeAction::Battle;
                    }
                } else {
                    action = NodeAction::BlockingVisit;
                }
            }
            _ => {
                if is_destination_guardian(world, ctx.src.pos, ctx.dst.pos) {
                    action = NodeAction::Battle;
                } else if obj.block_visit
                    && !(opts.use_castle_gate && obj.kind == ObjectKind::Town)
                {
                    action = NodeAction::BlockingVisit;
                }
            }
        }

        if action == NodeAction::Normal {
            action = if opts.original_movement_rules
                && is_destination_guarded(world, ctx.dst.pos, ctx.dst.accessible, false)
            {
                NodeAction::Battle
            } else {
                NodeAction::Visit
            };
        }
    } else if is_destination_guarded(world, ctx.dst.pos, ctx.dst.accessible, false) {
        action = NodeAction::Battle;
    }

    action
}

/// Whether the search may continue past the destination after `action`.
pub fn movement_after_dest<W: World>(
    world: &W,
    ctx: &MoveContext<'_>,
    opts: &SearchOptions,
    mover: &Mover,
    profile: &TurnProfile,
    action: NodeAction,
) -> bool {
    match action {
        NodeAction::Visit => match ctx.dst_visitable() {
            // Transit is only kept open over teleporters and unguarded
            // garrisons; other visitable tiles end the walk.
            Some(obj) if allowed_teleport_entrance(world, obj, mover, profile, opts) => true,
            Some(obj) if matches!(obj.kind, ObjectKind::Garrison | ObjectKind::BorderGate) => {
                true
            }
            _ => false,
        },

        NodeAction::Normal => true,

        NodeAction::Embark => opts.use_embark,

        NodeAction::Disembark => {
            opts.use_embark
                && !is_destination_guarded(world, ctx.dst.pos, ctx.dst.accessible, false)
        }

        // Movement after a fight is only possible from the guarded tile
        // onto the guardian's own tile.
        NodeAction::Battle => {
            is_destination_guarded(world, ctx.dst.pos, ctx.dst.accessible, false)
        }

        _ => false,
    }
}

/// Checks whether the mover may enter `obj` as a teleport entrance under the
/// current options and bonuses.
pub fn allowed_teleport_entrance<W: World>(
    world: &W,
    obj: &MapObject,
    mover: &Mover,
    profile: &TurnProfile,
    opts: &SearchOptions,
) -> bool {
    let faction = mover.faction;
    if !obj.kind.is_teleporter() || !world.is_entrance_passable(obj.id, faction) {
        return false;
    }

    if obj.kind == ObjectKind::Vortex {
        return opts.use_teleport_vortex && profile.vortex_protection;
    }

    let Some(channel) = world.channel_of(obj.id) else {
        return false;
    };
    if world.channel_is_bidirectional(channel, faction) {
        return opts.use_teleport_two_way;
    }

    let passable_exits = world
        .channel_exits(channel, faction)
        .iter()
        .filter(|&&exit| world.is_exit_passable(exit, mover, faction))
        .count();
    match passable_exits {
        0 => false,
        1 => opts.use_teleport_one_way,
        _ => opts.use_teleport_one_way_random,
    }
}

pub fn teleport_dest_action<W: World>(
    world: &W,
    dst_obj: Option<&MapObject>,
    dst_layer: Layer,
    faction: Faction,
) -> NodeAction {
    if let Some(obj) = visitable_obj(dst_obj, dst_layer) {
        if obj.kind == ObjectKind::Hero {
            return if relation_to(world, obj, faction) == Relation::Enemy {
                NodeAction::TeleportBattle
            } else {
                NodeAction::TeleportBlockingVisit
            };
        }
    }
    NodeAction::TeleportNormal
}

/// Static per-tile accessibility for one layer.
pub fn evaluate_accessibility<W: World>(
    world: &W,
    pos: Pos,
    tile: Tile,
    layer: Layer,
    faction: Faction,
) -> Accessibility {
    if tile.terrain.is_rock() || !world.is_observed(pos, faction) {
        return Accessibility::Blocked;
    }

    match layer {
        Layer::Land | Layer::Sail => {
            if let Some(obj) = world.top_object(pos).filter(|o| o.kind != ObjectKind::Event) {
                if obj.block_visit {
                    Accessibility::BlockVis
                } else if obj.passable_for(relation_to(world, obj, faction)) {
                    Accessibility::Accessible
                } else {
                    Accessibility::Visitable
                }
            } else if tile.blocked {
                Accessibility::Blocked
            } else if world.guard_position(pos).is_some() {
                // A monster watches this tile; entering it means a fight.
                Accessibility::BlockVis
            } else {
                Accessibility::Accessible
            }
        }

        Layer::Water => {
            if tile.blocked || !tile.terrain.is_water() {
                Accessibility::Blocked
            } else {
                Accessibility::Accessible
            }
        }

        Layer::Air => {
            if tile.blocked || tile.terrain.is_water() {
                Accessibility::Flyable
            } else {
                Accessibility::Accessible
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wander_core::Terrain;
    use wander_world::WorldBuilder;

    fn node(pos: Pos, layer: Layer, accessible: Accessibility) -> BaseNode {
        BaseNode::unreached(pos, layer, accessible)
    }

    #[test]
    fn coast_corner_cannot_be_cut_while_sailing() {
        // Water everywhere except a land tile at (2, 1) flanking the
        // diagonal from (1, 1) to (2, 2).
        let world = WorldBuilder::new(5, 5, 1)
            .fill(Terrain::Water)
            .terrain(Pos::new(2, 1, 0), Terrain::Grass)
            .build();
        let src = Pos::new(1, 1, 0);
        let mut out = Vec::new();
        neighbour_tiles(
            &world,
            world.tile(src).unwrap(),
            src,
            Some(false),
            true,
            &mut out,
        );
        assert!(!out.contains(&Pos::new(2, 2, 0)));
        assert!(out.contains(&Pos::new(0, 2, 0)));
    }

    #[test]
    fn land_to_sail_needs_a_boat() {
        let opts = SearchOptions::default();
        let land = node(Pos::new(1, 1, 0), Layer::Land, Accessibility::Accessible);
        let empty_water = node(Pos::new(2, 1, 0), Layer::Sail, Accessibility::Accessible);
        let boat_tile = node(Pos::new(2, 1, 0), Layer::Sail, Accessibility::Visitable);
        let water = Tile::open(Terrain::Water);
        assert!(!node_transition_possible(&land, &empty_water, water, &opts));
        assert!(node_transition_possible(&land, &boat_tile, water, &opts));
    }

    #[test]
    fn flying_landing_rules_depend_on_ruleset() {
        let mut opts = SearchOptions::default();
        let air = node(Pos::new(1, 1, 0), Layer::Air, Accessibility::Flyable);
        let visit = node(Pos::new(2, 1, 0), Layer::Land, Accessibility::Visitable);
        let tile = Tile::open(Terrain::Grass);
        // Original rules accept visitable landing spots.
        assert!(node_transition_possible(&air, &visit, tile, &opts));
        opts.original_movement_rules = false;
        assert!(!node_transition_possible(&air, &visit, tile, &opts));
    }

    #[test]
    fn guarded_open_tile_is_blockvis_and_means_battle() {
        let world = WorldBuilder::new(6, 6, 1)
            .guard(Pos::new(3, 3, 0), 1000)
            .build();
        let me = Faction(0);
        let watched = Pos::new(2, 2, 0);
        let tile = world.tile(watched).unwrap();
        assert_eq!(
            evaluate_accessibility(&world, watched, tile, Layer::Land, me),
            Accessibility::BlockVis
        );

        let src = node(Pos::new(1, 2, 0), Layer::Land, Accessibility::Accessible);
        let dst = node(watched, Layer::Land, Accessibility::BlockVis);
        let ctx = MoveContext {
            faction: me,
            start_pos: src.pos,
            src: &src,
            src_tile: world.tile(src.pos).unwrap(),
            src_obj: None,
            dst: &dst,
            dst_tile: tile,
            dst_obj: None,
        };
        assert_eq!(
            dest_action(&world, &ctx, &SearchOptions::default()),
            NodeAction::Battle
        );
    }

    #[test]
    fn leaving_a_guarded_tile_is_denied_except_toward_the_guard() {
        let guard = Pos::new(3, 3, 0);
        let world = WorldBuilder::new(6, 6, 1).guard(guard, 1000).build();
        let me = Faction(0);
        let start = Pos::new(0, 0, 0);
        let watched = Pos::new(2, 3, 0);

        let src = node(watched, Layer::Land, Accessibility::BlockVis);
        let away = node(Pos::new(1, 3, 0), Layer::Land, Accessibility::Accessible);
        let ctx = MoveContext {
            faction: me,
            start_pos: start,
            src: &src,
            src_tile: world.tile(watched).unwrap(),
            src_obj: None,
            dst: &away,
            dst_tile: world.tile(away.pos).unwrap(),
            dst_obj: None,
        };
        assert_eq!(
            movement_to_dest(&world, &ctx, &SearchOptions::default()),
            MoveVerdict::SourceGuarded
        );

        let onto_guard = node(guard, Layer::Land, Accessibility::BlockVis);
        let ctx = MoveContext {
            dst: &onto_guard,
            dst_tile: world.tile(guard).unwrap(),
            dst_obj: world.top_object(guard),
            ..ctx
        };
        assert_eq!(
            movement_to_dest(&world, &ctx, &SearchOptions::default()),
            MoveVerdict::Allowed
        );
    }
}
