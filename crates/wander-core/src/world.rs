//! Collaborator traits consumed by the search engines.
//!
//! The searches never reach into globals; every map, object, visibility and
//! danger query goes through these traits, injected at the entry points.

use crate::actor::Mover;
use crate::geom::{MapSize, Pos};
use crate::object::{ChannelId, Faction, MapObject, ObjectId, Relation};
use crate::tile::Tile;

/// World snapshot the planner runs against: static map data, fog of war,
/// objects, guards and teleport channels.
///
/// Implementations must be consistent for the duration of one search pass.
/// Off-map queries must return `None`/empty rather than panic.
pub trait World {
    /// Map bounds.
    fn size(&self) -> MapSize;

    /// Static tile data, or `None` when off-map.
    fn tile(&self, pos: Pos) -> Option<Tile>;

    /// Whether the observing faction currently sees the tile. Unobserved
    /// tiles are treated as impassable by the planner.
    fn is_observed(&self, pos: Pos, observer: Faction) -> bool;

    /// Topmost visitable/blocking object on the tile, if any.
    fn top_object(&self, pos: Pos) -> Option<&MapObject>;

    /// Object lookup by id.
    fn object(&self, id: ObjectId) -> Option<&MapObject>;

    /// Diplomatic relation between two factions.
    fn relation(&self, a: Faction, b: Faction) -> Relation;

    /// Position of the hostile creature whose aggression radius covers
    /// `pos`, if any. Self-guarding: a monster tile reports its own guard.
    fn guard_position(&self, pos: Pos) -> Option<Pos>;

    /// Positions of every hostile creature guarding `pos`. Used by the
    /// chain bypass rules; the plain searches only need [`Self::guard_position`].
    fn guards(&self, pos: Pos) -> Vec<Pos> {
        self.guard_position(pos).into_iter().collect()
    }

    /// Army strength of the guard standing at `guard_pos`.
    fn guard_strength(&self, _guard_pos: Pos) -> u64 {
        0
    }

    /// Whether visitable objects on either tile rule out moving directly
    /// between the two adjacent tiles (entry-direction restrictions).
    fn can_move_between(&self, _a: Pos, _b: Pos) -> bool {
        true
    }

    // -- teleport channels -------------------------------------------------

    /// Channel a teleporter object belongs to.
    fn channel_of(&self, _obj: ObjectId) -> Option<ChannelId> {
        None
    }

    /// Known exits of a channel for the observing faction.
    fn channel_exits(&self, _channel: ChannelId, _observer: Faction) -> Vec<ObjectId> {
        Vec::new()
    }

    /// Whether the channel can be traversed in both directions.
    fn channel_is_bidirectional(&self, _channel: ChannelId, _observer: Faction) -> bool {
        false
    }

    /// Whether the channel may be entered at this object.
    fn is_entrance_passable(&self, _obj: ObjectId, _observer: Faction) -> bool {
        false
    }

    /// Whether an exit can be landed on by the given mover.
    fn is_exit_passable(&self, _obj: ObjectId, _mover: &Mover, _observer: Faction) -> bool {
        true
    }

    // -- site networks -----------------------------------------------------

    /// Friendly castle-gate sites reachable from a gate town.
    fn gate_sites(&self, _owner: Faction) -> Vec<Pos> {
        Vec::new()
    }

    /// Friendly recall-spell destinations.
    fn recall_sites(&self, _owner: Faction) -> Vec<Pos> {
        Vec::new()
    }
}

/// External combat estimator used by the chain bypass logic.
pub trait DangerModel {
    /// Expected army-strength loss if `mover` fights whatever guards
    /// `target` with an army of value `army`.
    fn estimate_loss(&self, mover: &Mover, target: Pos, army: u64) -> u64;

    /// Standalone danger valuation of a tile (e.g. creature banks unseen by
    /// the guard model).
    fn danger_at(&self, pos: Pos) -> u64;
}
