//! Map objects, factions and teleport channels.

use crate::geom::Pos;

/// Identifier of a map object within one world snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u32);

/// Identifier of a teleport channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelId(pub u32);

/// A player/AI faction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Faction(pub u8);

/// Diplomatic relation between two factions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    Ally,
    Neutral,
    Enemy,
}

/// Kind of a visitable/blocking map object, covering every kind the
/// movement rules single out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    Boat,
    Hero,
    Town,
    Garrison,
    BorderGate,
    Monster,
    Resource,
    Artifact,
    TreasureChest,
    SeaChest,
    Campfire,
    RewardBox,
    /// Two-way or one-way teleporter entrance/exit.
    Teleporter,
    /// Water vortex; transit requires protection.
    Vortex,
    /// A plain must-visit location with no blocking behaviour of its own.
    Shrine,
    /// Scripted trigger; ignored by planning entirely.
    Event,
}

impl ObjectKind {
    /// Pickups can always be grabbed in passing, even when they block-visit.
    #[inline]
    pub const fn is_pickup(self) -> bool {
        matches!(
            self,
            ObjectKind::Resource
                | ObjectKind::Artifact
                | ObjectKind::TreasureChest
                | ObjectKind::SeaChest
                | ObjectKind::Campfire
                | ObjectKind::RewardBox
        )
    }

    #[inline]
    pub const fn is_teleporter(self) -> bool {
        matches!(self, ObjectKind::Teleporter | ObjectKind::Vortex)
    }
}

/// A visitable or blocking object occupying a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub pos: Pos,
    pub owner: Option<Faction>,
    /// The mover must stop to interact; the tile cannot be passed through.
    pub block_visit: bool,
}

impl MapObject {
    /// Whether the object lets movers of the given relation walk straight
    /// through it (owned towns, garrisons and border gates).
    #[inline]
    pub fn passable_for(&self, relation: Relation) -> bool {
        matches!(
            self.kind,
            ObjectKind::Town | ObjectKind::Garrison | ObjectKind::BorderGate
        ) && relation == Relation::Ally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pickups_and_teleporters() {
        assert!(ObjectKind::TreasureChest.is_pickup());
        assert!(ObjectKind::Campfire.is_pickup());
        assert!(!ObjectKind::Monster.is_pickup());
        assert!(ObjectKind::Vortex.is_teleporter());
        assert!(!ObjectKind::Town.is_teleporter());
    }

    #[test]
    fn garrison_passability_follows_relation() {
        let garrison = MapObject {
            id: ObjectId(1),
            kind: ObjectKind::Garrison,
            pos: Pos::new(0, 0, 0),
            owner: Some(Faction(1)),
            block_visit: false,
        };
        assert!(garrison.passable_for(Relation::Ally));
        assert!(!garrison.passable_for(Relation::Enemy));
    }
}
