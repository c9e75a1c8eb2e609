//! [`GridWorld`]: a fully in-memory [`World`] implementation.

use std::collections::{HashMap, HashSet};

use wander_core::{
    ChannelId, Faction, MapObject, MapSize, Mover, ObjectId, Pos, Relation, Tile, World,
};

use crate::grid::TileGrid;

#[derive(Clone, Debug, Default)]
pub(crate) struct Channel {
    pub exits: Vec<ObjectId>,
    pub bidirectional: bool,
}

/// An owned world snapshot: tile grid, objects, guards, visibility and
/// teleport channels. Built through [`crate::WorldBuilder`] or
/// [`crate::MapGen`]; immutable once handed to a search.
#[derive(Clone, Debug)]
pub struct GridWorld {
    pub(crate) grid: TileGrid,
    pub(crate) objects: Vec<MapObject>,
    pub(crate) by_pos: HashMap<Pos, ObjectId>,
    /// (guard position, army strength) pairs; a guard watches its own tile
    /// and the eight around it.
    pub(crate) guards: Vec<(Pos, u64)>,
    pub(crate) channels: HashMap<ChannelId, Channel>,
    pub(crate) channel_by_obj: HashMap<ObjectId, ChannelId>,
    pub(crate) entrances: HashSet<ObjectId>,
    pub(crate) blocked_exits: HashSet<ObjectId>,
    pub(crate) hidden: HashSet<(Faction, Pos)>,
    pub(crate) allies: HashSet<(Faction, Faction)>,
    pub(crate) gate_sites: Vec<(Faction, Pos)>,
    pub(crate) recall_sites: Vec<(Faction, Pos)>,
}

impl GridWorld {
    pub(crate) fn empty(grid: TileGrid) -> Self {
        Self {
            grid,
            objects: Vec::new(),
            by_pos: HashMap::new(),
            guards: Vec::new(),
            channels: HashMap::new(),
            channel_by_obj: HashMap::new(),
            entrances: HashSet::new(),
            blocked_exits: HashSet::new(),
            hidden: HashSet::new(),
            allies: HashSet::new(),
            gate_sites: Vec::new(),
            recall_sites: Vec::new(),
        }
    }

    fn watches(guard: Pos, pos: Pos) -> bool {
        guard.level == pos.level
            && (guard.x - pos.x).abs() <= 1
            && (guard.y - pos.y).abs() <= 1
    }
}

impl World for GridWorld {
    fn size(&self) -> MapSize {
        self.grid.size()
    }

    fn tile(&self, pos: Pos) -> Option<Tile> {
        self.grid.get(pos)
    }

    fn is_observed(&self, pos: Pos, observer: Faction) -> bool {
        !self.hidden.contains(&(observer, pos))
    }

    fn top_object(&self, pos: Pos) -> Option<&MapObject> {
        self.by_pos
            .get(&pos)
            .map(|id| &self.objects[id.0 as usize])
    }

    fn object(&self, id: ObjectId) -> Option<&MapObject> {
        self.objects.get(id.0 as usize)
    }

    fn relation(&self, a: Faction, b: Faction) -> Relation {
        if a == b || self.allies.contains(&(a, b)) || self.allies.contains(&(b, a)) {
            Relation::Ally
        } else {
            Relation::Enemy
        }
    }

    fn guard_position(&self, pos: Pos) -> Option<Pos> {
        self.guards
            .iter()
            .find(|(guard, _)| Self::watches(*guard, pos))
            .map(|(guard, _)| *guard)
    }

    fn guards(&self, pos: Pos) -> Vec<Pos> {
        self.guards
            .iter()
            .filter(|(guard, _)| Self::watches(*guard, pos))
            .map(|(guard, _)| *guard)
            .collect()
    }

    fn guard_strength(&self, guard_pos: Pos) -> u64 {
        self.guards
            .iter()
            .find(|(guard, _)| *guard == guard_pos)
            .map(|(_, strength)| *strength)
            .unwrap_or(0)
    }

    fn channel_of(&self, obj: ObjectId) -> Option<ChannelId> {
        self.channel_by_obj.get(&obj).copied()
    }

    fn channel_exits(&self, channel: ChannelId, _observer: Faction) -> Vec<ObjectId> {
        self.channels
            .get(&channel)
            .map(|c| c.exits.clone())
            .unwrap_or_default()
    }

    fn channel_is_bidirectional(&self, channel: ChannelId, _observer: Faction) -> bool {
        self.channels.get(&channel).is_some_and(|c| c.bidirectional)
    }

    fn is_entrance_passable(&self, obj: ObjectId, _observer: Faction) -> bool {
        self.entrances.contains(&obj)
    }

    fn is_exit_passable(&self, obj: ObjectId, _mover: &Mover, _observer: Faction) -> bool {
        !self.blocked_exits.contains(&obj)
    }

    fn gate_sites(&self, owner: Faction) -> Vec<Pos> {
        self.gate_sites
            .iter()
            .filter(|(f, _)| *f == owner)
            .map(|(_, pos)| *pos)
            .collect()
    }

    fn recall_sites(&self, owner: Faction) -> Vec<Pos> {
        self.recall_sites
            .iter()
            .filter(|(f, _)| *f == owner)
            .map(|(_, pos)| *pos)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorldBuilder;
    use wander_core::Terrain;

    #[test]
    fn guard_zone_covers_the_eight_ring() {
        let world = WorldBuilder::new(8, 8, 1).guard(Pos::new(4, 4, 0), 500).build();
        assert_eq!(world.guard_position(Pos::new(4, 4, 0)), Some(Pos::new(4, 4, 0)));
        assert_eq!(world.guard_position(Pos::new(3, 5, 0)), Some(Pos::new(4, 4, 0)));
        assert_eq!(world.guard_position(Pos::new(2, 4, 0)), None);
        assert_eq!(world.guard_strength(Pos::new(4, 4, 0)), 500);
    }

    #[test]
    fn relations_default_to_hostile() {
        let world = WorldBuilder::new(4, 4, 1).allied(Faction(0), Faction(2)).build();
        assert_eq!(world.relation(Faction(0), Faction(0)), Relation::Ally);
        assert_eq!(world.relation(Faction(0), Faction(2)), Relation::Ally);
        assert_eq!(world.relation(Faction(2), Faction(0)), Relation::Ally);
        assert_eq!(world.relation(Faction(0), Faction(1)), Relation::Enemy);
    }

    #[test]
    fn hidden_tiles_are_unobserved_per_faction() {
        let world = WorldBuilder::new(4, 4, 1)
            .fill(Terrain::Dirt)
            .hide(Pos::new(1, 1, 0), Faction(0))
            .build();
        assert!(!world.is_observed(Pos::new(1, 1, 0), Faction(0)));
        assert!(world.is_observed(Pos::new(1, 1, 0), Faction(1)));
    }

    #[test]
    fn two_way_channel_lists_both_ends() {
        let a = Pos::new(1, 1, 0);
        let b = Pos::new(6, 6, 0);
        let world = WorldBuilder::new(8, 8, 1)
            .teleporter(a, 7)
            .teleporter(b, 7)
            .build();

        let entrance = world.top_object(a).unwrap();
        let channel = world.channel_of(entrance.id).unwrap();
        assert!(world.channel_is_bidirectional(channel, Faction(0)));
        let exits = world.channel_exits(channel, Faction(0));
        assert_eq!(exits.len(), 2);
        assert!(world.is_entrance_passable(entrance.id, Faction(0)));
    }
}
