//! Chainable construction of [`GridWorld`] snapshots.

use wander_core::{ChannelId, Faction, MapObject, MapSize, ObjectId, ObjectKind, Pos, Terrain};

use crate::grid::TileGrid;
use crate::world::{Channel, GridWorld};

/// Builder for hand-laid worlds. Every method takes and returns the
/// builder, so maps read as one chained expression.
pub struct WorldBuilder {
    world: GridWorld,
}

impl WorldBuilder {
    /// A `width × height × levels` world of open grass.
    pub fn new(width: i32, height: i32, levels: i32) -> Self {
        let size = MapSize::new(width, height, levels);
        Self::from_grid(TileGrid::filled(size, Terrain::Grass))
    }

    /// Continue building on top of pre-generated terrain.
    pub fn from_grid(grid: TileGrid) -> Self {
        Self {
            world: GridWorld::empty(grid),
        }
    }

    /// The terrain built so far, for placement decisions.
    pub fn grid(&self) -> &TileGrid {
        &self.world.grid
    }

    pub fn fill(mut self, terrain: Terrain) -> Self {
        self.world.grid.fill(terrain);
        self
    }

    pub fn terrain(mut self, pos: Pos, terrain: Terrain) -> Self {
        if let Some(tile) = self.world.grid.get_mut(pos) {
            tile.terrain = terrain;
        }
        self
    }

    /// Set terrain over an inclusive rectangle on one level.
    pub fn rect(mut self, terrain: Terrain, x0: i32, y0: i32, x1: i32, y1: i32, level: i32) -> Self {
        for y in y0..=y1 {
            for x in x0..=x1 {
                if let Some(tile) = self.world.grid.get_mut(Pos::new(x, y, level)) {
                    tile.terrain = terrain;
                }
            }
        }
        self
    }

    /// Mark a tile as blocked by scenery (no object involved).
    pub fn blocked(mut self, pos: Pos) -> Self {
        if let Some(tile) = self.world.grid.get_mut(pos) {
            tile.blocked = true;
        }
        self
    }

    pub fn favorable_winds(mut self, pos: Pos) -> Self {
        if let Some(tile) = self.world.grid.get_mut(pos) {
            tile.favorable_winds = true;
        }
        self
    }

    pub fn hide(mut self, pos: Pos, observer: Faction) -> Self {
        self.world.hidden.insert((observer, pos));
        self
    }

    pub fn allied(mut self, a: Faction, b: Faction) -> Self {
        self.world.allies.insert((a, b));
        self
    }

    // -- objects -----------------------------------------------------------

    fn place(&mut self, kind: ObjectKind, pos: Pos, owner: Option<Faction>, block_visit: bool) -> ObjectId {
        let id = ObjectId(self.world.objects.len() as u32);
        if let Some(tile) = self.world.grid.get_mut(pos) {
            tile.visitable = true;
            tile.blocked |= block_visit;
        }
        self.world.objects.push(MapObject {
            id,
            kind,
            pos,
            owner,
            block_visit,
        });
        self.world.by_pos.insert(pos, id);
        id
    }

    const fn default_block_visit(kind: ObjectKind) -> bool {
        matches!(kind, ObjectKind::Monster | ObjectKind::Hero) || kind.is_pickup()
    }

    /// Place an object with the conventional blocking behaviour for its
    /// kind (monsters, heroes and pickups block-visit; the rest do not).
    pub fn object(mut self, kind: ObjectKind, pos: Pos, owner: Option<Faction>) -> Self {
        self.place(kind, pos, owner, Self::default_block_visit(kind));
        self
    }

    /// Place an object with explicit blocking behaviour.
    pub fn object_with(
        mut self,
        kind: ObjectKind,
        pos: Pos,
        owner: Option<Faction>,
        block_visit: bool,
    ) -> Self {
        self.place(kind, pos, owner, block_visit);
        self
    }

    pub fn hero(self, pos: Pos, owner: Faction) -> Self {
        self.object(ObjectKind::Hero, pos, Some(owner))
    }

    pub fn boat(self, pos: Pos) -> Self {
        self.object(ObjectKind::Boat, pos, None)
    }

    pub fn town(self, pos: Pos, owner: Faction) -> Self {
        self.object(ObjectKind::Town, pos, Some(owner))
    }

    /// A hostile creature guarding its tile and the eight around it.
    pub fn guard(mut self, pos: Pos, strength: u64) -> Self {
        self.place(ObjectKind::Monster, pos, None, true);
        self.world.guards.push((pos, strength));
        self
    }

    // -- teleport channels -------------------------------------------------

    fn channel_mut(&mut self, channel: u32) -> &mut Channel {
        self.world.channels.entry(ChannelId(channel)).or_insert(Channel {
            exits: Vec::new(),
            bidirectional: true,
        })
    }

    fn place_teleporter(
        &mut self,
        kind: ObjectKind,
        pos: Pos,
        channel: u32,
        entrance: bool,
        exit: bool,
    ) {
        let id = self.place(kind, pos, None, false);
        self.world.channel_by_obj.insert(id, ChannelId(channel));
        if entrance {
            self.world.entrances.insert(id);
        }
        if exit {
            self.channel_mut(channel).exits.push(id);
        }
    }

    /// A two-way teleporter: entrance and exit of its channel.
    pub fn teleporter(mut self, pos: Pos, channel: u32) -> Self {
        self.place_teleporter(ObjectKind::Teleporter, pos, channel, true, true);
        self
    }

    /// Entrance end of a one-way channel.
    pub fn teleport_entrance(mut self, pos: Pos, channel: u32) -> Self {
        self.place_teleporter(ObjectKind::Teleporter, pos, channel, true, false);
        self.channel_mut(channel).bidirectional = false;
        self
    }

    /// Exit end of a one-way channel.
    pub fn teleport_exit(mut self, pos: Pos, channel: u32) -> Self {
        self.place_teleporter(ObjectKind::Teleporter, pos, channel, false, true);
        self.channel_mut(channel).bidirectional = false;
        self
    }

    /// A water vortex on its channel; both entrance and exit.
    pub fn vortex(mut self, pos: Pos, channel: u32) -> Self {
        self.place_teleporter(ObjectKind::Vortex, pos, channel, true, true);
        self
    }

    /// Mark a teleporter as unusable as an exit (e.g. occupied).
    pub fn block_exit(mut self, pos: Pos) -> Self {
        if let Some(id) = self.world.by_pos.get(&pos) {
            self.world.blocked_exits.insert(*id);
        }
        self
    }

    // -- site networks -----------------------------------------------------

    pub fn gate_site(mut self, pos: Pos, owner: Faction) -> Self {
        self.world.gate_sites.push((owner, pos));
        self
    }

    pub fn recall_site(mut self, pos: Pos, owner: Faction) -> Self {
        self.world.recall_sites.push((owner, pos));
        self
    }

    pub fn build(self) -> GridWorld {
        self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wander_core::World;

    #[test]
    fn placing_objects_updates_tile_flags() {
        let pos = Pos::new(3, 3, 0);
        let world = WorldBuilder::new(6, 6, 1).guard(pos, 100).build();
        let tile = world.tile(pos).unwrap();
        assert!(tile.visitable);
        assert!(tile.blocked);
        assert_eq!(world.top_object(pos).unwrap().kind, ObjectKind::Monster);
    }

    #[test]
    fn boats_are_visitable_but_not_blocking() {
        let pos = Pos::new(2, 2, 0);
        let world = WorldBuilder::new(4, 4, 1)
            .fill(Terrain::Water)
            .boat(pos)
            .build();
        let tile = world.tile(pos).unwrap();
        assert!(tile.visitable);
        assert!(!tile.blocked);
    }

    #[test]
    fn one_way_channels_keep_entrances_and_exits_apart() {
        let entrance = Pos::new(1, 1, 0);
        let exit = Pos::new(5, 5, 0);
        let world = WorldBuilder::new(8, 8, 1)
            .teleport_entrance(entrance, 3)
            .teleport_exit(exit, 3)
            .build();

        let entry_obj = world.top_object(entrance).unwrap();
        let exit_obj = world.top_object(exit).unwrap();
        let channel = world.channel_of(entry_obj.id).unwrap();
        assert!(!world.channel_is_bidirectional(channel, Faction(0)));
        assert_eq!(world.channel_exits(channel, Faction(0)), vec![exit_obj.id]);
        assert!(world.is_entrance_passable(entry_obj.id, Faction(0)));
        assert!(!world.is_entrance_passable(exit_obj.id, Faction(0)));
    }
}
