//! Random world generation for demos and stress tests.

use log::debug;
use rand::{Rng, RngExt};
use wander_core::{MapSize, ObjectKind, Pos, Terrain};

use crate::builder::WorldBuilder;
use crate::grid::TileGrid;
use crate::world::GridWorld;

/// Drunk-walk style terrain scattering over a [`TileGrid`], plus object
/// placement on top of the result.
pub struct MapGen<R: Rng> {
    pub rng: R,
    size: MapSize,
}

impl<R: Rng> MapGen<R> {
    pub fn new(size: MapSize, rng: R) -> Self {
        Self { rng, size }
    }

    fn random_pos(&mut self, level: i32) -> Pos {
        Pos::new(
            self.rng.random_range(0..self.size.width),
            self.rng.random_range(0..self.size.height),
            level,
        )
    }

    fn step(&mut self, pos: Pos) -> Pos {
        match self.rng.random_range(0..4u32) {
            0 => pos.shift(1, 0),
            1 => pos.shift(-1, 0),
            2 => pos.shift(0, 1),
            _ => pos.shift(0, -1),
        }
    }

    /// Carve `terrain` patches with random walks until roughly `fill_pct`
    /// of the grid is covered. Returns the number of tiles converted.
    pub fn scatter_terrain(
        &mut self,
        grid: &mut TileGrid,
        terrain: Terrain,
        fill_pct: f64,
        walks: usize,
    ) -> usize {
        let total = self.size.tile_count();
        let target = (total as f64 * fill_pct) as usize;
        let mut carved = 0usize;

        for _ in 0..walks {
            let mut pos = self.random_pos(0);
            // Bounded walk; carving stops once the target share is hit.
            for _ in 0..total * 4 {
                if carved >= target {
                    return carved;
                }
                if let Some(tile) = grid.get_mut(pos) {
                    if tile.terrain != terrain {
                        tile.terrain = terrain;
                        carved += 1;
                    }
                }
                let next = self.step(pos);
                if self.size.contains(next) {
                    pos = next;
                }
            }
        }
        carved
    }

    /// A complete random surface-level world: grass with a water body and
    /// rough patches, plus wandering guards and pickups on open land.
    pub fn generate(
        &mut self,
        water_pct: f64,
        guards: usize,
        guard_strength: std::ops::Range<u64>,
        pickups: usize,
    ) -> GridWorld {
        let mut grid = TileGrid::filled(self.size, Terrain::Grass);
        let water = self.scatter_terrain(&mut grid, Terrain::Water, water_pct, 4);
        let rough = self.scatter_terrain(&mut grid, Terrain::Rough, 0.1, 8);
        debug!("generated terrain: {water} water tiles, {rough} rough tiles");

        let open_land = |grid: &TileGrid, pos: Pos| {
            grid.get(pos)
                .is_some_and(|t| !t.terrain.is_water() && !t.blocked && !t.visitable)
        };

        let mut builder = WorldBuilder::from_grid(grid);
        for _ in 0..guards {
            let pos = self.random_pos(0);
            if open_land(builder.grid(), pos) {
                let strength = self.rng.random_range(guard_strength.clone());
                builder = builder.guard(pos, strength);
            }
        }
        for _ in 0..pickups {
            let pos = self.random_pos(0);
            if open_land(builder.grid(), pos) {
                builder = builder.object(ObjectKind::TreasureChest, pos, None);
            }
        }
        builder.build()
    }
}
