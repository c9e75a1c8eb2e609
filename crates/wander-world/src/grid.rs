//! Dense tile storage.

use wander_core::{MapSize, Pos, Terrain, Tile};

/// A flat, row-major grid of [`Tile`]s across all map levels.
#[derive(Clone, Debug)]
pub struct TileGrid {
    size: MapSize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// A grid filled with open tiles of `terrain`.
    pub fn filled(size: MapSize, terrain: Terrain) -> Self {
        Self {
            size,
            tiles: vec![Tile::open(terrain); size.tile_count()],
        }
    }

    #[inline]
    pub fn size(&self) -> MapSize {
        self.size
    }

    pub fn get(&self, pos: Pos) -> Option<Tile> {
        if self.size.contains(pos) {
            Some(self.tiles[self.size.index_of(pos)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        if self.size.contains(pos) {
            let idx = self.size.index_of(pos);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    /// Overwrite a tile; out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Pos, tile: Tile) {
        if let Some(slot) = self.get_mut(pos) {
            *slot = tile;
        }
    }

    pub fn fill(&mut self, terrain: Terrain) {
        self.tiles.fill(Tile::open(terrain));
    }

    /// Fraction of tiles matching the predicate, for generator targets.
    pub fn coverage(&self, pred: impl Fn(&Tile) -> bool) -> f64 {
        let matching = self.tiles.iter().filter(|t| pred(t)).count();
        matching as f64 / self.tiles.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let mut grid = TileGrid::filled(MapSize::new(4, 4, 2), Terrain::Grass);
        let pos = Pos::new(1, 2, 1);
        grid.set(pos, Tile::open(Terrain::Water));
        assert_eq!(grid.get(pos).unwrap().terrain, Terrain::Water);
        assert_eq!(grid.get(Pos::new(1, 2, 0)).unwrap().terrain, Terrain::Grass);
        assert_eq!(grid.get(Pos::new(9, 0, 0)), None);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut grid = TileGrid::filled(MapSize::new(2, 2, 1), Terrain::Dirt);
        grid.set(Pos::new(5, 5, 0), Tile::open(Terrain::Water));
        assert!(grid.coverage(|t| t.terrain == Terrain::Dirt) == 1.0);
    }
}
