//! Terrain and static tile data.

/// Terrain kind of a map cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Terrain {
    Dirt = 0,
    Grass,
    Rough,
    Sand,
    Snow,
    Swamp,
    Water,
    /// Solid rock; never enterable on any layer.
    Rock,
}

impl Terrain {
    /// Number of terrain kinds, for penalty-waiver bitsets.
    pub const COUNT: usize = 8;

    /// Base movement-point cost of stepping onto this terrain, before
    /// per-actor modifiers. Rock is unenterable; its cost is never used.
    #[inline]
    pub const fn base_cost(self) -> u32 {
        match self {
            Terrain::Dirt | Terrain::Grass | Terrain::Water => 100,
            Terrain::Rough => 125,
            Terrain::Sand | Terrain::Snow => 150,
            Terrain::Swamp => 175,
            Terrain::Rock => u32::MAX,
        }
    }

    #[inline]
    pub const fn is_water(self) -> bool {
        matches!(self, Terrain::Water)
    }

    #[inline]
    pub const fn is_rock(self) -> bool {
        matches!(self, Terrain::Rock)
    }
}

/// Static per-tile map data, as served by a [`crate::World`] provider.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub terrain: Terrain,
    /// Some object on the tile blocks plain traversal.
    pub blocked: bool,
    /// Some object on the tile can be interacted with.
    pub visitable: bool,
    /// Favorable winds zone: discounted sailing.
    pub favorable_winds: bool,
}

impl Tile {
    /// An open tile of the given terrain with no objects.
    #[inline]
    pub const fn open(terrain: Terrain) -> Self {
        Self {
            terrain,
            blocked: false,
            visitable: false,
            favorable_winds: false,
        }
    }
}

impl Default for Tile {
    #[inline]
    fn default() -> Self {
        Self::open(Terrain::Grass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_terrain_is_cheapest() {
        assert_eq!(Terrain::Grass.base_cost(), 100);
        for t in [Terrain::Rough, Terrain::Sand, Terrain::Snow, Terrain::Swamp] {
            assert!(t.base_cost() > Terrain::Grass.base_cost());
        }
    }
}
