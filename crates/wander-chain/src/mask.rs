//! Actor-set bitmasks for chain nodes.

/// Number of chain slots kept per (tile, layer) cell.
pub const CHAIN_LIMIT: usize = 10;

/// Maximum number of actors in one roster. The high bit of the mask is
/// reserved for the battle marker, so 31 actor bits remain.
pub const MAX_ACTORS: usize = 31;

const BATTLE_BIT: u32 = 0x8000_0000;

/// Which actors contributed to a chain node, plus a marker for whether the
/// chain already includes a committed battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainMask(pub u32);

impl ChainMask {
    /// Mask with a single actor bit set.
    pub fn actor(index: usize) -> Self {
        debug_assert!(index < MAX_ACTORS);
        ChainMask(1 << index)
    }

    pub fn contains(self, index: usize) -> bool {
        index < MAX_ACTORS && self.0 & (1 << index) != 0
    }

    pub fn union(self, other: ChainMask) -> Self {
        ChainMask(self.0 | other.0)
    }

    pub fn with_battle(self) -> Self {
        ChainMask(self.0 | BATTLE_BIT)
    }

    pub fn has_battle(self) -> bool {
        self.0 & BATTLE_BIT != 0
    }

    /// The mask with the battle marker stripped.
    pub fn actors_only(self) -> Self {
        ChainMask(self.0 & !BATTLE_BIT)
    }

    /// True when the chain consists of exactly one actor, battles aside.
    pub fn is_single_actor(self, index: usize) -> bool {
        self.actors_only().0 == 1 << index
    }

    pub fn actor_count(self) -> u32 {
        self.actors_only().0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battle_bit_is_not_an_actor() {
        let mask = ChainMask::actor(3).with_battle();
        assert!(mask.has_battle());
        assert!(mask.contains(3));
        assert_eq!(mask.actor_count(), 1);
        assert!(mask.is_single_actor(3));
        assert!(!mask.is_single_actor(2));
    }

    #[test]
    fn union_merges_actor_sets() {
        let merged = ChainMask::actor(0).union(ChainMask::actor(5));
        assert!(merged.contains(0));
        assert!(merged.contains(5));
        assert_eq!(merged.actor_count(), 2);
        assert!(!merged.is_single_actor(0));
    }
}
