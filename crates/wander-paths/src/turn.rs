//! Per-turn capability memoization.

use wander_core::{Mover, TurnProfile};

/// Grow-on-demand cache of one mover's [`TurnProfile`]s, indexed by turn.
///
/// Bonus queries are far too hot to re-derive on every edge relaxation;
/// a profile is computed once per (mover, turn) and never mutated after.
#[derive(Debug, Default)]
pub struct TurnCache {
    profiles: Vec<TurnProfile>,
}

impl TurnCache {
    pub fn new() -> Self {
        Self {
            profiles: Vec::with_capacity(16),
        }
    }

    /// The mover's effective capabilities on `turn`.
    pub fn at(&mut self, mover: &Mover, turn: u8) -> TurnProfile {
        while self.profiles.len() <= turn as usize {
            let t = self.profiles.len() as u8;
            self.profiles.push(mover.profile(t));
        }
        self.profiles[turn as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wander_core::{BonusKind, Faction, Layer, Mover, MoverId, Pos, TimedBonus};

    #[test]
    fn profiles_are_memoized_per_turn() {
        let mover = Mover {
            id: MoverId(0),
            faction: Faction(0),
            position: Pos::new(0, 0, 0),
            has_boat: false,
            movement: 1000,
            base_points_land: 1000,
            base_points_sea: 800,
            army: 1,
            mana: 0,
            recall: None,
            bonuses: vec![TimedBonus {
                kind: BonusKind::Flight,
                value: 40,
                days: 2,
            }],
        };
        let mut cache = TurnCache::new();
        assert!(cache.at(&mover, 0).layer_available(Layer::Air));
        assert!(cache.at(&mover, 1).layer_available(Layer::Air));
        assert!(!cache.at(&mover, 2).layer_available(Layer::Air));
        // Cached copies are stable.
        assert_eq!(cache.at(&mover, 0), cache.at(&mover, 0));
    }
}
