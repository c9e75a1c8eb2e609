//! Simple [`DangerModel`] implementations for tests and demos.

use std::collections::HashMap;

use wander_core::{DangerModel, Mover, Pos, World};

use crate::world::GridWorld;

/// A danger model backed by an explicit per-tile table. The expected loss
/// of a fight equals the tile's danger value, capped at the attacking army.
#[derive(Clone, Debug, Default)]
pub struct FlatDanger {
    dangers: HashMap<Pos, u64>,
}

impl FlatDanger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, pos: Pos, danger: u64) {
        self.dangers.insert(pos, danger);
    }

    /// Seed the table from a world's guards: each guard tile and every
    /// tile it watches carries the guard's strength.
    pub fn from_guards(world: &GridWorld) -> Self {
        let mut model = Self::new();
        let size = world.size();
        for idx in 0..size.tile_count() {
            let pos = size.pos_at(idx);
            if let Some(guard) = world.guard_position(pos) {
                let strength = world.guard_strength(guard);
                model.set(pos, strength);
            }
        }
        model
    }
}

impl DangerModel for FlatDanger {
    fn estimate_loss(&self, _mover: &Mover, target: Pos, army: u64) -> u64 {
        self.danger_at(target).min(army)
    }

    fn danger_at(&self, pos: Pos) -> u64 {
        *self.dangers.get(&pos).unwrap_or(&0)
    }
}
