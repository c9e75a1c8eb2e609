//! **wander-world** — in-memory adventure-map worlds.
//!
//! Provides [`GridWorld`], an owned implementation of the planner's
//! [`World`](wander_core::World) trait, a chainable [`WorldBuilder`] for
//! hand-laid maps, a random [`MapGen`] for demos, and plain danger models.

pub mod builder;
pub mod danger;
pub mod grid;
pub mod mapgen;
pub mod world;

pub use builder::WorldBuilder;
pub use danger::FlatDanger;
pub use grid::TileGrid;
pub use mapgen::MapGen;
pub use world::GridWorld;

use wander_core::{Faction, Mover, MoverId, Pos};

/// A plain mover for tests and demos: faction 0, 1000 movement points,
/// an army worth 1000, no boat and no bonuses.
pub fn test_mover(position: Pos) -> Mover {
    Mover {
        id: MoverId(0),
        faction: Faction(0),
        position,
        has_boat: false,
        movement: 1000,
        base_points_land: 1000,
        base_points_sea: 1000,
        army: 1000,
        mana: 0,
        recall: None,
        bonuses: Vec::new(),
    }
}
