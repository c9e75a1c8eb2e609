//! **wander-core** — shared types for adventure-map movement planning.
//!
//! This crate provides the foundational types used across the *wander*
//! workspace: multi-level map coordinates, movement layers, terrain and
//! map-object value types, the movable-actor model with per-day bonuses,
//! and the collaborator traits the search engines consume ([`World`],
//! [`DangerModel`]).

pub mod actor;
pub mod geom;
pub mod layer;
pub mod object;
pub mod tile;
pub mod world;

pub use actor::{BonusKind, Mover, MoverId, RecallAbility, TimedBonus, TurnProfile};
pub use geom::{MapSize, Pos};
pub use layer::Layer;
pub use object::{ChannelId, Faction, MapObject, ObjectId, ObjectKind, Relation};
pub use tile::{Terrain, Tile};
pub use world::{DangerModel, World};
