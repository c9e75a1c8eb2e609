//! **wander-paths** — turn-aware layered-grid path search.
//!
//! The crate answers "where can this mover get, and how" on a multi-level
//! adventure map: movement points carry over between turns, tiles exist on
//! up to four movement layers (land, sail, air, water-walk), and arriving
//! at a tile implies an action (embark, fight the guard, visit, ...).
//!
//! [`calculate_paths`] fills a [`PathTable`] for one mover. The underlying
//! [`engine::Engine`] is generic over a [`SearchSpace`], which is how the
//! multi-actor chain search in `wander-chain` reuses the same relaxation
//! loop with different node storage.

pub mod cost;
pub mod engine;
pub mod error;
pub mod node;
pub mod options;
pub mod rules;
pub mod space;
pub mod table;
pub mod turn;

pub use error::PlanError;
pub use node::{
    Accessibility, BaseNode, Blocker, NO_NODE, NodeAction, NodeId, PathNode, TURN_UNREACHED,
};
pub use options::SearchOptions;
pub use space::{Bypass, PatrolState, SearchSpace, SingleSpace};
pub use table::{Path, PathStep, PathTable, SyncPaths};
pub use turn::TurnCache;

use log::debug;
use wander_core::{Mover, World};

use engine::Engine;

/// Computes every reachable tile for `mover` into `table`.
///
/// The table is fully reinitialized first, so it can be reused across
/// passes. Unreachable tiles keep the [`TURN_UNREACHED`] sentinel.
pub fn calculate_paths<W: World>(
    world: &W,
    mover: &Mover,
    options: &SearchOptions,
    patrol: PatrolState,
    table: &mut PathTable,
) -> Result<(), PlanError> {
    if !world.size().contains(mover.position) {
        return Err(PlanError::StartOffMap(mover.position));
    }

    debug!(
        "calculating paths for mover {:?} at {} with {} points",
        mover.id, mover.position, mover.movement
    );

    let mut space = SingleSpace::new(table, mover, patrol);
    Engine::new(world, options, mover.faction, &mut space).run();
    Ok(())
}
