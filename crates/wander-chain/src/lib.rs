//! **wander-chain** — bounded multi-actor movement-chain composition.
//!
//! Where `wander-paths` answers "where can this mover get", this crate
//! answers "where can this *team* get": up to 31 movers explore the map
//! together, hand armies off to each other, and fork battle-marked chains
//! to pay their way past guards. Every (tile, layer) cell keeps a bounded
//! bundle of competing chains, one slot per distinct (actor set, acting
//! actor) combination.
//!
//! [`calculate_chains`] fills a [`ChainTable`]; [`routes_to`] (or
//! [`ChainTable::routes`]) turns committed slots back into itineraries.

pub mod actor;
pub mod info;
pub mod mask;
pub mod space;
pub mod table;

pub use actor::ChainActors;
pub use info::{routes_to, ChainLeg, ChainRoute};
pub use mask::{ChainMask, CHAIN_LIMIT, MAX_ACTORS};
pub use space::ChainSpace;
pub use table::{ChainNode, ChainTable, SyncChains};

use log::debug;
use wander_core::{DangerModel, World};
use wander_paths::engine::Engine;
use wander_paths::{PlanError, SearchOptions};

/// Computes every bounded movement chain for the roster into `table`.
///
/// All actors are assumed to cooperate; routes for enemy movers belong in
/// separate tables. The table is fully reinitialized first.
pub fn calculate_chains<W: World, D: DangerModel>(
    world: &W,
    danger: &D,
    actors: &ChainActors,
    options: &SearchOptions,
    table: &mut ChainTable,
) -> Result<(), PlanError> {
    let Some(first) = actors.iter().next() else {
        return Ok(());
    };
    for mover in actors.iter() {
        if !world.size().contains(mover.position) {
            return Err(PlanError::StartOffMap(mover.position));
        }
    }

    debug!("calculating chains for {} actors", actors.len());

    let faction = first.faction;
    let mut space = ChainSpace::new(world, danger, actors, table);
    Engine::new(world, options, faction, &mut space).run();
    Ok(())
}
