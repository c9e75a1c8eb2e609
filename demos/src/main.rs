//! Planner demo: generate a random world, run the single-mover path
//! search and the two-actor chain search, and print what the team can
//! reach.
//!
//! Usage: `planner [seed]`

use rand::rngs::StdRng;
use rand::SeedableRng;

use wander_core::{Faction, MapSize, Mover, MoverId, ObjectKind, Pos, World};
use wander_chain::{calculate_chains, ChainActors, ChainTable};
use wander_paths::{calculate_paths, PathTable, PatrolState, SearchOptions};
use wander_world::{FlatDanger, GridWorld, MapGen};

fn mover(id: u32, position: Pos, movement: u32, army: u64) -> Mover {
    Mover {
        id: MoverId(id),
        faction: Faction(0),
        position,
        has_boat: false,
        movement,
        base_points_land: movement,
        base_points_sea: movement,
        army,
        mana: 0,
        recall: None,
        bonuses: Vec::new(),
    }
}

/// First `count` open, unoccupied land tiles, scanning row by row.
fn open_starts(world: &GridWorld, count: usize) -> Vec<Pos> {
    let size = world.size();
    let mut starts = Vec::with_capacity(count);
    for idx in 0..size.tile_count() {
        let pos = size.pos_at(idx);
        let open = world
            .tile(pos)
            .is_some_and(|t| !t.terrain.is_water() && !t.terrain.is_rock() && !t.blocked);
        if open && world.top_object(pos).is_none() {
            starts.push(pos);
            if starts.len() == count {
                break;
            }
        }
    }
    starts
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<u64>())
        .transpose()?
        .unwrap_or(42);

    let size = MapSize::new(48, 48, 1);
    log::info!("generating {}x{} world from seed {seed}", size.width, size.height);
    let mut mapgen = MapGen::new(size, StdRng::seed_from_u64(seed));
    let world = mapgen.generate(0.2, 30, 100..600, 20);

    let starts = open_starts(&world, 2);
    let &[front, back] = starts.as_slice() else {
        return Err("map has no open starting tiles".into());
    };

    // Single-mover reach.
    let scout = mover(1, front, 1500, 800);
    let mut paths = PathTable::new(size);
    calculate_paths(&world, &scout, &SearchOptions::default(), PatrolState::Free, &mut paths)?;

    let mut per_turn = [0usize; 4];
    for idx in 0..size.tile_count() {
        if let Some(turns) = paths.turns_to(size.pos_at(idx)) {
            if let Some(slot) = per_turn.get_mut(usize::from(turns)) {
                *slot += 1;
            }
        }
    }
    println!("scout at {front} with {} points:", scout.movement);
    for (turn, count) in per_turn.iter().enumerate() {
        println!("  turn {turn}: {count} tiles reachable");
    }

    // Two-actor chains toward every treasure on the map.
    let danger = FlatDanger::from_guards(&world);
    let mut actors = ChainActors::new();
    actors.push(scout)?;
    actors.push(mover(2, back, 1500, 500))?;

    let mut chains = ChainTable::new(size);
    calculate_chains(&world, &danger, &actors, &SearchOptions::default(), &mut chains)?;

    println!("chains to treasure:");
    for idx in 0..size.tile_count() {
        let pos = size.pos_at(idx);
        if world.top_object(pos).map(|obj| obj.kind) != Some(ObjectKind::TreasureChest) {
            continue;
        }
        let routes = chains.routes(&actors, pos);
        let Some(best) = routes.iter().min_by_key(|r| (r.turns(), r.movement_cost())) else {
            println!("  {pos}: unreachable");
            continue;
        };
        println!(
            "  {pos}: turn {} with army {} ({} stop(s), loss {})",
            best.turns(),
            best.army_value(),
            best.legs.len(),
            best.army_loss(),
        );
    }

    Ok(())
}
