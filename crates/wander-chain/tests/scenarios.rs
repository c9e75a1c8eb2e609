//! End-to-end chain scenarios on small hand-built maps.

use wander_chain::{calculate_chains, ChainActors, ChainTable};
use wander_core::{Faction, Layer, MoverId, Pos, RecallAbility, World};
use wander_paths::{NO_NODE, NodeAction, SearchOptions};
use wander_world::{FlatDanger, WorldBuilder, test_mover};

fn run(
    world: &wander_world::GridWorld,
    danger: &FlatDanger,
    actors: &ChainActors,
) -> ChainTable {
    let mut table = ChainTable::new(world.size());
    calculate_chains(world, danger, actors, &SearchOptions::default(), &mut table).unwrap();
    table
}

#[test]
fn single_actor_walks_the_open_map() {
    let world = WorldBuilder::new(8, 8, 1).build();
    let danger = FlatDanger::new();
    let mut actors = ChainActors::new();
    actors.push(test_mover(Pos::new(1, 1, 0))).unwrap();

    let table = run(&world, &danger, &actors);
    let routes = table.routes(&actors, Pos::new(4, 1, 0));

    assert_eq!(routes.len(), 1);
    let route = &routes[0];
    assert_eq!(route.final_actor(), Some(0));
    assert_eq!(route.turns(), 0);
    assert_eq!(route.movement_cost(), 300);
    assert_eq!(route.army_value(), 1000);
    assert!(!route.mask.has_battle());
}

#[test]
fn battle_chain_pays_the_estimated_loss() {
    let world = WorldBuilder::new(10, 10, 1)
        .guard(Pos::new(5, 5, 0), 300)
        .build();
    let danger = FlatDanger::from_guards(&world);
    let mut actors = ChainActors::new();
    actors.push(test_mover(Pos::new(1, 5, 0))).unwrap();

    let table = run(&world, &danger, &actors);
    let routes = table.routes(&actors, Pos::new(5, 5, 0));

    let battle = routes
        .iter()
        .find(|route| route.mask.has_battle())
        .expect("a battle-marked chain should reach the guard");
    assert_eq!(battle.army_value(), 700);
    assert_eq!(battle.army_loss(), 300);
    assert_eq!(battle.danger(), 300);
}

#[test]
fn hopeless_battles_are_not_committed() {
    let world = WorldBuilder::new(10, 10, 1)
        .guard(Pos::new(5, 5, 0), 2000)
        .build();
    let danger = FlatDanger::from_guards(&world);
    let mut actors = ChainActors::new();
    actors.push(test_mover(Pos::new(1, 5, 0))).unwrap();

    let table = run(&world, &danger, &actors);
    assert!(table.routes(&actors, Pos::new(5, 5, 0)).is_empty());
}

#[test]
fn handoff_carries_the_combined_army() {
    let world = WorldBuilder::new(10, 3, 1).build();
    let danger = FlatDanger::new();
    let mut actors = ChainActors::new();

    let mut giver = test_mover(Pos::new(1, 1, 0));
    giver.id = MoverId(1);
    giver.army = 500;
    actors.push(giver).unwrap();
    let mut receiver = test_mover(Pos::new(5, 1, 0));
    receiver.id = MoverId(2);
    receiver.army = 700;
    actors.push(receiver).unwrap();

    let table = run(&world, &danger, &actors);

    let meeting = table.routes(&actors, Pos::new(5, 1, 0));
    assert!(
        meeting.iter().any(|route| route.army_value() == 1200),
        "the merged chain should hold both armies at the meeting tile"
    );

    let beyond = table.routes(&actors, Pos::new(8, 1, 0));
    let merged = beyond
        .iter()
        .find(|route| route.army_value() == 1200)
        .expect("the merged chain should continue past the meeting tile");
    assert_eq!(merged.final_actor(), Some(1));
    assert_eq!(merged.turns(), 0);
    assert_eq!(merged.movement_cost(), 300);
    let handoff = merged
        .legs
        .iter()
        .find(|leg| leg.pos == Pos::new(5, 1, 0) && leg.action == NodeAction::BlockingVisit)
        .expect("the hand-off stop should survive link compression");
    assert_eq!(handoff.actor, 1);
    assert!(merged.mask.contains(0) && merged.mask.contains(1));
}

#[test]
fn recall_cast_reaches_the_nearest_site() {
    let world = WorldBuilder::new(12, 3, 1)
        .recall_site(Pos::new(6, 1, 0), Faction(0))
        .recall_site(Pos::new(10, 1, 0), Faction(0))
        .build();
    let danger = FlatDanger::new();
    let mut actors = ChainActors::new();

    let mut caster = test_mover(Pos::new(1, 1, 0));
    caster.mana = 20;
    caster.recall = Some(RecallAbility {
        mana_cost: 10,
        move_cost: 300,
        advanced: false,
    });
    actors.push(caster).unwrap();

    let table = run(&world, &danger, &actors);

    let near = table.routes(&actors, Pos::new(6, 1, 0));
    assert_eq!(near.len(), 1);
    assert_eq!(near[0].movement_cost(), 300);
    assert_eq!(near[0].legs.last().unwrap().action, NodeAction::TeleportNormal);

    // The far site is only walked to, but the cast shortens the walk.
    let far = table.routes(&actors, Pos::new(10, 1, 0));
    assert_eq!(far.len(), 1);
    assert_eq!(far[0].movement_cost(), 700);
}

#[test]
fn chains_do_not_cross_rosters_off_map() {
    let world = WorldBuilder::new(4, 4, 1).build();
    let danger = FlatDanger::new();
    let mut actors = ChainActors::new();
    actors.push(test_mover(Pos::new(9, 9, 0))).unwrap();

    let mut table = ChainTable::new(world.size());
    assert!(calculate_chains(
        &world,
        &danger,
        &actors,
        &SearchOptions::default(),
        &mut table
    )
    .is_err());
}

#[test]
fn an_empty_army_never_advances() {
    let world = WorldBuilder::new(6, 6, 1).build();
    let danger = FlatDanger::new();
    let mut actors = ChainActors::new();
    let mut mover = test_mover(Pos::new(1, 1, 0));
    mover.army = 0;
    actors.push(mover).unwrap();

    let table = run(&world, &danger, &actors);

    // The start cell keeps its seed node, but nothing propagates from it.
    assert!(table.routes(&actors, Pos::new(2, 1, 0)).is_empty());
    assert!(!table.is_reachable(Pos::new(2, 1, 0)));
}

/// Total points the chain has spent to stand on this node.
fn movement_spent(actors: &ChainActors, node: &wander_chain::ChainNode) -> u32 {
    let mover = actors.get(node.actor);
    let per_turn = match node.base.layer {
        Layer::Sail => mover.base_points_sea,
        _ => mover.base_points_land,
    };
    u32::from(node.base.turns) * per_turn + mover.movement - node.base.move_remains
}

#[test]
fn dominated_chains_are_pruned_from_every_cell() {
    let world = WorldBuilder::new(12, 3, 1).build();
    let danger = FlatDanger::new();
    let mut actors = ChainActors::new();

    let mut strong = test_mover(Pos::new(1, 1, 0));
    strong.id = MoverId(1);
    strong.movement = 1200;
    actors.push(strong).unwrap();
    let mut weak = test_mover(Pos::new(0, 1, 0));
    weak.id = MoverId(2);
    weak.faction = Faction(1);
    weak.army = 500;
    actors.push(weak).unwrap();

    let table = run(&world, &danger, &actors);

    // The stronger, faster roster member shadows the weaker one everywhere:
    // after the pass no surviving chain is at least as strong, as early and
    // as cheap as a committed sibling in the same cell. Start nodes are the
    // roster seeds, not committed chains, so they sit outside the rule.
    let size = world.size();
    for idx in 0..size.tile_count() {
        let pos = size.pos_at(idx);
        for layer in Layer::ALL {
            let slots = table.slots(pos, layer);
            for (i, a) in slots.iter().enumerate() {
                if !a.in_use() || !a.base.reachable() {
                    continue;
                }
                for (j, b) in slots.iter().enumerate() {
                    if i == j || !b.in_use() || !b.base.reachable() || b.prev == NO_NODE {
                        continue;
                    }
                    let dominated = a.army_value >= b.army_value
                        && a.base.turns <= b.base.turns
                        && movement_spent(&actors, a) <= movement_spent(&actors, b);
                    assert!(
                        !dominated,
                        "a dominated chain survived at {pos:?} on {layer:?}"
                    );
                }
            }
        }
    }

    // Concretely: only the stronger chain holds the middle of the map.
    let routes = table.routes(&actors, Pos::new(6, 1, 0));
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].army_value(), 1000);
}
