//! Route extraction: turning committed chain slots into usable itineraries.

use wander_core::{Layer, Pos};
use wander_paths::{NO_NODE, NodeAction};

use crate::actor::ChainActors;
use crate::mask::ChainMask;
use crate::table::ChainTable;

/// One significant stop of a chain: who is moving and with what at that
/// point.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainLeg {
    pub actor: usize,
    pub pos: Pos,
    pub layer: Layer,
    pub turns: u8,
    pub move_remains: u32,
    /// Points the acting mover has spent by this stop, across all its turns.
    pub movement_used: u32,
    pub action: NodeAction,
    pub army_value: u64,
    pub army_loss: u64,
    pub danger: u64,
}

/// A full itinerary ending at one destination slot, in chronological order.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainRoute {
    pub mask: ChainMask,
    pub legs: Vec<ChainLeg>,
}

impl ChainRoute {
    pub fn target(&self) -> Pos {
        self.legs.last().map(|leg| leg.pos).unwrap_or_default()
    }

    /// The actor that performs the final leg.
    pub fn final_actor(&self) -> Option<usize> {
        self.legs.last().map(|leg| leg.actor)
    }

    pub fn turns(&self) -> u8 {
        self.legs.last().map(|leg| leg.turns).unwrap_or(0)
    }

    /// Points the final actor spends to reach the target.
    pub fn movement_cost(&self) -> u32 {
        self.legs.last().map(|leg| leg.movement_used).unwrap_or(0)
    }

    pub fn army_value(&self) -> u64 {
        self.legs.last().map(|leg| leg.army_value).unwrap_or(0)
    }

    pub fn army_loss(&self) -> u64 {
        self.legs.last().map(|leg| leg.army_loss).unwrap_or(0)
    }

    /// Worst danger crossed on the way in.
    pub fn danger(&self) -> u64 {
        self.legs.last().map(|leg| leg.danger).unwrap_or(0)
    }

    /// Danger of the route combined with the danger waiting at the goal
    /// itself.
    pub fn total_danger(&self, goal_danger: u64) -> u64 {
        self.danger().max(goal_danger)
    }
}

/// Extracts every distinct committed chain reaching `(pos, layer)`.
///
/// Each in-use slot yields one route; the route lists the significant
/// nodes of the chain from earliest to the destination.
pub fn routes_to(
    table: &ChainTable,
    actors: &ChainActors,
    pos: Pos,
    layer: Layer,
) -> Vec<ChainRoute> {
    let mut routes = Vec::new();

    for id in table.slot_ids(pos, layer) {
        let node = table.by_id(id);
        if !node.in_use() || !node.base.reachable() {
            continue;
        }

        let mut legs = Vec::new();
        let mut cursor = id;
        loop {
            let node = table.by_id(cursor);
            let mover = actors.get(node.actor);
            let per_turn = match node.base.layer {
                Layer::Sail => mover.base_points_sea,
                _ => mover.base_points_land,
            };
            let budget = u32::from(node.base.turns) * per_turn + mover.movement;
            legs.push(ChainLeg {
                actor: node.actor,
                pos: node.base.pos,
                layer: node.base.layer,
                turns: node.base.turns,
                move_remains: node.base.move_remains,
                movement_used: budget.saturating_sub(node.base.move_remains),
                action: node.base.action,
                army_value: node.army_value,
                army_loss: node.army_loss,
                danger: node.danger,
            });

            if node.prev == NO_NODE {
                break;
            }
            cursor = node.prev;
        }
        legs.reverse();

        routes.push(ChainRoute {
            mask: table.by_id(id).mask,
            legs,
        });
    }

    routes
}
