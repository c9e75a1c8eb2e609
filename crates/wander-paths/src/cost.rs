//! The movement-cost model: what one step costs in movement points.

use wander_core::{Pos, Tile, TurnProfile, World};

use crate::rules;

/// Flat cost of stepping onto terrain whose penalty is waived.
pub const BASE_MOVE_COST: u32 = 100;

/// Below this many leftover points we probe whether any further step is
/// affordable at all, and consume the remainder if not.
pub const LAST_TILE_THRESHOLD: i64 = 250;

const DIAGONAL_FACTOR: f64 = 1.414213;
const FAVORABLE_WIND_FACTOR: f64 = 0.666;

/// Cost in movement points of moving from `src` to the adjacent `dst`.
///
/// `remaining` is the mover's budget before the step; it caps diagonal
/// moves (a diagonal step is allowed to spend exactly the rest of the
/// budget whenever the orthogonal step would have been affordable) and
/// feeds the last-tile lookahead. `check_last` disables that lookahead for
/// the recursive probe.
pub fn step_cost<W: World>(
    world: &W,
    profile: &TurnProfile,
    has_boat: bool,
    src: Pos,
    src_tile: Tile,
    dst: Pos,
    dst_tile: Tile,
    remaining: u32,
    check_last: bool,
) -> u32 {
    if src == dst {
        return 0;
    }

    let base = if profile.waives_penalty(dst_tile.terrain) {
        BASE_MOVE_COST
    } else {
        dst_tile.terrain.base_cost()
    };
    let mut ret = base as f64;

    if dst_tile.blocked && profile.flight.is_some() {
        let pct = profile.flight.unwrap_or(0);
        ret *= (100 + pct) as f64 / 100.0;
    } else if dst_tile.terrain.is_water() {
        if has_boat && src_tile.favorable_winds && dst_tile.favorable_winds {
            ret *= FAVORABLE_WIND_FACTOR;
        } else if !has_boat && profile.water_walk.is_some() {
            let pct = profile.water_walk.unwrap_or(0);
            ret *= (100 + pct) as f64 / 100.0;
        }
    }

    let mut cost = ret as u32;

    if src.is_diagonal_to(dst) {
        let straight = cost;
        cost = (ret * DIAGONAL_FACTOR) as u32;
        // Spend-the-rest rule: an unaffordable diagonal is still allowed
        // for the remaining points when the straight step would have fit.
        if cost > remaining && remaining >= straight {
            return remaining;
        }
    }

    let left = remaining as i64 - cost as i64;
    if check_last && left > 0 && left < LAST_TILE_THRESHOLD {
        // Probe one further step; a remainder that cannot buy any move is
        // folded into this step.
        let mut probe = Vec::with_capacity(8);
        rules::neighbour_tiles(
            world,
            dst_tile,
            dst,
            Some(!src_tile.terrain.is_water()),
            true,
            &mut probe,
        );
        for next in probe {
            let Some(next_tile) = world.tile(next) else {
                continue;
            };
            let fcost = step_cost(
                world,
                profile,
                has_boat,
                dst,
                dst_tile,
                next,
                next_tile,
                left as u32,
                false,
            );
            if fcost as i64 <= left {
                return cost;
            }
        }
        cost = remaining;
    }

    cost
}

/// Movement points left after a land/sail transition. Free boarding keeps
/// the normal step cost; otherwise the transition swallows the whole
/// remaining budget.
#[inline]
pub fn points_after_boarding(move_points: u32, cost: u32, profile: &TurnProfile) -> u32 {
    if profile.free_boarding {
        move_points.saturating_sub(cost)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wander_core::{BonusKind, Terrain, TimedBonus};
    use wander_world::WorldBuilder;

    fn profile_with(bonuses: Vec<TimedBonus>) -> TurnProfile {
        let mut mover = wander_world::test_mover(Pos::new(0, 0, 0));
        mover.bonuses = bonuses;
        mover.profile(0)
    }

    #[test]
    fn plain_step_costs_terrain_base() {
        let world = WorldBuilder::new(8, 8, 1).build();
        let p = profile_with(vec![]);
        let t = Tile::open(Terrain::Grass);
        let cost = step_cost(
            &world,
            &p,
            false,
            Pos::new(1, 1, 0),
            t,
            Pos::new(2, 1, 0),
            t,
            1000,
            true,
        );
        assert_eq!(cost, 100);
    }

    #[test]
    fn diagonal_costs_sqrt2_and_caps_at_remaining() {
        let world = WorldBuilder::new(8, 8, 1).build();
        let p = profile_with(vec![]);
        let t = Tile::open(Terrain::Grass);
        let src = Pos::new(1, 1, 0);
        let dst = Pos::new(2, 2, 0);
        assert_eq!(step_cost(&world, &p, false, src, t, dst, t, 1000, true), 141);
        // 120 points: straight step affordable, diagonal is not; the whole
        // remainder is spent instead.
        assert_eq!(step_cost(&world, &p, false, src, t, dst, t, 120, true), 120);
    }

    #[test]
    fn terrain_penalty_waiver() {
        let world = WorldBuilder::new(8, 8, 1).fill(Terrain::Swamp).build();
        let swamp = Tile::open(Terrain::Swamp);
        let plain = profile_with(vec![]);
        let waived = profile_with(vec![TimedBonus::permanent(
            BonusKind::NoTerrainPenalty(Terrain::Swamp),
            0,
        )]);
        let src = Pos::new(1, 1, 0);
        let dst = Pos::new(2, 1, 0);
        assert_eq!(
            step_cost(&world, &plain, false, src, swamp, dst, swamp, 1000, true),
            175
        );
        assert_eq!(
            step_cost(&world, &waived, false, src, swamp, dst, swamp, 1000, true),
            100
        );
    }

    #[test]
    fn favorable_winds_discount_sailing() {
        let world = WorldBuilder::new(8, 8, 1).fill(Terrain::Water).build();
        let p = profile_with(vec![]);
        let windy = Tile {
            favorable_winds: true,
            ..Tile::open(Terrain::Water)
        };
        let src = Pos::new(1, 1, 0);
        let dst = Pos::new(2, 1, 0);
        assert_eq!(
            step_cost(&world, &p, true, src, windy, dst, windy, 1000, true),
            66
        );
        // No boat, no discount.
        assert_eq!(
            step_cost(&world, &p, false, src, windy, dst, windy, 1000, true),
            100
        );
    }

    #[test]
    fn useless_remainder_is_consumed() {
        // 220 points left, step costs 100: 120 would remain, but every
        // onward step also costs >= 100... leave exactly 120 < cost of the
        // cheapest onward move only if terrain is pricier. Use swamp at
        // 175: 220 - 175 = 45 left, no onward step affordable.
        let world = WorldBuilder::new(8, 8, 1).fill(Terrain::Swamp).build();
        let p = profile_with(vec![]);
        let swamp = Tile::open(Terrain::Swamp);
        let cost = step_cost(
            &world,
            &p,
            false,
            Pos::new(1, 1, 0),
            swamp,
            Pos::new(2, 1, 0),
            swamp,
            220,
            true,
        );
        assert_eq!(cost, 220);
    }

    #[test]
    fn remainder_kept_when_onward_step_affordable() {
        let world = WorldBuilder::new(8, 8, 1).build();
        let p = profile_with(vec![]);
        let t = Tile::open(Terrain::Grass);
        let cost = step_cost(
            &world,
            &p,
            false,
            Pos::new(1, 1, 0),
            t,
            Pos::new(2, 1, 0),
            t,
            220,
            true,
        );
        // 120 left still buys a 100-point step.
        assert_eq!(cost, 100);
    }

    #[test]
    fn boarding_points() {
        let plain = profile_with(vec![]);
        let free = profile_with(vec![TimedBonus::permanent(BonusKind::FreeBoarding, 0)]);
        assert_eq!(points_after_boarding(900, 100, &plain), 0);
        assert_eq!(points_after_boarding(900, 100, &free), 800);
    }
}
