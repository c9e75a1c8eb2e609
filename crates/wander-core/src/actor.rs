//! The movable-actor model: [`Mover`], timed bonuses and per-turn profiles.

use crate::geom::Pos;
use crate::layer::Layer;
use crate::tile::Terrain;

/// Identifier of a mover within one planning snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoverId(pub u32);

/// A movement bonus kind. `value` on [`TimedBonus`] is a percent modifier
/// for `Flight` and `WaterWalk` and is ignored for the boolean kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusKind {
    Flight,
    WaterWalk,
    FreeBoarding,
    VortexProtection,
    NoTerrainPenalty(Terrain),
}

/// A bonus with a remaining duration in days. Active on turn `t` while
/// `t < days`, so a one-day bonus only covers the current turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedBonus {
    pub kind: BonusKind,
    pub value: i32,
    pub days: u8,
}

impl TimedBonus {
    /// A bonus lasting effectively forever.
    #[inline]
    pub const fn permanent(kind: BonusKind, value: i32) -> Self {
        Self {
            kind,
            value,
            days: u8::MAX,
        }
    }
}

/// Long-range recall (teleport-to-site) casting ability.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecallAbility {
    pub mana_cost: u32,
    pub move_cost: u32,
    /// Advanced casters may pick any friendly site, not just the nearest.
    pub advanced: bool,
}

/// A movable actor: position, movement budget, army strength and bonuses.
///
/// This is a value snapshot taken at planning time; searches never mutate
/// the mover they plan for.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mover {
    pub id: MoverId,
    pub faction: crate::object::Faction,
    pub position: Pos,
    pub has_boat: bool,
    /// Movement points remaining on the current turn.
    pub movement: u32,
    /// Full movement budget per turn on land.
    pub base_points_land: u32,
    /// Full movement budget per turn when sailing.
    pub base_points_sea: u32,
    /// Total army strength valuation.
    pub army: u64,
    pub mana: u32,
    pub recall: Option<RecallAbility>,
    pub bonuses: Vec<TimedBonus>,
}

impl Mover {
    /// The layer the mover starts its search on.
    #[inline]
    pub fn start_layer(&self) -> Layer {
        if self.has_boat { Layer::Sail } else { Layer::Land }
    }

    /// Whether the recall spell can be cast right now.
    #[inline]
    pub fn can_cast_recall(&self) -> bool {
        self.recall.is_some_and(|r| self.mana >= r.mana_cost)
    }

    /// Derive the effective capabilities for a given turn. Bonuses that
    /// expire before that turn are dropped.
    pub fn profile(&self, turn: u8) -> TurnProfile {
        let mut profile = TurnProfile {
            max_points_land: self.base_points_land,
            max_points_sea: self.base_points_sea,
            flight: None,
            water_walk: None,
            free_boarding: false,
            vortex_protection: false,
            no_penalty_mask: 0,
        };

        for bonus in &self.bonuses {
            if turn >= bonus.days {
                continue;
            }
            match bonus.kind {
                BonusKind::Flight => profile.flight = Some(bonus.value),
                BonusKind::WaterWalk => profile.water_walk = Some(bonus.value),
                BonusKind::FreeBoarding => profile.free_boarding = true,
                BonusKind::VortexProtection => profile.vortex_protection = true,
                BonusKind::NoTerrainPenalty(terrain) => {
                    profile.no_penalty_mask |= 1 << terrain as u8;
                }
            }
        }

        profile
    }
}

/// Effective movement capabilities of one mover on one turn. Built by
/// [`Mover::profile`] and memoized by the search; immutable once built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnProfile {
    pub max_points_land: u32,
    pub max_points_sea: u32,
    /// Percent cost modifier when flying over blocked terrain.
    pub flight: Option<i32>,
    /// Percent cost modifier when walking on water.
    pub water_walk: Option<i32>,
    pub free_boarding: bool,
    pub vortex_protection: bool,
    no_penalty_mask: u8,
}

impl TurnProfile {
    /// Full movement budget on the given layer.
    #[inline]
    pub const fn max_points(&self, layer: Layer) -> u32 {
        match layer {
            Layer::Sail => self.max_points_sea,
            _ => self.max_points_land,
        }
    }

    /// Whether the mover can use the layer at all this turn.
    #[inline]
    pub const fn layer_available(&self, layer: Layer) -> bool {
        match layer {
            Layer::Air => self.flight.is_some(),
            Layer::Water => self.water_walk.is_some(),
            Layer::Land | Layer::Sail => true,
        }
    }

    /// Whether the terrain penalty for `terrain` is waived.
    #[inline]
    pub const fn waives_penalty(&self, terrain: Terrain) -> bool {
        self.no_penalty_mask & (1 << terrain as u8) != 0
    }
}
