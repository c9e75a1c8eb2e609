//! Fatal precondition failures.
//!
//! Unreachable tiles and saturated chain slots are *not* errors; they are
//! ordinary outcomes reported through sentinel values. Only inputs the
//! planner cannot start from end up here.

use thiserror::Error;
use wander_core::Pos;

/// A planning pass could not start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The mover's starting position lies outside the map.
    #[error("mover start position {0} is outside the map")]
    StartOffMap(Pos),
    /// A chain roster holds more actors than the chain mask can identify.
    #[error("chain roster exceeds the {0}-actor limit")]
    RosterOverflow(usize),
}
