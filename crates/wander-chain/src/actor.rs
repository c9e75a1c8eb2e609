//! The roster of movers taking part in one chain computation.

use wander_core::Mover;
use wander_paths::PlanError;

use crate::mask::MAX_ACTORS;

/// An ordered roster of up to [`MAX_ACTORS`] movers. The index of a mover in
/// the roster is its bit position in a [`crate::ChainMask`].
#[derive(Debug, Clone, Default)]
pub struct ChainActors {
    actors: Vec<Mover>,
}

impl ChainActors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mover and returns its actor index.
    pub fn push(&mut self, mover: Mover) -> Result<usize, PlanError> {
        if self.actors.len() >= MAX_ACTORS {
            return Err(PlanError::RosterOverflow(MAX_ACTORS));
        }
        self.actors.push(mover);
        Ok(self.actors.len() - 1)
    }

    pub fn get(&self, index: usize) -> &Mover {
        &self.actors[index]
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mover> {
        self.actors.iter()
    }
}
