//! Seams to the external routing collaborators.
//!
//! The planner core only ever sees a finished `TravelMatrix`; providers run
//! before planning starts.

use crate::error::MatrixError;
use crate::matrix::TravelMatrix;
use crate::model::{DayConstraint, Location};

/// Provides travel durations and distances between every ordered pair of
/// the given locations.
///
/// Pairs the provider can't route are left out of the matrix, so the planner
/// treats them as unreachable.
pub trait TravelMatrixProvider {
    fn matrix_for(&self, locations: &[Location]) -> Result<TravelMatrix, MatrixError>;
}

/// Every location a day needs in its matrix: start, must-visits, candidates.
pub fn day_locations(constraint: &DayConstraint) -> Vec<Location> {
    std::iter::once(&constraint.start)
        .chain(&constraint.must_visit)
        .chain(&constraint.candidates)
        .cloned()
        .collect()
}
