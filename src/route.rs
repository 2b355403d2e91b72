//! Visit ordering (nearest neighbour) and backtrack detection.
//!
//! The orderer is a greedy heuristic: O(n^2) over the day's locations and
//! not guaranteed optimal. Days hold single-digit to low tens of stops, where
//! that trade-off is fine.

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::haversine::{haversine_m, initial_bearing_deg, turn_angle_deg};
use crate::matrix::TravelMatrix;
use crate::model::{Location, LocationId};

/// Result of ordering a day's visits.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOrder {
    /// Start location followed by every visited stop.
    pub path: Vec<Location>,
    /// Candidates no edge could reach from the route.
    pub skipped_candidates: Vec<LocationId>,
}

/// Orders must-visit locations by nearest neighbour from `start`, then
/// appends candidates the same way from wherever the must-visits ended.
///
/// Missing matrix edges are unreachable. Ties go to the smaller identifier.
pub fn order_route(
    start: &Location,
    must_visit: &[Location],
    candidates: &[Location],
    matrix: &TravelMatrix,
) -> Result<RouteOrder, PlanError> {
    let mut path = Vec::with_capacity(1 + must_visit.len() + candidates.len());
    path.push(start.clone());

    let mut remaining: Vec<&Location> = must_visit.iter().collect();
    let mut current = start;
    while let Some(next) = take_nearest(current, &mut remaining, matrix) {
        path.push(next.clone());
        current = next;
    }
    if !remaining.is_empty() {
        let mut stranded: Vec<LocationId> = remaining.iter().map(|location| location.id.clone()).collect();
        stranded.sort();
        return Err(PlanError::RoutingInfeasible { stranded });
    }

    let mut remaining: Vec<&Location> = candidates.iter().collect();
    while let Some(next) = take_nearest(current, &mut remaining, matrix) {
        path.push(next.clone());
        current = next;
    }
    let mut skipped_candidates: Vec<LocationId> = remaining.iter().map(|location| location.id.clone()).collect();
    skipped_candidates.sort();

    Ok(RouteOrder {
        path,
        skipped_candidates,
    })
}

/// Removes and returns the reachable location closest to `current`.
fn take_nearest<'a>(
    current: &Location,
    remaining: &mut Vec<&'a Location>,
    matrix: &TravelMatrix,
) -> Option<&'a Location> {
    let mut best: Option<(usize, i64)> = None;

    for (idx, location) in remaining.iter().enumerate() {
        let Some(duration) = matrix.duration(&current.id, &location.id) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((best_idx, best_duration)) => {
                duration < best_duration
                    || (duration == best_duration && location.id < remaining[best_idx].id)
            }
        };
        if better {
            best = Some((idx, duration));
        }
    }

    best.map(|(idx, _)| remaining.remove(idx))
}

/// One flag per leg of `path` (`path.len() - 1` entries).
///
/// Leg `i` doubles back when its bearing turns at least
/// `backtrack_angle_deg` away from leg `i - 1` and it covers at least
/// `backtrack_min_leg_m`. The first leg never backtracks.
pub fn detect_backtracks(path: &[Location], config: &PlannerConfig) -> Vec<bool> {
    let legs = path.len().saturating_sub(1);
    let mut flags = vec![false; legs];

    for i in 1..legs {
        let (a, b, c) = (path[i - 1].coords, path[i].coords, path[i + 1].coords);
        if haversine_m(a, b) < f64::EPSILON || haversine_m(b, c) < config.backtrack_min_leg_m {
            continue;
        }
        let turn = turn_angle_deg(initial_bearing_deg(a, b), initial_bearing_deg(b, c));
        flags[i] = turn >= config.backtrack_angle_deg;
    }

    flags
}
