//! Sequential timetable for an ordered route.
//!
//! Walks the path once: depart, travel, dwell, buffer, depart again. It does
//! not reorder anything and leaves slack and risk for the planner to fill in.

use chrono::{Duration, NaiveDateTime};

use crate::error::PlanError;
use crate::matrix::TravelMatrix;
use crate::model::{Location, LocationRole, RiskLevel, RouteSegment, RushWindow};
use crate::rush_hour::is_rush_hour;

/// Builds one segment per consecutive pair of `path`.
///
/// The first departure is `day_start`. Each later departure is the previous
/// arrival plus that stop's dwell plus `buffer_secs`. Legs departing inside a
/// rush window use the edge's traffic-aware duration when it has one. A leg
/// back to the start location carries no dwell and no buffer.
///
/// Negative travel durations and timestamps that fall outside the calendar
/// are rejected as `InvalidConstraint`.
pub fn build_schedule(
    path: &[Location],
    matrix: &TravelMatrix,
    day_start: NaiveDateTime,
    buffer_secs: i64,
    rush_windows: &[RushWindow],
) -> Result<Vec<RouteSegment>, PlanError> {
    let mut segments = Vec::with_capacity(path.len().saturating_sub(1));
    let mut departure = day_start;

    for pair in path.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let edge = matrix
            .edge(&from.id, &to.id)
            .ok_or_else(|| PlanError::RoutingInfeasible {
                stranded: vec![to.id.clone()],
            })?;

        if edge.duration_secs < 0 || edge.traffic_duration_secs.is_some_and(|secs| secs < 0) {
            return Err(PlanError::InvalidConstraint(format!(
                "travel from {} to {} has a negative duration",
                from.id, to.id
            )));
        }

        let peak = is_rush_hour(departure, rush_windows);
        let travel_secs = edge.duration_for(peak);
        let arrival = shift(departure, travel_secs).ok_or_else(|| out_of_range(to, "arrival"))?;

        let (dwell_secs, stop_buffer_secs) = match to.role {
            LocationRole::Start => (0, 0),
            LocationRole::MustVisit | LocationRole::Candidate => (to.dwell_secs, buffer_secs),
        };
        let leave_at = dwell_secs
            .checked_add(stop_buffer_secs)
            .and_then(|stay| shift(arrival, stay))
            .ok_or_else(|| out_of_range(to, "departure"))?;

        segments.push(RouteSegment {
            from: from.clone(),
            to: to.clone(),
            travel_secs,
            distance_m: edge.distance_m,
            traffic_delay_secs: travel_secs - edge.duration_secs,
            departure,
            arrival,
            dwell_secs,
            buffer_secs: stop_buffer_secs,
            leave_at,
            slack_secs: None,
            rush_hour: false,
            backtrack: false,
            risk: RiskLevel::Low,
            mitigation: None,
        });

        departure = leave_at;
    }

    Ok(segments)
}

fn shift(timestamp: NaiveDateTime, secs: i64) -> Option<NaiveDateTime> {
    Duration::try_seconds(secs).and_then(|delta| timestamp.checked_add_signed(delta))
}

fn out_of_range(stop: &Location, what: &str) -> PlanError {
    PlanError::InvalidConstraint(format!("{what} at {} falls outside the supported calendar", stop.id))
}
