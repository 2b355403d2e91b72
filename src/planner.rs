//! Day plan orchestration.
//!
//! Per day: validate, order, schedule, compute slack, flag rush hour and
//! backtracks, assess risk, and build a fallback when the day runs long.
//! Days are independent; one failing day never stops the others.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use rayon::prelude::*;

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::fallback::generate_fallback;
use crate::matrix::TravelMatrix;
use crate::model::{
    DayConstraint, DayOutcome, DayPlan, FallbackOutcome, ItineraryResult, ItineraryStats, Location, LocationRole,
    RiskLevel, RiskSummary, RouteSegment,
};
use crate::risk::RiskAssessor;
use crate::route::{detect_backtracks, order_route};
use crate::rush_hour::overlaps_rush_hour;
use crate::schedule::build_schedule;

/// One day's constraint with the matrix fetched for its locations.
#[derive(Debug, Clone)]
pub struct DayRequest {
    pub constraint: DayConstraint,
    pub matrix: TravelMatrix,
}

impl DayRequest {
    pub fn new(constraint: DayConstraint, matrix: TravelMatrix) -> Self {
        Self { constraint, matrix }
    }
}

/// Plans a single day, attaching a fallback outcome when it runs over its
/// maximum duration.
pub fn plan_day(
    constraint: &DayConstraint,
    matrix: &TravelMatrix,
    config: &PlannerConfig,
) -> Result<DayPlan, PlanError> {
    validate(constraint)?;

    let mut plan = build_day_plan(constraint, &constraint.candidates, matrix, config)?;
    if plan.over_budget {
        tracing::warn!(
            day = constraint.day_index,
            total_secs = plan.total_duration_secs,
            max_secs = constraint.max_total_secs,
            "day exceeds maximum duration, building fallback"
        );
        let outcome = match generate_fallback(&plan, constraint, matrix, config) {
            Ok(fallback) => FallbackOutcome::Feasible(fallback),
            Err(err) => {
                tracing::warn!(day = constraint.day_index, error = %err, "no feasible fallback");
                FallbackOutcome::Infeasible(err)
            }
        };
        plan.fallback = Some(Box::new(outcome));
    }

    Ok(plan)
}

/// Plans every day, stamped with the current time.
pub fn plan_itinerary(days: &[DayRequest], config: &PlannerConfig) -> ItineraryResult {
    plan_itinerary_at(days, config, Utc::now())
}

/// Plans every day; outcomes come back in day-index order no matter how
/// they were scheduled on the pool.
pub fn plan_itinerary_at(days: &[DayRequest], config: &PlannerConfig, generated_at: DateTime<Utc>) -> ItineraryResult {
    let plan_one = |request: &DayRequest| DayOutcome {
        day_index: request.constraint.day_index,
        result: plan_day(&request.constraint, &request.matrix, config),
    };

    let mut outcomes: Vec<DayOutcome> = if config.parallel_days {
        days.par_iter().map(plan_one).collect()
    } else {
        days.iter().map(plan_one).collect()
    };
    outcomes.sort_by_key(|outcome| outcome.day_index);

    for outcome in &outcomes {
        if let Err(err) = &outcome.result {
            tracing::warn!(day = outcome.day_index, error = %err, "day could not be planned");
        }
    }

    let stats = aggregate(&outcomes);
    tracing::info!(
        days = outcomes.len(),
        failed = stats.days_failed,
        over_budget = stats.days_over_budget,
        high_risk = stats.high_risk_segments,
        "itinerary planned"
    );

    ItineraryResult {
        days: outcomes,
        stats,
        generated_at,
    }
}

/// Orders, schedules and assesses one day with the given candidate set.
/// Does not attempt a fallback.
pub(crate) fn build_day_plan(
    constraint: &DayConstraint,
    candidates: &[Location],
    matrix: &TravelMatrix,
    config: &PlannerConfig,
) -> Result<DayPlan, PlanError> {
    let order = order_route(&constraint.start, &constraint.must_visit, candidates, matrix)?;
    let mut path = order.path;
    if constraint.return_to_start {
        path.push(constraint.start.clone());
    }
    tracing::debug!(
        day = constraint.day_index,
        order = ?path.iter().map(|location| location.id.as_str()).collect::<Vec<_>>(),
        "route ordered"
    );

    let mut segments = build_schedule(
        &path,
        matrix,
        constraint.day_start,
        constraint.buffer_secs,
        &constraint.rush_windows,
    )?;
    let day_end = segments
        .last()
        .map(|segment| segment.leave_at)
        .unwrap_or(constraint.day_start);

    let backtracks = detect_backtracks(&path, config);
    let slacks = slack_per_segment(&segments, constraint, day_end);
    let assessor = RiskAssessor::new(constraint.buffer_secs, config.long_haul_secs);

    for ((segment, backtrack), slack) in segments.iter_mut().zip(backtracks).zip(slacks) {
        let rush_hour = overlaps_rush_hour(segment.departure, segment.arrival, &constraint.rush_windows);
        let assessment = assessor.assess(segment, rush_hour, backtrack, slack);
        segment.rush_hour = rush_hour;
        segment.backtrack = backtrack;
        segment.slack_secs = slack;
        segment.risk = assessment.level;
        segment.mitigation = assessment.mitigation;
    }

    let total_travel_secs: i64 = segments.iter().map(|segment| segment.travel_secs).sum();
    let total_dwell_secs: i64 = segments.iter().map(|segment| segment.dwell_secs).sum();
    let total_buffer_secs: i64 = segments.iter().map(|segment| segment.buffer_secs).sum();
    let total_duration_secs = total_travel_secs + total_dwell_secs + total_buffer_secs;

    Ok(DayPlan {
        day_index: constraint.day_index,
        order: path.iter().map(|location| location.id.clone()).collect(),
        total_distance_m: segments.iter().map(|segment| segment.distance_m).sum(),
        risk_summary: RiskSummary::from_segments(&segments),
        segments,
        total_duration_secs,
        total_travel_secs,
        total_dwell_secs,
        total_buffer_secs,
        day_end,
        skipped_candidates: order.skipped_candidates,
        over_budget: total_duration_secs > constraint.max_total_secs,
        fallback: None,
    })
}

/// Slack for segment `i` is the tightest margin over every later
/// commitment: `arrive_by - arrival` for stops from `i` on, and
/// `must_return_by - day_end`. `None` when no deadline applies.
fn slack_per_segment(
    segments: &[RouteSegment],
    constraint: &DayConstraint,
    day_end: NaiveDateTime,
) -> Vec<Option<i64>> {
    let mut tightest = constraint
        .must_return_by
        .map(|deadline| (deadline - day_end).num_seconds());
    let mut slacks = vec![None; segments.len()];

    for (i, segment) in segments.iter().enumerate().rev() {
        if let Some(arrive_by) = segment.to.arrive_by {
            let margin = (arrive_by - segment.arrival).num_seconds();
            tightest = Some(tightest.map_or(margin, |current| current.min(margin)));
        }
        slacks[i] = tightest;
    }

    slacks
}

/// Rejects malformed constraints before any routing happens.
fn validate(constraint: &DayConstraint) -> Result<(), PlanError> {
    let invalid = |message: String| -> Result<(), PlanError> { Err(PlanError::InvalidConstraint(message)) };

    if constraint.max_total_secs <= 0 {
        return invalid(format!("max duration must be positive, got {}s", constraint.max_total_secs));
    }
    if constraint.buffer_secs < 0 {
        return invalid(format!("buffer must not be negative, got {}s", constraint.buffer_secs));
    }
    if let Some(deadline) = constraint.must_return_by {
        if deadline < constraint.day_start {
            return invalid(format!("day starts at {} after its deadline {}", constraint.day_start, deadline));
        }
    }

    let roles = std::iter::once((&constraint.start, LocationRole::Start))
        .chain(constraint.must_visit.iter().map(|location| (location, LocationRole::MustVisit)))
        .chain(constraint.candidates.iter().map(|location| (location, LocationRole::Candidate)));

    let mut seen = HashSet::new();
    for (location, expected) in roles {
        if !seen.insert(&location.id) {
            return invalid(format!("location {} is listed more than once", location.id));
        }
        if location.role != expected {
            return invalid(format!(
                "location {} is tagged {:?} but listed as {:?}",
                location.id, location.role, expected
            ));
        }
        if location.dwell_secs < 0 {
            return invalid(format!("location {} has negative dwell", location.id));
        }
        if !location.priority.is_finite() {
            return invalid(format!("location {} has a non-finite priority", location.id));
        }
        if let Some(arrive_by) = location.arrive_by {
            if arrive_by < constraint.day_start {
                return invalid(format!(
                    "day starts at {} after the {} commitment at {}",
                    constraint.day_start, location.id, arrive_by
                ));
            }
        }
    }

    Ok(())
}

fn aggregate(outcomes: &[DayOutcome]) -> ItineraryStats {
    let mut stats = ItineraryStats::default();

    for outcome in outcomes {
        let plan = match &outcome.result {
            Ok(plan) => plan,
            Err(_) => {
                stats.days_failed += 1;
                continue;
            }
        };

        stats.days_planned += 1;
        stats.total_duration_secs += plan.total_duration_secs;
        stats.total_travel_secs += plan.total_travel_secs;
        stats.total_distance_m += plan.total_distance_m;
        stats.high_risk_segments += plan.risk_summary.high;
        stats.medium_risk_segments += plan.risk_summary.medium;
        stats.low_risk_segments += plan.risk_summary.low;

        if plan.over_budget {
            stats.days_over_budget += 1;
        }
        match plan.fallback.as_deref() {
            Some(FallbackOutcome::Feasible(_)) => stats.fallbacks_generated += 1,
            Some(FallbackOutcome::Infeasible(_)) => stats.fallbacks_infeasible += 1,
            None => {}
        }
    }

    stats
}

/// Overall risk of a planned day, `Low` for a day with no legs.
pub fn overall_risk(plan: &DayPlan) -> RiskLevel {
    plan.risk_summary.overall.unwrap_or(RiskLevel::Low)
}
