//! Reduced plans for days that run over their maximum duration.

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::matrix::TravelMatrix;
use crate::model::{DayConstraint, DayPlan, DropReason, DroppedLocation, FallbackDayPlan, Location};
use crate::planner::build_day_plan;

/// Drops candidates, lowest priority first, until the day fits.
///
/// Every drop re-orders and re-schedules the remaining stops. Must-visit
/// locations are never dropped: if the day still runs over with no
/// candidates left, the result is `FallbackInfeasible`. Ties on priority go
/// to the candidate with the longer dwell, then the larger identifier.
pub fn generate_fallback(
    plan: &DayPlan,
    constraint: &DayConstraint,
    matrix: &TravelMatrix,
    config: &PlannerConfig,
) -> Result<FallbackDayPlan, PlanError> {
    if !plan.over_budget {
        let mut unchanged = plan.clone();
        unchanged.fallback = None;
        return Ok(FallbackDayPlan {
            plan: unchanged,
            dropped: Vec::new(),
        });
    }

    let mut kept: Vec<Location> = constraint
        .candidates
        .iter()
        .filter(|candidate| plan.order.contains(&candidate.id))
        .cloned()
        .collect();
    let mut dropped = Vec::new();
    let mut total_secs = plan.total_duration_secs;

    while let Some(victim) = lowest_priority(&kept) {
        let removed = kept.remove(victim);
        tracing::debug!(
            day = constraint.day_index,
            dropped = %removed.id,
            priority = removed.priority,
            "dropping candidate for fallback"
        );
        dropped.push(DroppedLocation {
            id: removed.id,
            priority: removed.priority,
            reason: DropReason::OverMaxDuration,
        });

        let reduced = build_day_plan(constraint, &kept, matrix, config)?;
        if !reduced.over_budget {
            return Ok(FallbackDayPlan { plan: reduced, dropped });
        }
        total_secs = reduced.total_duration_secs;
        // Only stops still on the route count as drops.
        kept.retain(|candidate| reduced.order.contains(&candidate.id));
    }

    Err(PlanError::FallbackInfeasible {
        must_visit: constraint.must_visit.iter().map(|location| location.id.clone()).collect(),
        total_secs,
        max_secs: constraint.max_total_secs,
    })
}

fn lowest_priority(candidates: &[Location]) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.priority
                .total_cmp(&b.priority)
                .then(b.dwell_secs.cmp(&a.dwell_secs))
                .then(b.id.cmp(&a.id))
        })
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_priority_tie_breaks() {
        let candidates = vec![
            Location::candidate("a", "a", (0.0, 0.0)).with_priority(1.0).with_dwell_secs(600),
            Location::candidate("b", "b", (0.0, 0.0)).with_priority(1.0).with_dwell_secs(1200),
            Location::candidate("c", "c", (0.0, 0.0)).with_priority(1.0).with_dwell_secs(1200),
            Location::candidate("d", "d", (0.0, 0.0)).with_priority(5.0),
        ];
        assert_eq!(lowest_priority(&candidates), Some(2));
    }

    #[test]
    fn test_lowest_priority_empty() {
        assert_eq!(lowest_priority(&[]), None);
    }
}
