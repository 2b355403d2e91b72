//! Planner error types.

use serde::{Deserialize, Serialize};

use crate::model::LocationId;

/// Per-day planning failure. Attached to the day's outcome, never raised past
/// the orchestrator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanError {
    #[error("no route reaches: {}", join_ids(.stranded))]
    RoutingInfeasible { stranded: Vec<LocationId> },
    #[error(
        "cannot fit must-visit locations {} in {max_secs}s (best effort {total_secs}s)",
        join_ids(.must_visit)
    )]
    FallbackInfeasible {
        must_visit: Vec<LocationId>,
        total_secs: i64,
        max_secs: i64,
    },
    #[error("invalid day constraint: {0}")]
    InvalidConstraint(String),
}

/// Failure while fetching or assembling a travel matrix.
#[derive(thiserror::Error, Debug)]
pub enum MatrixError {
    #[error("matrix request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("matrix service returned {0}")]
    Service(String),
    #[error("matrix has {actual} rows, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
}

fn join_ids(ids: &[LocationId]) -> String {
    ids.iter().map(LocationId::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_infeasible_names_locations() {
        let err = PlanError::RoutingInfeasible {
            stranded: vec![LocationId::new("C"), LocationId::new("D")],
        };
        assert_eq!(err.to_string(), "no route reaches: C, D");
    }

    #[test]
    fn test_fallback_infeasible_message() {
        let err = PlanError::FallbackInfeasible {
            must_visit: vec![LocationId::new("B")],
            total_secs: 4000,
            max_secs: 3600,
        };
        let message = err.to_string();
        assert!(message.contains("B"));
        assert!(message.contains("3600"));
        assert!(message.contains("4000"));
    }
}
