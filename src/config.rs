//! Planner policy parameters.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::model::RushWindow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Minimum turn between consecutive legs (degrees) to count as doubling back.
    pub backtrack_angle_deg: f64,
    /// Legs shorter than this (great-circle metres) are never backtracks.
    pub backtrack_min_leg_m: f64,
    /// A leg longer than this during peak traffic is high risk.
    pub long_haul_secs: i64,
    /// Plan independent days on the rayon pool.
    pub parallel_days: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            backtrack_angle_deg: 135.0,
            backtrack_min_leg_m: 1000.0,
            long_haul_secs: 3600,
            parallel_days: true,
        }
    }
}

impl PlannerConfig {
    /// Weekday-agnostic morning and evening peaks.
    pub fn default_rush_windows() -> Vec<RushWindow> {
        [((7, 0), (9, 0)), ((16, 30), (18, 30))]
            .into_iter()
            .filter_map(|((sh, sm), (eh, em))| {
                Some(RushWindow::new(
                    NaiveTime::from_hms_opt(sh, sm, 0)?,
                    NaiveTime::from_hms_opt(eh, em, 0)?,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PlannerConfig = serde_json::from_str(r#"{"long_haul_secs": 1800}"#).unwrap();
        assert_eq!(config.long_haul_secs, 1800);
        assert_eq!(config.backtrack_angle_deg, 135.0);
        assert!(config.parallel_days);
    }

    #[test]
    fn test_default_rush_windows() {
        let windows = PlannerConfig::default_rush_windows();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].start, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(windows[1].end, NaiveTime::from_hms_opt(18, 30, 0).unwrap());
        assert!(windows.iter().all(|w| w.weekdays.is_empty()));
    }
}
