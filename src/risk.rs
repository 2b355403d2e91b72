//! Per-segment risk classification and mitigation text.

use serde::{Deserialize, Serialize};

use crate::model::{RiskLevel, RouteSegment};

/// A condition that contributed to a segment's risk level.
///
/// Variants are declared most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RiskFactor {
    BehindSchedule { late_secs: i64 },
    LongHaulInRush { travel_secs: i64 },
    TightSlackInRush { slack_secs: i64 },
    TightSlack { slack_secs: i64 },
    RushHour,
    Backtrack,
}

impl RiskFactor {
    fn level(&self) -> RiskLevel {
        match self {
            RiskFactor::BehindSchedule { .. }
            | RiskFactor::LongHaulInRush { .. }
            | RiskFactor::TightSlackInRush { .. } => RiskLevel::High,
            RiskFactor::TightSlack { .. } | RiskFactor::RushHour | RiskFactor::Backtrack => RiskLevel::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub mitigation: Option<String>,
    /// Most severe first.
    pub factors: Vec<RiskFactor>,
}

/// Classifies segments against a day's buffer and the long-haul threshold.
#[derive(Debug, Clone, Copy)]
pub struct RiskAssessor {
    pub buffer_secs: i64,
    pub long_haul_secs: i64,
}

impl RiskAssessor {
    pub fn new(buffer_secs: i64, long_haul_secs: i64) -> Self {
        Self {
            buffer_secs,
            long_haul_secs,
        }
    }

    /// Worst triggered condition decides the level; the mitigation addresses
    /// that condition. `slack_secs` is `None` when no deadline applies.
    pub fn assess(
        &self,
        segment: &RouteSegment,
        rush_hour: bool,
        backtrack: bool,
        slack_secs: Option<i64>,
    ) -> RiskAssessment {
        let mut factors = Vec::new();

        if let Some(slack) = slack_secs {
            if slack < 0 {
                factors.push(RiskFactor::BehindSchedule { late_secs: -slack });
            } else if slack < self.buffer_secs {
                factors.push(if rush_hour {
                    RiskFactor::TightSlackInRush { slack_secs: slack }
                } else {
                    RiskFactor::TightSlack { slack_secs: slack }
                });
            }
        }
        if rush_hour && segment.travel_secs > self.long_haul_secs {
            factors.push(RiskFactor::LongHaulInRush {
                travel_secs: segment.travel_secs,
            });
        }
        if rush_hour {
            factors.push(RiskFactor::RushHour);
        }
        if backtrack {
            factors.push(RiskFactor::Backtrack);
        }
        factors.sort();

        let level = factors
            .iter()
            .map(RiskFactor::level)
            .max()
            .unwrap_or(RiskLevel::Low);
        let mitigation = factors.first().map(|factor| self.mitigation(factor, segment));

        RiskAssessment {
            level,
            mitigation,
            factors,
        }
    }

    fn mitigation(&self, factor: &RiskFactor, segment: &RouteSegment) -> String {
        match *factor {
            RiskFactor::BehindSchedule { late_secs } => format!(
                "running {} min behind the next commitment; reschedule it or drop a later stop",
                minutes_ceil(late_secs)
            ),
            RiskFactor::LongHaulInRush { travel_secs } => format!(
                "{}-minute drive in peak traffic; depart {} minutes earlier or split the leg",
                minutes_ceil(travel_secs),
                minutes_ceil(segment.traffic_delay_secs.max(travel_secs - self.long_haul_secs))
            ),
            RiskFactor::TightSlackInRush { slack_secs } => format!(
                "depart {} minutes earlier to avoid peak traffic",
                minutes_ceil((self.buffer_secs - slack_secs).max(segment.traffic_delay_secs))
            ),
            RiskFactor::TightSlack { slack_secs } => format!(
                "only {} min of slack before the next commitment; keep the stop at {} short",
                slack_secs / 60,
                segment.to.name
            ),
            RiskFactor::RushHour if segment.traffic_delay_secs > 0 => format!(
                "allow {} extra minutes for peak traffic",
                minutes_ceil(segment.traffic_delay_secs)
            ),
            RiskFactor::RushHour => "leg overlaps peak traffic; leave a few minutes early".to_string(),
            RiskFactor::Backtrack => format!(
                "route doubles back from {}; consider visiting {} earlier in the day",
                segment.from.name, segment.to.name
            ),
        }
    }
}

fn minutes_ceil(secs: i64) -> i64 {
    (secs.max(0) + 59) / 60
}
