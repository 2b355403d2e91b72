//! Planner data model.
//!
//! Inputs (`Location`, `DayConstraint`) are read-only for a planning run.
//! Outputs (`DayPlan`, `FallbackDayPlan`, `ItineraryResult`) are produced fresh
//! per invocation and handed back to the caller.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Unique identifier for a location within a planning run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub String);

impl LocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Role of a location in a day's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationRole {
    Start,
    MustVisit,
    Candidate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    /// Coordinates (lat, lng).
    pub coords: (f64, f64),
    pub role: LocationRole,
    /// Only consulted when dropping candidates for a fallback plan.
    pub priority: f64,
    /// Estimated time spent at the stop, in seconds.
    pub dwell_secs: i64,
    /// Latest acceptable arrival (a meeting or other fixed commitment).
    pub arrive_by: Option<NaiveDateTime>,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>, coords: (f64, f64), role: LocationRole) -> Self {
        Self {
            id: LocationId::new(id),
            name: name.into(),
            coords,
            role,
            priority: 0.0,
            dwell_secs: 0,
            arrive_by: None,
        }
    }

    pub fn start(id: impl Into<String>, name: impl Into<String>, coords: (f64, f64)) -> Self {
        Self::new(id, name, coords, LocationRole::Start)
    }

    pub fn must_visit(id: impl Into<String>, name: impl Into<String>, coords: (f64, f64)) -> Self {
        Self::new(id, name, coords, LocationRole::MustVisit)
    }

    pub fn candidate(id: impl Into<String>, name: impl Into<String>, coords: (f64, f64)) -> Self {
        Self::new(id, name, coords, LocationRole::Candidate)
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_dwell_secs(mut self, dwell_secs: i64) -> Self {
        self.dwell_secs = dwell_secs;
        self
    }

    pub fn with_arrive_by(mut self, arrive_by: NaiveDateTime) -> Self {
        self.arrive_by = Some(arrive_by);
        self
    }
}

/// Directed travel data between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelEdge {
    pub from: LocationId,
    pub to: LocationId,
    pub duration_secs: i64,
    pub distance_m: i64,
    /// Duration under peak traffic, when the provider knows it.
    pub traffic_duration_secs: Option<i64>,
}

impl TravelEdge {
    pub fn new(from: impl Into<LocationId>, to: impl Into<LocationId>, duration_secs: i64, distance_m: i64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            duration_secs,
            distance_m,
            traffic_duration_secs: None,
        }
    }

    pub fn with_traffic_secs(mut self, traffic_duration_secs: i64) -> Self {
        self.traffic_duration_secs = Some(traffic_duration_secs);
        self
    }

    /// Duration to use for a departure, peak or not.
    pub fn duration_for(&self, in_rush_hour: bool) -> i64 {
        match self.traffic_duration_secs {
            Some(traffic) if in_rush_hour => traffic,
            _ => self.duration_secs,
        }
    }
}

/// A peak-traffic window in local time, inclusive on both ends.
///
/// `start > end` wraps past midnight. An empty `weekdays` list means every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RushWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    #[serde(default)]
    pub weekdays: Vec<Weekday>,
}

impl RushWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            weekdays: Vec::new(),
        }
    }

    pub fn on(mut self, weekdays: &[Weekday]) -> Self {
        self.weekdays = weekdays.to_vec();
        self
    }

    pub fn wraps_midnight(&self) -> bool {
        self.start > self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        f.write_str(label)
    }
}

/// One leg of a day's route plus the stop it arrives at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub from: Location,
    pub to: Location,
    /// Travel time actually used for this leg (traffic-aware in peak).
    pub travel_secs: i64,
    pub distance_m: i64,
    /// Extra time caused by traffic compared to the base duration.
    pub traffic_delay_secs: i64,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub dwell_secs: i64,
    pub buffer_secs: i64,
    /// When the traveler leaves `to` (arrival + dwell + buffer).
    pub leave_at: NaiveDateTime,
    pub slack_secs: Option<i64>,
    pub rush_hour: bool,
    pub backtrack: bool,
    pub risk: RiskLevel,
    pub mitigation: Option<String>,
}

impl RouteSegment {
    /// Travel + dwell + buffer attributed to this segment.
    pub fn duration_secs(&self) -> i64 {
        self.travel_secs + self.dwell_secs + self.buffer_secs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayConstraint {
    pub day_index: usize,
    pub day_start: NaiveDateTime,
    pub must_return_by: Option<NaiveDateTime>,
    #[serde(default)]
    pub return_to_start: bool,
    pub max_total_secs: i64,
    #[serde(default)]
    pub rush_windows: Vec<RushWindow>,
    pub buffer_secs: i64,
    pub start: Location,
    pub must_visit: Vec<Location>,
    #[serde(default)]
    pub candidates: Vec<Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub overall: Option<RiskLevel>,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RiskSummary {
    pub fn from_segments(segments: &[RouteSegment]) -> Self {
        let mut summary = Self::default();
        for segment in segments {
            match segment.risk {
                RiskLevel::High => summary.high += 1,
                RiskLevel::Medium => summary.medium += 1,
                RiskLevel::Low => summary.low += 1,
            }
            summary.overall = summary.overall.max(Some(segment.risk));
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day_index: usize,
    pub segments: Vec<RouteSegment>,
    /// Visit order, starting with the start location.
    pub order: Vec<LocationId>,
    pub total_duration_secs: i64,
    pub total_travel_secs: i64,
    pub total_dwell_secs: i64,
    pub total_buffer_secs: i64,
    pub total_distance_m: i64,
    pub day_end: NaiveDateTime,
    pub risk_summary: RiskSummary,
    /// Candidates left out because no edge reached them.
    pub skipped_candidates: Vec<LocationId>,
    pub over_budget: bool,
    pub fallback: Option<Box<FallbackOutcome>>,
}

impl DayPlan {
    pub fn visits(&self, id: &LocationId) -> usize {
        self.segments.iter().filter(|segment| &segment.to.id == id).count()
    }

    pub fn fallback_plan(&self) -> Option<&FallbackDayPlan> {
        match self.fallback.as_deref() {
            Some(FallbackOutcome::Feasible(plan)) => Some(plan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Removed to bring the day under its maximum duration.
    OverMaxDuration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedLocation {
    pub id: LocationId,
    pub priority: f64,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackDayPlan {
    pub plan: DayPlan,
    pub dropped: Vec<DroppedLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FallbackOutcome {
    Feasible(FallbackDayPlan),
    Infeasible(PlanError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOutcome {
    pub day_index: usize,
    pub result: Result<DayPlan, PlanError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryStats {
    pub days_planned: usize,
    pub days_failed: usize,
    pub days_over_budget: usize,
    pub fallbacks_generated: usize,
    pub fallbacks_infeasible: usize,
    pub total_duration_secs: i64,
    pub total_travel_secs: i64,
    pub total_distance_m: i64,
    pub high_risk_segments: usize,
    pub medium_risk_segments: usize,
    pub low_risk_segments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryResult {
    pub days: Vec<DayOutcome>,
    pub stats: ItineraryStats,
    pub generated_at: DateTime<Utc>,
}

impl ItineraryResult {
    pub fn is_complete(&self) -> bool {
        self.stats.days_failed == 0
    }
}
