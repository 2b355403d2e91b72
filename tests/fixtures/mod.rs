//! Test fixtures for itinerary-planner.
//!
//! Provides:
//! - Real Las Vegas business sites (from OpenStreetMap) as planner locations
//! - A builder for day constraints with sensible defaults

#![allow(dead_code)]

pub mod las_vegas_sites;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use itinerary_planner::model::{DayConstraint, Location, RushWindow};

/// 2024-03-04 (a Monday) at the given local time.
pub fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 4)
        .unwrap()
        .and_time(hm(h, m))
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn minutes(m: i64) -> i64 {
    m * 60
}

/// Builder for day constraints: 09:00 start, 8 h max, 5 min buffer.
#[derive(Clone, Debug)]
pub struct DayBuilder {
    constraint: DayConstraint,
}

impl DayBuilder {
    pub fn new(start: Location) -> Self {
        Self {
            constraint: DayConstraint {
                day_index: 0,
                day_start: at(9, 0),
                must_return_by: None,
                return_to_start: false,
                max_total_secs: minutes(8 * 60),
                rush_windows: Vec::new(),
                buffer_secs: minutes(5),
                start,
                must_visit: Vec::new(),
                candidates: Vec::new(),
            },
        }
    }

    pub fn day(mut self, index: usize) -> Self {
        self.constraint.day_index = index;
        self
    }

    pub fn starts_at(mut self, start: NaiveDateTime) -> Self {
        self.constraint.day_start = start;
        self
    }

    pub fn max_minutes(mut self, max: i64) -> Self {
        self.constraint.max_total_secs = minutes(max);
        self
    }

    pub fn buffer_minutes(mut self, buffer: i64) -> Self {
        self.constraint.buffer_secs = minutes(buffer);
        self
    }

    pub fn return_by(mut self, deadline: NaiveDateTime) -> Self {
        self.constraint.must_return_by = Some(deadline);
        self
    }

    pub fn round_trip(mut self) -> Self {
        self.constraint.return_to_start = true;
        self
    }

    pub fn rush(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.constraint.rush_windows.push(RushWindow::new(start, end));
        self
    }

    pub fn must(mut self, location: Location) -> Self {
        self.constraint.must_visit.push(location);
        self
    }

    pub fn candidate(mut self, location: Location) -> Self {
        self.constraint.candidates.push(location);
        self
    }

    pub fn build(self) -> DayConstraint {
        self.constraint
    }
}
