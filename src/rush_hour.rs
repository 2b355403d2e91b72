//! Rush-hour classification in the itinerary's local time.

use chrono::{Datelike, NaiveDateTime, Weekday};

use crate::model::RushWindow;

/// True when the time-of-day of `timestamp` falls inside any window.
pub fn is_rush_hour(timestamp: NaiveDateTime, windows: &[RushWindow]) -> bool {
    rush_window_at(timestamp, windows).is_some()
}

/// First window containing `timestamp`, if any.
pub fn rush_window_at(timestamp: NaiveDateTime, windows: &[RushWindow]) -> Option<&RushWindow> {
    windows.iter().find(|window| window_contains(window, timestamp))
}

/// True when travelling from `departure` to `arrival` touches peak traffic:
/// either endpoint is inside a window, or a window opens while en route.
pub fn overlaps_rush_hour(departure: NaiveDateTime, arrival: NaiveDateTime, windows: &[RushWindow]) -> bool {
    if is_rush_hour(departure, windows) || is_rush_hour(arrival, windows) {
        return true;
    }
    if arrival <= departure {
        return false;
    }

    // A week of openings is enough to see every weekday filter.
    let last_day = departure
        .date()
        .checked_add_days(chrono::Days::new(7))
        .map_or(arrival.date(), |week_out| arrival.date().min(week_out));
    windows.iter().any(|window| {
        departure
            .date()
            .iter_days()
            .take_while(|day| *day <= last_day)
            .any(|day| {
                let opening = day.and_time(window.start);
                opening >= departure && opening <= arrival && applies_on(window, day.weekday())
            })
    })
}

fn window_contains(window: &RushWindow, timestamp: NaiveDateTime) -> bool {
    let time = timestamp.time();
    let weekday = timestamp.weekday();

    if !window.wraps_midnight() {
        return window.start <= time && time <= window.end && applies_on(window, weekday);
    }

    // The part after midnight belongs to the window opened the previous day.
    (time >= window.start && applies_on(window, weekday))
        || (time <= window.end && applies_on(window, weekday.pred()))
}

fn applies_on(window: &RushWindow, opened_on: Weekday) -> bool {
    window.weekdays.is_empty() || window.weekdays.contains(&opened_on)
}
