//! itinerary-planner core
//!
//! Orders a day's visits, builds a buffered timetable, flags risky legs and
//! derives reduced fallback plans, for every day of a multi-day itinerary.
//! Travel matrices come from the providers in `haversine` and `osrm` (or any
//! other `TravelMatrixProvider`) before planning starts.

pub mod config;
pub mod error;
pub mod fallback;
pub mod haversine;
pub mod matrix;
pub mod model;
pub mod osrm;
pub mod planner;
pub mod risk;
pub mod route;
pub mod rush_hour;
pub mod schedule;
pub mod traits;
