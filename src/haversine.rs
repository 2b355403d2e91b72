//! Great-circle geometry and a straight-line travel matrix provider.
//!
//! The provider ignores roads, so it is a fallback for when no routing
//! service is reachable. The geometry helpers also feed backtrack detection.

use crate::error::MatrixError;
use crate::matrix::TravelMatrix;
use crate::model::{Location, TravelEdge};
use crate::traits::TravelMatrixProvider;

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two (lat, lng) points in metres.
pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Initial compass bearing from `from` to `to`, in degrees [0, 360).
pub fn initial_bearing_deg(from: (f64, f64), to: (f64, f64)) -> f64 {
    let lat1 = from.0.to_radians();
    let lat2 = to.0.to_radians();
    let delta_lng = (to.1 - from.1).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Absolute difference between two bearings, in degrees [0, 180].
pub fn turn_angle_deg(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Straight-line travel matrix.
///
/// Estimates travel time from distance and an assumed speed. With a
/// `rush_slowdown` factor it also fills in traffic-aware durations.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
    /// Multiplier applied to durations under peak traffic.
    pub rush_slowdown: Option<f64>,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            rush_slowdown: None,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self {
            speed_kmh,
            rush_slowdown: None,
        }
    }

    pub fn with_rush_slowdown(mut self, factor: f64) -> Self {
        self.rush_slowdown = Some(factor);
        self
    }

    /// Convert distance in metres to travel time in seconds.
    fn metres_to_seconds(&self, metres: f64) -> i64 {
        let hours = metres / 1000.0 / self.speed_kmh;
        (hours * 3600.0).round() as i64
    }
}

impl TravelMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[Location]) -> Result<TravelMatrix, MatrixError> {
        let mut matrix = TravelMatrix::new();

        for from in locations {
            for to in locations {
                if from.id == to.id {
                    continue;
                }
                let metres = haversine_m(from.coords, to.coords);
                let seconds = self.metres_to_seconds(metres);
                let mut edge = TravelEdge::new(from.id.clone(), to.id.clone(), seconds, metres.round() as i64);
                if let Some(factor) = self.rush_slowdown {
                    edge = edge.with_traffic_secs((seconds as f64 * factor).round() as i64);
                }
                matrix.insert(edge);
            }
        }

        Ok(matrix)
    }
}
