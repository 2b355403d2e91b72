//! OSRM HTTP adapter for travel matrices.

use serde::Deserialize;

use crate::error::MatrixError;
use crate::matrix::TravelMatrix;
use crate::model::{Location, TravelEdge};
use crate::traits::TravelMatrixProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn table_url(&self, locations: &[Location]) -> String {
        let coords = locations
            .iter()
            .map(|location| format!("{:.6},{:.6}", location.coords.1, location.coords.0))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=duration,distance",
            self.config.base_url, self.config.profile, coords
        )
    }
}

impl TravelMatrixProvider for OsrmClient {
    fn matrix_for(&self, locations: &[Location]) -> Result<TravelMatrix, MatrixError> {
        if locations.is_empty() {
            return Ok(TravelMatrix::new());
        }

        let url = self.table_url(locations);
        tracing::debug!(locations = locations.len(), "requesting OSRM table");

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>())?;

        matrix_from_table(locations, body)
    }
}

#[derive(Debug, Deserialize)]
pub struct OsrmTableResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

/// Turns an OSRM table response into a matrix. `null` cells are unroutable
/// and stay out of the matrix.
pub fn matrix_from_table(locations: &[Location], body: OsrmTableResponse) -> Result<TravelMatrix, MatrixError> {
    if body.code != "Ok" {
        return Err(MatrixError::Service(match body.message {
            Some(message) => format!("{}: {}", body.code, message),
            None => body.code,
        }));
    }

    let durations = body.durations.unwrap_or_default();
    if durations.len() != locations.len() {
        return Err(MatrixError::ShapeMismatch {
            expected: locations.len(),
            actual: durations.len(),
        });
    }
    let distances = body.distances.unwrap_or_default();

    let mut matrix = TravelMatrix::new();
    for (i, from) in locations.iter().enumerate() {
        for (j, to) in locations.iter().enumerate() {
            if i == j {
                continue;
            }
            let Some(duration) = durations[i].get(j).copied().flatten() else {
                continue;
            };
            let distance = distances
                .get(i)
                .and_then(|row| row.get(j).copied().flatten())
                .unwrap_or(0.0);
            matrix.insert(TravelEdge::new(
                from.id.clone(),
                to.id.clone(),
                duration.round() as i64,
                distance.round() as i64,
            ));
        }
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locations() -> Vec<Location> {
        vec![
            Location::start("hotel", "Bellagio", (36.1126, -115.1767)),
            Location::must_visit("office", "Client office", (36.1727, -115.1580)),
        ]
    }

    #[test]
    fn test_table_url_uses_lng_lat_order() {
        let client = OsrmClient::new(OsrmConfig::default()).unwrap();
        let url = client.table_url(&locations());
        assert_eq!(
            url,
            "http://localhost:5000/table/v1/car/-115.176700,36.112600;-115.158000,36.172700?annotations=duration,distance"
        );
    }

    #[test]
    fn test_matrix_from_table() {
        let body: OsrmTableResponse = serde_json::from_str(
            r#"{"code":"Ok","durations":[[0,612.4],[598.6,0]],"distances":[[0,7450.2],[7390.9,0]]}"#,
        )
        .unwrap();
        let matrix = matrix_from_table(&locations(), body).unwrap();

        let edge = matrix.edge(&"hotel".into(), &"office".into()).unwrap();
        assert_eq!(edge.duration_secs, 612);
        assert_eq!(edge.distance_m, 7450);
        assert_eq!(matrix.duration(&"office".into(), &"hotel".into()), Some(599));
        assert_eq!(matrix.len(), 2);
    }

    #[test]
    fn test_null_cells_are_unreachable() {
        let body: OsrmTableResponse =
            serde_json::from_str(r#"{"code":"Ok","durations":[[0,null],[598.6,0]]}"#).unwrap();
        let matrix = matrix_from_table(&locations(), body).unwrap();

        assert!(matrix.edge(&"hotel".into(), &"office".into()).is_none());
        assert_eq!(matrix.edge(&"office".into(), &"hotel".into()).unwrap().distance_m, 0);
    }

    #[test]
    fn test_error_code_is_reported() {
        let body: OsrmTableResponse =
            serde_json::from_str(r#"{"code":"InvalidQuery","message":"Query string malformed"}"#).unwrap();
        let err = matrix_from_table(&locations(), body).unwrap_err();
        assert!(matches!(err, MatrixError::Service(ref message) if message.contains("InvalidQuery")));
    }

    #[test]
    fn test_shape_mismatch() {
        let body: OsrmTableResponse = serde_json::from_str(r#"{"code":"Ok","durations":[[0]]}"#).unwrap();
        let err = matrix_from_table(&locations(), body).unwrap_err();
        assert!(matches!(err, MatrixError::ShapeMismatch { expected: 2, actual: 1 }));
    }
}
