//! Validated geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// A stop on a route, in WGS-84 degrees.
///
/// Construction through [`Waypoint::new`] (or `TryFrom<(f64, f64)>`) rejects
/// out-of-range or non-finite coordinates, so every `Waypoint` the planner
/// sees is valid. Deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct Waypoint {
    lat: f64,
    lng: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);
        if lat_ok && lng_ok {
            Ok(Self { lat, lng })
        } else {
            Err(PlannerError::InvalidCoordinate {
                latitude: lat,
                longitude: lng,
            })
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// (lat, lng) tuple, the shape the HTTP layer speaks.
    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

impl TryFrom<(f64, f64)> for Waypoint {
    type Error = PlannerError;

    fn try_from((lat, lng): (f64, f64)) -> Result<Self> {
        Self::new(lat, lng)
    }
}

impl From<Waypoint> for (f64, f64) {
    fn from(waypoint: Waypoint) -> Self {
        waypoint.coords()
    }
}

/// Validates a batch of raw (lat, lng) pairs, failing on the first bad one.
pub fn waypoints_from_coords(coords: &[(f64, f64)]) -> Result<Vec<Waypoint>> {
    coords.iter().copied().map(Waypoint::try_from).collect()
}
