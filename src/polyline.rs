//! Polyline representation for route geometries.
//!
//! Geometries arrive from the routing service as GeoJSON coordinates and
//! are kept as validated waypoints. Any compact encoding for a frontend
//! happens at the API boundary, not here.

use serde::{Deserialize, Serialize};

use crate::haversine::distance;
use crate::waypoint::Waypoint;

/// A route geometry as a sequence of waypoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Waypoint>,
}

impl Polyline {
    pub fn new(points: Vec<Waypoint>) -> Self {
        Self { points }
    }

    /// Returns a reference to the points.
    pub fn points(&self) -> &[Waypoint] {
        &self.points
    }

    /// Consumes the polyline and returns the owned points.
    pub fn into_points(self) -> Vec<Waypoint> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Great-circle length of the geometry in km.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|segment| distance(segment[0], segment[1]))
            .sum()
    }
}
