//! Great-circle distance oracle.
//!
//! Uses the haversine formula on a spherical earth. Less accurate than a
//! road network (ignores roads) but always available, and well within the
//! precision needed to order a few dozen stops.

use rayon::prelude::*;

use crate::error::Result;
use crate::matrix::DistanceMatrix;
use crate::traits::DistanceMatrixProvider;
use crate::waypoint::Waypoint;

/// Mean earth radius in kilometers (IUGG).
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Great-circle distance between two waypoints in kilometers.
///
/// Longitude differences are taken through `sin²(Δλ/2)`, so pairs on either
/// side of the antimeridian and pairs at the poles come out right without
/// special casing.
pub fn distance(from: Waypoint, to: Waypoint) -> f64 {
    let lat1_rad = from.lat().to_radians();
    let lat2_rad = to.lat().to_radians();
    let delta_lat = (to.lat() - from.lat()).to_radians();
    let delta_lng = (to.lng() - from.lng()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Distance between raw (lat, lng) pairs, validating both.
pub fn distance_between(from: (f64, f64), to: (f64, f64)) -> Result<f64> {
    Ok(distance(Waypoint::try_from(from)?, Waypoint::try_from(to)?))
}

/// Full pairwise matrix for `waypoints`.
///
/// Only the upper triangle is computed; the lower one is mirrored so the
/// result is exactly symmetric with a zero diagonal.
pub fn distance_matrix(waypoints: &[Waypoint]) -> DistanceMatrix {
    let n = waypoints.len();
    if n == 0 {
        return DistanceMatrix::empty();
    }

    let upper: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            waypoints[i + 1..]
                .iter()
                .map(|to| distance(waypoints[i], *to))
                .collect()
        })
        .collect();

    let mut data = vec![0.0; n * n];
    for (i, tail) in upper.into_iter().enumerate() {
        for (offset, km) in tail.into_iter().enumerate() {
            let j = i + 1 + offset;
            data[i * n + j] = km;
            data[j * n + i] = km;
        }
    }

    tracing::debug!(locations = n, "built great-circle distance matrix");

    DistanceMatrix::from_square(n, data)
}

/// Haversine-based distance matrix provider.
///
/// The default provider; also the fallback when a road-network service is
/// unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineMatrix;

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, waypoints: &[Waypoint]) -> Result<DistanceMatrix> {
        Ok(distance_matrix(waypoints))
    }
}
