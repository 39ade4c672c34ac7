//! Riyadh-area locations for realistic test fixtures.
//!
//! Coordinates are approximate district centers; they only need to be
//! geographically plausible for great-circle routing.

#![allow(dead_code)]

use pickup_planner::{CapacityItem, DemandEntry, Waypoint};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn waypoint(&self) -> Waypoint {
        Waypoint::new(self.lat, self.lng).expect("fixture coordinates are valid")
    }
}

// ============================================================================
// Depots (start / end of missions)
// ============================================================================

pub const DEPOTS: &[Location] = &[
    Location::new("Second Industrial City Depot", 24.5720, 46.8560),
    Location::new("Sulay Recycling Yard", 24.6010, 46.7900),
    Location::new("North Ring Transfer Station", 24.8280, 46.6480),
];

// ============================================================================
// Collection points
// ============================================================================

pub const COLLECTION_POINTS: &[Location] = &[
    Location::new("Olaya", 24.6950, 46.6850),
    Location::new("Al Malaz", 24.6660, 46.7310),
    Location::new("Al Murabba", 24.6460, 46.7100),
    Location::new("Al Sulimaniyah", 24.7040, 46.7000),
    Location::new("Al Wurud", 24.7180, 46.6680),
    Location::new("Al Nakheel", 24.7510, 46.6300),
    Location::new("Al Yasmin", 24.8230, 46.6380),
    Location::new("Al Rawdah", 24.7350, 46.7720),
    Location::new("Al Naseem", 24.7240, 46.8240),
    Location::new("Al Shifa", 24.5560, 46.7030),
    Location::new("Al Aziziyah", 24.5940, 46.7540),
    Location::new("Diriyah", 24.7370, 46.5750),
];

/// A mission that starts at the first depot, visits `stops` collection
/// points and ends at the transfer station.
pub fn mission(stops: usize) -> Vec<Waypoint> {
    let mut waypoints = vec![DEPOTS[0].waypoint()];
    waypoints.extend(COLLECTION_POINTS.iter().take(stops).map(Location::waypoint));
    waypoints.push(DEPOTS[2].waypoint());
    waypoints
}

/// Tire batches: (weight kg, resale value).
pub fn tire_batches() -> Vec<CapacityItem> {
    [
        (120.0, 300.0),
        (80.0, 260.0),
        (200.0, 380.0),
        (45.0, 90.0),
        (160.0, 500.0),
        (60.0, 75.0),
    ]
    .iter()
    .map(|&(weight, value)| CapacityItem::new(weight, value))
    .collect()
}

/// Pickup orders with their ids as payload.
pub fn pickup_orders(weights: &[f64]) -> Vec<DemandEntry<String>> {
    weights
        .iter()
        .enumerate()
        .map(|(i, &weight)| DemandEntry::new(weight, format!("order-{}", i + 1)))
        .collect()
}
