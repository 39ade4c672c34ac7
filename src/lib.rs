//! pickup-planner: route and load optimization for pickup missions.
//!
//! Orders waypoints into a visiting sequence, packs vehicle loads under a
//! capacity bound and groups orders into vehicle-sized batches. Everything
//! in the core is a pure function of its inputs; address lookup and road
//! routing are injected collaborators.

pub mod config;
pub mod error;
pub mod geocode;
pub mod grouper;
pub mod haversine;
pub mod matrix;
pub mod osrm;
pub mod packer;
pub mod planner;
pub mod polyline;
pub mod sequencer;
pub mod traits;
pub mod waypoint;

pub use error::{PlannerError, Result};
pub use grouper::{DemandEntry, OrderGroup};
pub use haversine::{distance, distance_matrix};
pub use matrix::DistanceMatrix;
pub use packer::{CapacityItem, PackedSelection};
pub use sequencer::RouteResult;
pub use waypoint::Waypoint;

use grouper::NextFitGrouper;
use packer::GreedyDensityPacker;
use sequencer::NearestNeighborSequencer;
use traits::{LoadPacker, OrderGrouper, RouteSequencer};

/// Visiting order over all `waypoints`, first to last, on great-circle
/// distances with the default sequencer.
pub fn sequence_route(waypoints: &[Waypoint]) -> RouteResult {
    NearestNeighborSequencer::default().sequence(&distance_matrix(waypoints))
}

/// Greedy value-density selection of `items` under `capacity`.
pub fn pack_by_capacity(items: &[CapacityItem], capacity: f64) -> Result<PackedSelection> {
    GreedyDensityPacker.pack(items, capacity)
}

/// Next-fit partition of `entries` into groups of at most `capacity`.
pub fn group_by_capacity<P>(entries: Vec<DemandEntry<P>>, capacity: f64) -> Result<Vec<OrderGroup<P>>> {
    NextFitGrouper.group(entries, capacity)
}
