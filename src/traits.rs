//! Seams between the planner and its strategies and collaborators.
//!
//! The greedy algorithms shipped with the crate implement these traits so an
//! exact solver or a different data source can be swapped in without
//! changing the callers.

use crate::error::Result;
use crate::grouper::{DemandEntry, OrderGroup};
use crate::matrix::DistanceMatrix;
use crate::packer::{CapacityItem, PackedSelection};
use crate::sequencer::RouteResult;
use crate::waypoint::Waypoint;

/// Provides a distance matrix (km) for a set of waypoints.
///
/// The matrix is indexed by the provided waypoint order.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, waypoints: &[Waypoint]) -> Result<DistanceMatrix>;
}

/// Orders the indices of a distance matrix into a path.
///
/// Implementations must return every index exactly once, with index 0 first
/// and the last index last.
pub trait RouteSequencer {
    fn sequence(&self, matrix: &DistanceMatrix) -> RouteResult;
}

/// Selects a subset of items that fits within a capacity bound.
pub trait LoadPacker {
    fn pack(&self, items: &[CapacityItem], capacity: f64) -> Result<PackedSelection>;
}

/// Partitions demand entries into capacity-bounded groups.
pub trait OrderGrouper {
    fn group<P>(&self, entries: Vec<DemandEntry<P>>, capacity: f64) -> Result<Vec<OrderGroup<P>>>;
}

/// Address lookup service.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> Result<Waypoint>;

    fn reverse_geocode(&self, waypoint: Waypoint) -> Result<String>;
}
