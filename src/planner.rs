//! Mission planner: the operations the request layer calls.
//!
//! Wires a matrix provider, a route sequencer, a load packer and an order
//! grouper together. Each call builds its own values; the planner holds no
//! per-request state and can be shared across threads.

use serde::{Deserialize, Serialize};

use crate::config::{MatrixSource, PlannerConfig, SequencerKind};
use crate::error::{PlannerError, Result};
use crate::geocode::{FixedGeocoder, NominatimClient};
use crate::grouper::{DemandEntry, NextFitGrouper, OrderGroup};
use crate::haversine::{distance, HaversineMatrix};
use crate::osrm::{OsrmClient, RouteLeg};
use crate::packer::{CapacityItem, GreedyDensityPacker, PackedSelection};
use crate::polyline::Polyline;
use crate::sequencer::{BestFirstSequencer, NearestNeighborSequencer};
use crate::traits::{
    DistanceMatrixProvider, Geocoder, LoadPacker, OrderGrouper, RouteSequencer,
};
use crate::waypoint::Waypoint;

/// Average driving speed assumed for straight-line legs.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// A sequenced mission route together with the matrix it was planned on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub order: Vec<usize>,
    /// The input waypoints in visiting order.
    pub route: Vec<Waypoint>,
    pub total_distance_km: f64,
    pub distance_matrix: Vec<Vec<f64>>,
}

/// Geocoded endpoints of a mission route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    pub start: Waypoint,
    pub end: Waypoint,
    pub distance_km: f64,
}

pub struct MissionPlanner<G = NextFitGrouper> {
    matrix_provider: Box<dyn DistanceMatrixProvider + Send + Sync>,
    sequencer: Box<dyn RouteSequencer + Send + Sync>,
    packer: Box<dyn LoadPacker + Send + Sync>,
    grouper: G,
    router: Option<OsrmClient>,
}

impl Default for MissionPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl MissionPlanner {
    /// Great-circle distances, nearest-neighbor sequencing, greedy packing,
    /// next-fit grouping, straight-line legs.
    pub fn new() -> Self {
        Self {
            matrix_provider: Box::new(HaversineMatrix),
            sequencer: Box::new(NearestNeighborSequencer::default()),
            packer: Box::new(GreedyDensityPacker),
            grouper: NextFitGrouper,
            router: None,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let mut planner = Self::new();

        let router = config.osrm.clone().map(OsrmClient::new).transpose()?;
        if config.matrix_source == MatrixSource::Osrm {
            let client = router.clone().ok_or_else(|| {
                PlannerError::Routing("OSRM matrix source selected without OSRM settings".to_string())
            })?;
            planner = planner.with_matrix_provider(client);
        }
        if let Some(router) = router {
            planner = planner.with_router(router);
        }

        planner = match config.sequencer {
            SequencerKind::NearestNeighbor => planner.with_sequencer(NearestNeighborSequencer {
                two_opt_passes: config.two_opt_passes,
            }),
            SequencerKind::BestFirst => planner.with_sequencer(BestFirstSequencer {
                two_opt_passes: config.two_opt_passes,
            }),
        };

        tracing::info!(
            matrix_source = ?config.matrix_source,
            sequencer = ?config.sequencer,
            road_legs = config.osrm.is_some(),
            "configured mission planner"
        );
        Ok(planner)
    }
}

/// Builds the geocoder described by `config`, or the fixed fallback.
pub fn geocoder_from_config(config: &PlannerConfig) -> Result<Box<dyn Geocoder + Send + Sync>> {
    match &config.geocoder {
        Some(geocoder) => Ok(Box::new(NominatimClient::new(geocoder.clone())?)),
        None => {
            tracing::warn!("no geocoder configured, addresses resolve to a fixed location");
            Ok(Box::new(FixedGeocoder::riyadh()?))
        }
    }
}

impl<G: OrderGrouper> MissionPlanner<G> {
    pub fn with_matrix_provider<M>(mut self, provider: M) -> Self
    where
        M: DistanceMatrixProvider + Send + Sync + 'static,
    {
        self.matrix_provider = Box::new(provider);
        self
    }

    pub fn with_sequencer<S>(mut self, sequencer: S) -> Self
    where
        S: RouteSequencer + Send + Sync + 'static,
    {
        self.sequencer = Box::new(sequencer);
        self
    }

    pub fn with_packer<P>(mut self, packer: P) -> Self
    where
        P: LoadPacker + Send + Sync + 'static,
    {
        self.packer = Box::new(packer);
        self
    }

    pub fn with_grouper<H: OrderGrouper>(self, grouper: H) -> MissionPlanner<H> {
        MissionPlanner {
            matrix_provider: self.matrix_provider,
            sequencer: self.sequencer,
            packer: self.packer,
            grouper,
            router: self.router,
        }
    }

    /// Fetch legs from a road router instead of drawing straight lines.
    pub fn with_router(mut self, router: OsrmClient) -> Self {
        self.router = Some(router);
        self
    }

    /// Orders the mission's stops from the first waypoint to the last and
    /// returns the order along with the full distance matrix.
    pub fn optimize_mission(&self, waypoints: &[Waypoint]) -> Result<OptimizedRoute> {
        let matrix = self.matrix_provider.matrix_for(waypoints)?;
        if matrix.size() != waypoints.len() {
            return Err(PlannerError::Routing(format!(
                "matrix provider returned {} locations for {} waypoints",
                matrix.size(),
                waypoints.len()
            )));
        }

        let result = self.sequencer.sequence(&matrix);
        let route = result.order.iter().map(|&i| waypoints[i]).collect();

        tracing::info!(
            stops = waypoints.len(),
            total_km = result.total_distance_km,
            "optimized mission route"
        );

        Ok(OptimizedRoute {
            order: result.order,
            route,
            total_distance_km: result.total_distance_km,
            distance_matrix: matrix.to_rows(),
        })
    }

    /// Resolves both addresses and measures the great-circle distance
    /// between them.
    pub fn plan_route<C>(&self, geocoder: &C, start_address: &str, end_address: &str) -> Result<PlannedRoute>
    where
        C: Geocoder + ?Sized,
    {
        if start_address.trim().is_empty() {
            return Err(PlannerError::EmptyInput("start address"));
        }
        if end_address.trim().is_empty() {
            return Err(PlannerError::EmptyInput("end address"));
        }

        let start = geocoder.geocode(start_address)?;
        let end = geocoder.geocode(end_address)?;
        let distance_km = distance(start, end);

        tracing::info!(distance_km, "planned route between addresses");
        Ok(PlannedRoute {
            start,
            end,
            distance_km,
        })
    }

    /// Driving leg between two points.
    ///
    /// Without a router the leg is the straight segment between them, timed
    /// at an assumed average speed.
    pub fn route_leg(&self, start: Waypoint, end: Waypoint) -> Result<RouteLeg> {
        match &self.router {
            Some(router) => router.route(start, end),
            None => Ok(straight_leg(start, end)),
        }
    }

    /// Picks the items to load under `capacity`.
    pub fn optimize_load(&self, items: &[CapacityItem], capacity: f64) -> Result<PackedSelection> {
        let selection = self.packer.pack(items, capacity)?;
        tracing::info!(
            items = items.len(),
            selected = selection.items.len(),
            total_weight = selection.total_weight,
            "optimized vehicle load"
        );
        Ok(selection)
    }

    /// Splits orders into pickup groups that each fit a vehicle.
    pub fn group_orders<P>(&self, entries: Vec<DemandEntry<P>>, capacity: f64) -> Result<Vec<OrderGroup<P>>> {
        let entry_count = entries.len();
        let groups = self.grouper.group(entries, capacity)?;
        tracing::info!(orders = entry_count, groups = groups.len(), "grouped orders");
        Ok(groups)
    }
}

fn straight_leg(start: Waypoint, end: Waypoint) -> RouteLeg {
    let distance_km = distance(start, end);
    RouteLeg {
        start,
        end,
        start_name: None,
        end_name: None,
        distance_km,
        duration_secs: (distance_km / DEFAULT_SPEED_KMH * 3600.0).round(),
        geometry: Polyline::new(vec![start, end]),
        steps: Vec::new(),
    }
}
