//! OSRM HTTP adapter for road-network distance matrices and route legs.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::matrix::DistanceMatrix;
use crate::polyline::Polyline;
use crate::traits::DistanceMatrixProvider;
use crate::waypoint::Waypoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

/// Point-to-point driving summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub start: Waypoint,
    pub end: Waypoint,
    /// Road the route starts on, when the router knows it.
    #[serde(default)]
    pub start_name: Option<String>,
    #[serde(default)]
    pub end_name: Option<String>,
    pub distance_km: f64,
    pub duration_secs: f64,
    pub geometry: Polyline,
    /// Turn-by-turn instructions, e.g. "Turn left onto Olaya Street".
    #[serde(default)]
    pub steps: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    /// Fetches the driving route between two waypoints.
    pub fn route(&self, start: Waypoint, end: Waypoint) -> Result<RouteLeg> {
        let url = route_url(&self.config, start, end);
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>())
            .inspect_err(|err| tracing::warn!(error = %err, "OSRM route request failed"))?;

        leg_from_response(body, start, end)
    }
}

impl DistanceMatrixProvider for OsrmClient {
    fn matrix_for(&self, waypoints: &[Waypoint]) -> Result<DistanceMatrix> {
        if waypoints.is_empty() {
            return Ok(DistanceMatrix::empty());
        }

        let url = table_url(&self.config, waypoints);
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>())
            .inspect_err(|err| tracing::warn!(error = %err, "OSRM table request failed"))?;

        let matrix = matrix_from_response(body, waypoints.len())?;
        tracing::debug!(locations = waypoints.len(), "fetched OSRM distance matrix");
        Ok(matrix)
    }
}

/// OSRM wants `lng,lat` pairs separated by `;`.
fn coordinate_list(waypoints: &[Waypoint]) -> String {
    waypoints
        .iter()
        .map(|wp| format!("{:.6},{:.6}", wp.lng(), wp.lat()))
        .collect::<Vec<_>>()
        .join(";")
}

fn table_url(config: &OsrmConfig, waypoints: &[Waypoint]) -> String {
    format!(
        "{}/table/v1/{}/{}?annotations=distance",
        config.base_url,
        config.profile,
        coordinate_list(waypoints)
    )
}

fn route_url(config: &OsrmConfig, start: Waypoint, end: Waypoint) -> String {
    format!(
        "{}/route/v1/{}/{}?overview=full&geometries=geojson&steps=true",
        config.base_url,
        config.profile,
        coordinate_list(&[start, end])
    )
}

fn check_code(code: &str, message: Option<String>) -> Result<()> {
    if code == "Ok" {
        Ok(())
    } else {
        Err(PlannerError::Routing(match message {
            Some(message) => format!("{}: {}", code, message),
            None => code.to_string(),
        }))
    }
}

fn matrix_from_response(body: OsrmTableResponse, expected: usize) -> Result<DistanceMatrix> {
    check_code(&body.code, body.message)?;
    let distances = body
        .distances
        .ok_or_else(|| PlannerError::Routing("table response has no distances".to_string()))?;
    if distances.len() != expected {
        return Err(PlannerError::Routing(format!(
            "table response has {} rows for {} locations",
            distances.len(),
            expected
        )));
    }

    let mut rows = Vec::with_capacity(expected);
    for (i, row) in distances.into_iter().enumerate() {
        let mut km_row = Vec::with_capacity(row.len());
        for (j, meters) in row.into_iter().enumerate() {
            let meters = meters.ok_or_else(|| {
                PlannerError::Routing(format!("no route from location {} to {}", i, j))
            })?;
            km_row.push(meters / 1000.0);
        }
        rows.push(km_row);
    }
    DistanceMatrix::from_rows(rows)
}

fn leg_from_response(body: OsrmRouteResponse, start: Waypoint, end: Waypoint) -> Result<RouteLeg> {
    check_code(&body.code, body.message)?;
    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| PlannerError::Routing("no route found".to_string()))?;

    let points = route
        .geometry
        .coordinates
        .into_iter()
        .map(|[lng, lat]| Waypoint::new(lat, lng))
        .collect::<Result<Vec<_>>>()?;

    let steps = route
        .legs
        .iter()
        .flat_map(|leg| leg.steps.iter())
        .map(instruction)
        .collect();
    let mut names = body.waypoints.into_iter().map(|waypoint| waypoint.name);
    let start_name = names.next().filter(|name| !name.is_empty());
    let end_name = names.last().filter(|name| !name.is_empty());

    Ok(RouteLeg {
        start,
        end,
        start_name,
        end_name,
        distance_km: route.distance / 1000.0,
        duration_secs: route.duration,
        geometry: Polyline::new(points),
        steps,
    })
}

/// Renders an OSRM maneuver as a short English instruction.
fn instruction(step: &OsrmStep) -> String {
    let maneuver = &step.maneuver;
    if maneuver.kind == "arrive" {
        return "Arrive at destination".to_string();
    }

    let mut text = match maneuver.kind.as_str() {
        "depart" => "Head".to_string(),
        "new name" | "notification" => "Continue".to_string(),
        kind => {
            let mut chars = kind.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => "Continue".to_string(),
            }
        }
    };
    if let Some(modifier) = &maneuver.modifier {
        text.push(' ');
        text.push_str(modifier);
    }
    if !step.name.is_empty() {
        text.push_str(" onto ");
        text.push_str(&step.name);
    }
    text
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
    #[serde(default)]
    waypoints: Vec<OsrmWaypoint>,
}

#[derive(Debug, Deserialize)]
struct OsrmWaypoint {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    #[serde(default)]
    name: String,
    maneuver: OsrmManeuver,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind: String,
    modifier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}
