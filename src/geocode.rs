//! Geocoding collaborators: address ↔ coordinate lookup.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::traits::Geocoder;
use crate::waypoint::Waypoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Nominatim rejects requests without an identifying User-Agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("pickup-planner/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

/// Nominatim HTTP geocoder.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: GeocoderConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimClient {
    fn geocode(&self, address: &str) -> Result<Waypoint> {
        let url = format!("{}/search", self.config.base_url);
        let places = self
            .client
            .get(url)
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<SearchPlace>>())
            .inspect_err(|err| tracing::warn!(error = %err, "geocoding request failed"))?;

        waypoint_from_search(places, address)
    }

    fn reverse_geocode(&self, waypoint: Waypoint) -> Result<String> {
        let url = format!("{}/reverse", self.config.base_url);
        let lat = waypoint.lat().to_string();
        let lng = waypoint.lng().to_string();
        let body = self
            .client
            .get(url)
            .query(&[("lat", lat.as_str()), ("lon", lng.as_str()), ("format", "jsonv2")])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<ReversePlace>())
            .inspect_err(|err| tracing::warn!(error = %err, "reverse geocoding request failed"))?;

        address_from_reverse(body, waypoint)
    }
}

/// Answers every lookup with the same coordinate and address.
///
/// Stands in for a real geocoder when no lookup service is configured.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedGeocoder {
    pub waypoint: Waypoint,
    pub address: String,
}

impl FixedGeocoder {
    pub fn new(waypoint: Waypoint, address: impl Into<String>) -> Self {
        Self {
            waypoint,
            address: address.into(),
        }
    }

    /// Central Riyadh.
    pub fn riyadh() -> Result<Self> {
        Ok(Self::new(Waypoint::new(24.7136, 46.6753)?, "Riyadh, Saudi Arabia"))
    }
}

impl Geocoder for FixedGeocoder {
    fn geocode(&self, address: &str) -> Result<Waypoint> {
        tracing::debug!(address, "returning fixed coordinates");
        Ok(self.waypoint)
    }

    fn reverse_geocode(&self, waypoint: Waypoint) -> Result<String> {
        tracing::debug!(lat = waypoint.lat(), lng = waypoint.lng(), "returning fixed address");
        Ok(self.address.clone())
    }
}

fn waypoint_from_search(places: Vec<SearchPlace>, address: &str) -> Result<Waypoint> {
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| PlannerError::Geocoding(format!("address not found: {}", address)))?;

    let lat = place.lat.parse::<f64>();
    let lng = place.lon.parse::<f64>();
    match (lat, lng) {
        (Ok(lat), Ok(lng)) => Waypoint::new(lat, lng),
        _ => Err(PlannerError::Geocoding(format!(
            "malformed coordinates ({}, {}) for {}",
            place.lat, place.lon, address
        ))),
    }
}

fn address_from_reverse(body: ReversePlace, waypoint: Waypoint) -> Result<String> {
    if let Some(error) = body.error {
        return Err(PlannerError::Geocoding(error));
    }
    body.display_name.ok_or_else(|| {
        PlannerError::Geocoding(format!(
            "coordinates not found: ({}, {})",
            waypoint.lat(),
            waypoint.lng()
        ))
    })
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchPlace {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReversePlace {
    display_name: Option<String>,
    error: Option<String>,
}
