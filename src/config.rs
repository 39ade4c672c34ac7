//! Planner configuration, loaded from the environment.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geocode::GeocoderConfig;
use crate::osrm::OsrmConfig;
use crate::sequencer::DEFAULT_TWO_OPT_PASSES;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Where distance matrices come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatrixSource {
    #[default]
    Haversine,
    Osrm,
}

impl FromStr for MatrixSource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "haversine" | "great-circle" => Ok(Self::Haversine),
            "osrm" => Ok(Self::Osrm),
            _ => Err(()),
        }
    }
}

/// Which route sequencing strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequencerKind {
    #[default]
    NearestNeighbor,
    BestFirst,
}

impl FromStr for SequencerKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest-neighbor" | "nearest_neighbor" => Ok(Self::NearestNeighbor),
            "best-first" | "best_first" | "a-star" => Ok(Self::BestFirst),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub matrix_source: MatrixSource,
    pub sequencer: SequencerKind,
    /// Cap on 2-opt moves per sequenced route.
    pub two_opt_passes: usize,
    /// Used for road matrices and route legs. Legs fall back to straight
    /// lines when this is `None`.
    pub osrm: Option<OsrmConfig>,
    /// `None` means no lookup service: addresses resolve to a fixed point.
    pub geocoder: Option<GeocoderConfig>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            matrix_source: MatrixSource::default(),
            sequencer: SequencerKind::default(),
            two_opt_passes: DEFAULT_TWO_OPT_PASSES,
            osrm: None,
            geocoder: None,
        }
    }
}

impl PlannerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `PLANNER_MATRIX_SOURCE` | `haversine` (or `osrm`) |
    /// | `PLANNER_SEQUENCER` | `nearest-neighbor` (or `best-first`) |
    /// | `PLANNER_TWO_OPT_PASSES` | `100` |
    /// | `OSRM_BASE_URL` | unset; required when the source is `osrm` |
    /// | `OSRM_PROFILE` | `car` |
    /// | `OSRM_TIMEOUT_SECS` | `10` |
    /// | `GEOCODER_BASE_URL` | unset (fixed geocoder) |
    /// | `GEOCODER_USER_AGENT` | `pickup-planner/<version>` |
    /// | `GEOCODER_TIMEOUT_SECS` | `10` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let matrix_source = parse_or(&get, "PLANNER_MATRIX_SOURCE", defaults.matrix_source)?;
        let sequencer = parse_or(&get, "PLANNER_SEQUENCER", defaults.sequencer)?;
        let two_opt_passes = parse_or(&get, "PLANNER_TWO_OPT_PASSES", defaults.two_opt_passes)?;

        let osrm = match get("OSRM_BASE_URL") {
            Some(base_url) => {
                let osrm_defaults = OsrmConfig::default();
                Some(OsrmConfig {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    profile: get("OSRM_PROFILE").unwrap_or(osrm_defaults.profile),
                    timeout_secs: parse_or(&get, "OSRM_TIMEOUT_SECS", osrm_defaults.timeout_secs)?,
                })
            }
            None if matrix_source == MatrixSource::Osrm => {
                return Err(ConfigError::InvalidValue {
                    key: "OSRM_BASE_URL",
                    value: String::new(),
                });
            }
            None => None,
        };

        let geocoder = match get("GEOCODER_BASE_URL") {
            Some(base_url) => {
                let geocoder_defaults = GeocoderConfig::default();
                Some(GeocoderConfig {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    user_agent: get("GEOCODER_USER_AGENT").unwrap_or(geocoder_defaults.user_agent),
                    timeout_secs: parse_or(
                        &get,
                        "GEOCODER_TIMEOUT_SECS",
                        geocoder_defaults.timeout_secs,
                    )?,
                })
            }
            None => None,
        };

        Ok(Self {
            matrix_source,
            sequencer,
            two_opt_passes,
            osrm,
            geocoder,
        })
    }
}

fn parse_or<G, T>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}
