//! Test fixtures for pickup-planner.
//!
//! Provides realistic test data including:
//! - Riyadh collection points and depots
//! - Builders for waypoints, load items and order entries

pub mod riyadh_locations;

pub use riyadh_locations::*;
