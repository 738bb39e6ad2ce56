//! Data models for the weather server
//!
//! This module contains the request-scoped domain models organized by concern:
//! - Location: the caller's query and geocoded coordinates
//! - Forecast: NWS grid points, forecast periods and the response payload

pub mod forecast;
pub mod location;

// Re-export all public types for convenient access
pub use forecast::{ForecastGridPoint, ForecastPayload, ForecastPeriod};
pub use location::{Coordinates, GeocodingMatch, LocationQuery};
