//! Weather server - US city/state forecast lookup
//!
//! Geocodes a free-text US location with Nominatim and returns the current
//! National Weather Service forecast for it, as JSON over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod forecast_resolver;
pub mod geocoding;
pub mod models;
pub mod nws;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use config::WeatherServerConfig;
pub use error::{Upstream, WeatherError};
pub use forecast_resolver::LocationForecastResolver;
pub use geocoding::{Geocoder, NominatimClient};
pub use models::{Coordinates, ForecastGridPoint, ForecastPayload, ForecastPeriod, LocationQuery};
pub use nws::{ForecastProvider, NwsClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherError>;
