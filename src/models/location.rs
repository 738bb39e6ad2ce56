//! Location query and coordinate models

use serde::{Deserialize, Serialize};

use crate::WeatherError;

/// Free-text location supplied by the caller, e.g. "Austin, TX"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Trim the input and reject it when nothing is left
    pub fn parse(input: &str) -> crate::Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::invalid_input("Location cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic coordinates in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as `lat,lon` with four decimals, the precision the NWS points endpoint accepts
    #[must_use]
    pub fn format_point(&self) -> String {
        format!("{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// One geocoding result
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodingMatch {
    pub coordinates: Coordinates,
    /// Full place name reported by the geocoder
    pub display_name: Option<String>,
}
