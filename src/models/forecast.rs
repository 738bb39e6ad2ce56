//! Forecast grid point, period and payload models

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Coordinates;

/// NWS forecast office and grid cell covering a pair of coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastGridPoint {
    /// Forecast office identifier, e.g. "EWX"
    pub office: String,
    pub grid_x: u32,
    pub grid_y: u32,
    /// Nearest city reported by the points endpoint
    pub city: Option<String>,
    /// State of the nearest city
    pub state: Option<String>,
}

impl ForecastGridPoint {
    /// Path of the forecast endpoint for this grid cell, relative to the API base
    #[must_use]
    pub fn forecast_path(&self) -> String {
        format!(
            "/gridpoints/{}/{},{}/forecast",
            self.office, self.grid_x, self.grid_y
        )
    }

    /// "City, ST" when the points endpoint named the nearest city
    #[must_use]
    pub fn place_name(&self) -> Option<String> {
        match (&self.city, &self.state) {
            (Some(city), Some(state)) => Some(format!("{city}, {state}")),
            (Some(city), None) => Some(city.clone()),
            (None, Some(state)) => Some(state.clone()),
            (None, None) => None,
        }
    }
}

/// One time-bucketed forecast period, e.g. "Tonight"
///
/// Field names match the NWS forecast response so periods pass through unchanged.
/// Fields without a typed counterpart are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub number: u32,
    pub name: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub is_daytime: bool,
    pub temperature: i32,
    /// "F" or "C"
    pub temperature_unit: String,
    /// Free text, e.g. "5 to 10 mph"
    pub wind_speed: String,
    /// Cardinal direction, e.g. "SSW"
    pub wind_direction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub short_forecast: String,
    pub detailed_forecast: String,
    /// Remaining NWS fields, e.g. `probabilityOfPrecipitation`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Forecast returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPayload {
    /// "City, ST" of the grid point, when known
    pub location: Option<String>,
    pub coordinates: Coordinates,
    /// Forecast periods in the order the NWS returned them
    pub periods: Vec<ForecastPeriod>,
    /// When this forecast was retrieved
    pub retrieved_at: DateTime<Utc>,
}

impl ForecastPayload {
    /// Create a new payload stamped with the current time
    #[must_use]
    pub fn new(
        location: Option<String>,
        coordinates: Coordinates,
        periods: Vec<ForecastPeriod>,
    ) -> Self {
        Self {
            location,
            coordinates,
            periods,
            retrieved_at: Utc::now(),
        }
    }
}
