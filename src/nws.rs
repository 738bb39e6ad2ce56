//! National Weather Service (api.weather.gov) client
//!
//! Forecasts are a two step lookup: `/points/{lat},{lon}` resolves coordinates
//! to a forecast office grid cell, and `/gridpoints/{office}/{x},{y}/forecast`
//! returns the periods for that cell.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::ForecastConfig;
use crate::models::{Coordinates, ForecastGridPoint, ForecastPeriod};
use crate::{Result, WeatherError};

const GEO_JSON: &str = "application/geo+json";

/// Grid point and forecast lookups
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Resolve coordinates to the forecast grid cell covering them
    async fn grid_point(&self, coordinates: Coordinates) -> Result<ForecastGridPoint>;

    /// Fetch the forecast periods for a grid cell
    async fn forecast(&self, grid_point: &ForecastGridPoint) -> Result<Vec<ForecastPeriod>>;
}

/// National Weather Service API response structures
mod api {
    use super::{Deserialize, ForecastGridPoint, ForecastPeriod};

    #[derive(Debug, Deserialize)]
    pub struct PointsResponse {
        pub properties: PointsProperties,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PointsProperties {
        pub grid_id: Option<String>,
        pub grid_x: Option<u32>,
        pub grid_y: Option<u32>,
        pub relative_location: Option<RelativeLocation>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RelativeLocation {
        pub properties: RelativeLocationProperties,
    }

    #[derive(Debug, Deserialize)]
    pub struct RelativeLocationProperties {
        pub city: Option<String>,
        pub state: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub properties: ForecastProperties,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastProperties {
        pub periods: Vec<ForecastPeriod>,
    }

    impl PointsProperties {
        /// Grid cell, or `None` for points outside NWS coverage
        pub fn into_grid_point(self) -> Option<ForecastGridPoint> {
            let (city, state) = self
                .relative_location
                .map(|location| (location.properties.city, location.properties.state))
                .unwrap_or_default();

            Some(ForecastGridPoint {
                office: self.grid_id.filter(|id| !id.is_empty())?,
                grid_x: self.grid_x?,
                grid_y: self.grid_y?,
                city,
                state,
            })
        }
    }
}

/// api.weather.gov client
pub struct NwsClient {
    client: Client,
    base_url: String,
}

impl NwsClient {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GEO_JSON));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| WeatherError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the forecast section of the configuration
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        Self::new(&config.base_url, &config.user_agent, config.timeout())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("NWS request URL: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("NWS request failed: {}", e);
            WeatherError::forecast(format!("Request to {path} failed: {e}"))
        })?;

        Self::parse(response, path).await
    }

    async fn parse<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            warn!("NWS {} returned status {}", path, status);
            return Err(WeatherError::forecast(format!("{path} returned HTTP {status}")));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse NWS {} response: {}", path, e);
            WeatherError::forecast(format!("Invalid response from {path}: {e}"))
        })
    }
}

#[async_trait]
impl ForecastProvider for NwsClient {
    #[instrument(skip(self), fields(point = %coordinates.format_point()))]
    async fn grid_point(&self, coordinates: Coordinates) -> Result<ForecastGridPoint> {
        let path = format!("/points/{}", coordinates.format_point());
        let points: api::PointsResponse = self.get_json(&path).await?;

        let grid_point = points.properties.into_grid_point().ok_or_else(|| {
            WeatherError::forecast("Forecast data not available for this location")
        })?;

        debug!(
            "Grid point {} {},{}",
            grid_point.office, grid_point.grid_x, grid_point.grid_y
        );
        Ok(grid_point)
    }

    #[instrument(skip(self), fields(office = %grid_point.office))]
    async fn forecast(&self, grid_point: &ForecastGridPoint) -> Result<Vec<ForecastPeriod>> {
        let forecast: api::ForecastResponse = self.get_json(&grid_point.forecast_path()).await?;
        debug!("Forecast has {} period(s)", forecast.properties.periods.len());
        Ok(forecast.properties.periods)
    }
}
