//! Location Forecast Resolution
//!
//! Turns a free-text location into a forecast: geocode the text, look up the
//! NWS grid point for the coordinates, then fetch that grid point's periods.
//! Every call runs the full chain; nothing is cached between requests.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::config::WeatherServerConfig;
use crate::geocoding::{Geocoder, NominatimClient};
use crate::models::{ForecastPayload, LocationQuery};
use crate::nws::{ForecastProvider, NwsClient};
use crate::{Result, WeatherError};

/// Service for resolving a location name into a forecast
#[derive(Clone)]
pub struct LocationForecastResolver {
    geocoder: Arc<dyn Geocoder>,
    forecasts: Arc<dyn ForecastProvider>,
    /// Cap on returned periods, 0 means all
    max_periods: usize,
}

impl LocationForecastResolver {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        forecasts: Arc<dyn ForecastProvider>,
        max_periods: usize,
    ) -> Self {
        Self {
            geocoder,
            forecasts,
            max_periods,
        }
    }

    /// Build a resolver backed by the Nominatim and NWS clients
    pub fn from_config(config: &WeatherServerConfig) -> Result<Self> {
        let geocoder = NominatimClient::from_config(&config.geocoding)?;
        let forecasts = NwsClient::from_config(&config.forecast)?;
        Ok(Self::new(
            Arc::new(geocoder),
            Arc::new(forecasts),
            config.forecast.max_periods,
        ))
    }

    /// Resolve a location into its current forecast
    #[instrument(skip(self))]
    pub async fn resolve(&self, location: &str) -> Result<ForecastPayload> {
        let query = LocationQuery::parse(location)?;

        debug!("Geocoding location name: {}", query);
        let geocoded = self.geocoder.geocode(&query).await?;

        // Use the first (best) result
        let best = geocoded
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::not_found(query.as_str()))?;
        let coordinates = best.coordinates;
        debug!(
            "Found location: {} ({:.4}, {:.4})",
            best.display_name.as_deref().unwrap_or(query.as_str()),
            coordinates.latitude,
            coordinates.longitude
        );

        let grid_point = self.forecasts.grid_point(coordinates).await?;
        let mut periods = self.forecasts.forecast(&grid_point).await?;

        if self.max_periods > 0 {
            periods.truncate(self.max_periods);
        }

        let payload = ForecastPayload::new(grid_point.place_name(), coordinates, periods);
        info!(
            "Resolved '{}' to {} with {} period(s)",
            query,
            payload.location.as_deref().unwrap_or("unknown place"),
            payload.periods.len()
        );

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Upstream;
    use crate::models::{Coordinates, ForecastGridPoint, ForecastPeriod, GeocodingMatch};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGeocoder(Result<Vec<GeocodingMatch>>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, _query: &LocationQuery) -> Result<Vec<GeocodingMatch>> {
            match &self.0 {
                Ok(matches) => Ok(matches.clone()),
                Err(_) => Err(WeatherError::geocoding("timed out")),
            }
        }
    }

    #[derive(Default)]
    struct FakeForecasts {
        periods: usize,
        fail_points: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ForecastProvider for FakeForecasts {
        async fn grid_point(&self, coordinates: Coordinates) -> Result<ForecastGridPoint> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_points {
                return Err(WeatherError::forecast("HTTP 500"));
            }
            assert_eq!(coordinates, Coordinates::new(30.27, -97.74));
            Ok(ForecastGridPoint {
                office: "EWX".to_string(),
                grid_x: 156,
                grid_y: 91,
                city: Some("Austin".to_string()),
                state: Some("TX".to_string()),
            })
        }

        async fn forecast(&self, grid_point: &ForecastGridPoint) -> Result<Vec<ForecastPeriod>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(grid_point.office, "EWX");
            Ok((1..=self.periods).map(period).collect())
        }
    }

    fn period(number: usize) -> ForecastPeriod {
        serde_json::from_value(serde_json::json!({
            "number": number,
            "name": format!("Period {number}"),
            "startTime": "2024-03-05T06:00:00-06:00",
            "endTime": "2024-03-05T18:00:00-06:00",
            "isDaytime": true,
            "temperature": 70,
            "temperatureUnit": "F",
            "windSpeed": "10 mph",
            "windDirection": "S",
            "shortForecast": "Sunny",
            "detailedForecast": "Sunny."
        }))
        .unwrap()
    }

    fn austin() -> Vec<GeocodingMatch> {
        vec![
            GeocodingMatch {
                coordinates: Coordinates::new(30.27, -97.74),
                display_name: Some("Austin, Texas".to_string()),
            },
            GeocodingMatch {
                coordinates: Coordinates::new(43.66, -92.97),
                display_name: Some("Austin, Minnesota".to_string()),
            },
        ]
    }

    fn resolver(
        geocoder: FixedGeocoder,
        forecasts: Arc<FakeForecasts>,
        max_periods: usize,
    ) -> LocationForecastResolver {
        LocationForecastResolver::new(Arc::new(geocoder), forecasts, max_periods)
    }

    #[tokio::test]
    async fn test_resolve_uses_first_match() {
        let forecasts = Arc::new(FakeForecasts {
            periods: 3,
            ..Default::default()
        });
        let payload = resolver(FixedGeocoder(Ok(austin())), forecasts.clone(), 0)
            .resolve("Austin")
            .await
            .unwrap();

        assert_eq!(payload.location.as_deref(), Some("Austin, TX"));
        assert_eq!(payload.coordinates, Coordinates::new(30.27, -97.74));
        assert_eq!(payload.periods.len(), 3);
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resolve_caps_periods() {
        let forecasts = Arc::new(FakeForecasts {
            periods: 14,
            ..Default::default()
        });
        let payload = resolver(FixedGeocoder(Ok(austin())), forecasts, 5)
            .resolve("Austin")
            .await
            .unwrap();

        let names: Vec<_> = payload.periods.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["Period 1", "Period 2", "Period 3", "Period 4", "Period 5"]
        );
    }

    #[tokio::test]
    async fn test_resolve_rejects_blank_input_before_any_call() {
        let forecasts = Arc::new(FakeForecasts::default());
        let err = resolver(FixedGeocoder(Ok(austin())), forecasts.clone(), 5)
            .resolve("   ")
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::InvalidInput { .. }));
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_no_match_is_not_found() {
        let forecasts = Arc::new(FakeForecasts::default());
        let err = resolver(FixedGeocoder(Ok(Vec::new())), forecasts.clone(), 5)
            .resolve("Atlantis")
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::NotFound { ref query } if query == "Atlantis"));
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_geocoding_failure() {
        let forecasts = Arc::new(FakeForecasts::default());
        let err = resolver(
            FixedGeocoder(Err(WeatherError::geocoding("timed out"))),
            forecasts,
            5,
        )
        .resolve("Austin")
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            WeatherError::UpstreamUnavailable {
                service: Upstream::Geocoding,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_resolve_points_failure_skips_forecast() {
        let forecasts = Arc::new(FakeForecasts {
            fail_points: true,
            ..Default::default()
        });
        let err = resolver(FixedGeocoder(Ok(austin())), forecasts.clone(), 5)
            .resolve("Austin")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WeatherError::UpstreamUnavailable {
                service: Upstream::Forecast,
                ..
            }
        ));
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 1);
    }
}
