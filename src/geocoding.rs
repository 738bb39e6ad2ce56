//! Place name geocoding via Nominatim (OpenStreetMap)
//!
//! Free, no API key required, but every request must carry an identifying
//! `User-Agent`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::GeocodingConfig;
use crate::models::{Coordinates, GeocodingMatch, LocationQuery};
use crate::{Result, WeatherError};

/// Converts a place name into candidate coordinates, best match first
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &LocationQuery) -> Result<Vec<GeocodingMatch>>;
}

/// Nominatim `/search` result. Coordinates arrive as JSON strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

impl TryFrom<NominatimPlace> for GeocodingMatch {
    type Error = WeatherError;

    fn try_from(place: NominatimPlace) -> Result<Self> {
        let latitude: f64 = place
            .lat
            .parse()
            .map_err(|_| WeatherError::geocoding(format!("Invalid latitude '{}'", place.lat)))?;
        let longitude: f64 = place
            .lon
            .parse()
            .map_err(|_| WeatherError::geocoding(format!("Invalid longitude '{}'", place.lon)))?;

        Ok(GeocodingMatch {
            coordinates: Coordinates::new(latitude, longitude),
            display_name: place.display_name,
        })
    }
}

/// Nominatim search client
pub struct NominatimClient {
    client: Client,
    base_url: String,
    country_codes: String,
}

impl NominatimClient {
    /// Create a new client
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        country_codes: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| WeatherError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            country_codes: country_codes.into(),
        })
    }

    /// Create a client from the geocoding section of the configuration
    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.user_agent,
            &config.country_codes,
            config.timeout(),
        )
    }

    fn search_url(&self, query: &LocationQuery) -> String {
        let mut url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query.as_str())
        );
        if !self.country_codes.is_empty() {
            url.push_str("&countrycodes=");
            url.push_str(&urlencoding::encode(&self.country_codes));
        }
        url
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    #[instrument(skip(self, query), fields(query = %query))]
    async fn geocode(&self, query: &LocationQuery) -> Result<Vec<GeocodingMatch>> {
        let url = self.search_url(query);
        debug!("Nominatim request URL: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Geocoding request failed: {}", e);
            WeatherError::geocoding(format!("Request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Geocoding returned status {}", status);
            return Err(WeatherError::geocoding(format!("HTTP {status}")));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            warn!("Geocoding parse error: {}", e);
            WeatherError::geocoding(format!("Invalid response: {e}"))
        })?;

        let matches = places
            .into_iter()
            .map(GeocodingMatch::try_from)
            .collect::<Result<Vec<_>>>()?;

        debug!("Geocoding returned {} match(es)", matches.len());
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> NominatimClient {
        NominatimClient::new(
            server.uri(),
            "weather-server-tests",
            "us",
            Duration::from_secs(2),
        )
        .unwrap()
    }

    fn query(text: &str) -> LocationQuery {
        LocationQuery::parse(text).unwrap()
    }

    #[test]
    fn test_search_url_encodes_query() {
        let client =
            NominatimClient::new("http://geo.test/", "ua", "us", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.search_url(&query("Austin, TX")),
            "http://geo.test/search?q=Austin%2C%20TX&format=json&limit=1&countrycodes=us"
        );
    }

    #[test]
    fn test_search_url_without_country_filter() {
        let client =
            NominatimClient::new("http://geo.test", "ua", "", Duration::from_secs(1)).unwrap();
        assert!(!client.search_url(&query("Paris")).contains("countrycodes"));
    }

    #[tokio::test]
    async fn test_geocode_parses_string_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Austin, TX"))
            .and(query_param("countrycodes", "us"))
            .and(header("user-agent", "weather-server-tests"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "lat": "30.2711286",
                "lon": "-97.7436995",
                "display_name": "Austin, Travis County, Texas, United States"
            }])))
            .mount(&server)
            .await;

        let matches = client(&server).geocode(&query("Austin, TX")).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].coordinates, Coordinates::new(30.2711286, -97.7436995));
        assert!(matches[0].display_name.as_deref().unwrap().contains("Texas"));
    }

    #[tokio::test]
    async fn test_geocode_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let matches = client(&server).geocode(&query("Atlantis")).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_geocode_server_error_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server).geocode(&query("Austin")).await.unwrap_err();
        assert!(matches!(err, WeatherError::UpstreamUnavailable { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_geocode_non_numeric_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "lat": "north", "lon": "-97.7" }])),
            )
            .mount(&server)
            .await;

        let err = client(&server).geocode(&query("Austin")).await.unwrap_err();
        assert!(err.to_string().contains("Invalid latitude"));
    }
}
