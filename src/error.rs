//! Error types and handling for the weather server

use std::fmt;

use thiserror::Error;

/// Third-party service a request depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    /// Place name to coordinates lookup (Nominatim)
    Geocoding,
    /// Grid point and forecast lookup (National Weather Service)
    Forecast,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upstream::Geocoding => write!(f, "geocoding"),
            Upstream::Forecast => write!(f, "forecast"),
        }
    }
}

/// Main error type for the weather server
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Missing or blank location
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Geocoding returned no match for the query
    #[error("Location not found: {query}")]
    NotFound { query: String },

    /// Network failure, timeout, non-2xx status or malformed body from an upstream API
    #[error("{service} unavailable: {message}")]
    UpstreamUnavailable { service: Upstream, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl WeatherError {
    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new not found error for the given query
    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Create a new geocoding upstream error
    pub fn geocoding<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            service: Upstream::Geocoding,
            message: message.into(),
        }
    }

    /// Create a new forecast upstream error
    pub fn forecast<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            service: Upstream::Forecast,
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::InvalidInput { .. } => {
                "Please provide a location (city or state name)".to_string()
            }
            WeatherError::NotFound { query } => format!(
                "Location not found: '{query}'. Please try a valid US city or state name."
            ),
            WeatherError::UpstreamUnavailable {
                service: Upstream::Geocoding,
                ..
            } => "Geocoding unavailable. Please try again later.".to_string(),
            WeatherError::UpstreamUnavailable {
                service: Upstream::Forecast,
                ..
            } => "Forecast unavailable for this location. Please try again later.".to_string(),
            WeatherError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
        }
    }
}
