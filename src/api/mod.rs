use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::forecast_resolver::LocationForecastResolver;
use crate::models::ForecastPayload;
use crate::{VERSION, WeatherError};

pub mod error;

pub use error::ErrorBody;

/// Query string of `GET /api/forecast`
#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    pub location: Option<String>,
}

/// Body of `GET /api/health`
#[derive(Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

pub fn router(resolver: LocationForecastResolver) -> Router {
    Router::new()
        .route("/forecast", get(get_forecast))
        .route("/health", get(health))
        .fallback(endpoint_not_found)
        .with_state(resolver)
}

async fn get_forecast(
    State(resolver): State<LocationForecastResolver>,
    params: Result<Query<ForecastParams>, QueryRejection>,
) -> Result<Json<ForecastPayload>, WeatherError> {
    let Query(params) =
        params.map_err(|rejection| WeatherError::invalid_input(rejection.body_text()))?;
    let location = params
        .location
        .ok_or_else(|| WeatherError::invalid_input("Missing location parameter"))?;

    let payload = resolver.resolve(&location).await?;
    Ok(Json(payload))
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}

async fn endpoint_not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Endpoint not found")),
    )
}
