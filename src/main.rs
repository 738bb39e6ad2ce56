use anyhow::{Context, Result};
use weather_server::{WeatherServerConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = WeatherServerConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.logging)?;

    tracing::info!("Starting weather server v{}", weather_server::VERSION);
    web::run(&config).await
}
