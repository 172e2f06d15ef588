use crate::{
    Config,
    error::Result,
    model::{Coordinates, EnvironmentSnapshot},
    provider::{nominatim::NominatimGeocoder, open_meteo::OpenMeteoClient},
};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod nominatim;
pub mod open_meteo;

/// Resolves a free-text place name to a single position.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, city: &str) -> Result<Coordinates>;
}

/// Fetches current weather and hourly air quality for a position.
#[async_trait]
pub trait EnvironmentSource: Send + Sync + Debug {
    async fn fetch(&self, coords: Coordinates) -> Result<EnvironmentSnapshot>;
}

/// Shared HTTP client carrying the configured client identifier.
pub fn http_client(config: &Config) -> anyhow::Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))
}

pub fn geocoder_from_config(config: &Config) -> anyhow::Result<Box<dyn Geocoder>> {
    let http = http_client(config)?;
    Ok(Box::new(NominatimGeocoder::new(
        http,
        config.endpoints.geocoding.clone(),
    )))
}

pub fn environment_from_config(config: &Config) -> anyhow::Result<Box<dyn EnvironmentSource>> {
    let http = http_client(config)?;
    Ok(Box::new(OpenMeteoClient::new(
        http,
        config.endpoints.weather.clone(),
        config.endpoints.air_quality.clone(),
    )))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
