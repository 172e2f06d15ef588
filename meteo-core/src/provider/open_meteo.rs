use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result, Service},
    model::{Coordinates, CurrentWeather, EnvironmentSnapshot, HourlySeries, PollutantKind},
};

use super::{EnvironmentSource, truncate_body};

const WEATHER_HOURLY: &str = "temperature_2m,relative_humidity_2m";

/// Weather and air quality from the Open-Meteo forecast and air-quality APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    weather_url: String,
    air_quality_url: String,
}

impl OpenMeteoClient {
    pub fn new(http: Client, weather_url: String, air_quality_url: String) -> Self {
        Self {
            http,
            weather_url,
            air_quality_url,
        }
    }

    async fn get(
        &self,
        service: Service,
        url: &str,
        query: &[(&str, String)],
    ) -> Option<Response> {
        debug!(%service, url, ?query, "environment request");

        match self.http.get(url).query(query).send().await {
            Ok(res) => Some(res),
            Err(e) => {
                warn!(%service, error = %e, "environment request could not be sent");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    time: Option<String>,
    temperature: Option<f64>,
    windspeed: Option<f64>,
    relative_humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OmWeatherHourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current_weather: Option<OmCurrentWeather>,
    #[serde(default)]
    hourly: OmWeatherHourly,
}

#[derive(Debug, Deserialize)]
struct OmAirQualityHourly {
    time: Vec<String>,
    #[serde(default)]
    pm10: Vec<Option<f64>>,
    #[serde(default)]
    pm2_5: Vec<Option<f64>>,
    #[serde(default)]
    carbon_monoxide: Vec<Option<f64>>,
    #[serde(default)]
    ozone: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmAirQualityResponse {
    hourly: OmAirQualityHourly,
}

#[async_trait]
impl EnvironmentSource for OpenMeteoClient {
    async fn fetch(&self, coords: Coordinates) -> Result<EnvironmentSnapshot> {
        let latitude = coords.latitude.to_string();
        let longitude = coords.longitude.to_string();
        let pollutants = PollutantKind::all()
            .iter()
            .map(|k| k.key())
            .collect::<Vec<_>>()
            .join(",");

        let weather = self
            .get(
                Service::Weather,
                &self.weather_url,
                &[
                    ("latitude", latitude.clone()),
                    ("longitude", longitude.clone()),
                    ("current_weather", "true".to_string()),
                    ("hourly", WEATHER_HOURLY.to_string()),
                ],
            )
            .await;

        let air_quality = self
            .get(
                Service::AirQuality,
                &self.air_quality_url,
                &[
                    ("latitude", latitude),
                    ("longitude", longitude),
                    ("hourly", pollutants),
                ],
            )
            .await;

        let weather_status = weather.as_ref().map(Response::status);
        let air_quality_status = air_quality.as_ref().map(Response::status);

        let (Some(weather), Some(air_quality)) = (
            weather.filter(|r| r.status().is_success()),
            air_quality.filter(|r| r.status().is_success()),
        ) else {
            warn!(
                weather = ?weather_status,
                air_quality = ?air_quality_status,
                "environment data unavailable"
            );
            return Err(Error::EnvironmentUnavailable {
                weather: weather_status,
                air_quality: air_quality_status,
            });
        };

        let forecast: OmForecastResponse = read_json(Service::Weather, weather).await?;
        let air: OmAirQualityResponse = read_json(Service::AirQuality, air_quality).await?;

        let current = current_weather(forecast);
        let hourly = hourly_series(air.hourly)?;

        info!(%coords, hours = hourly.len(), "fetched environment data");

        Ok(EnvironmentSnapshot { current, hourly })
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(service: Service, res: Response) -> Result<T> {
    let body = res
        .text()
        .await
        .map_err(|source| Error::Transport { service, source })?;

    serde_json::from_str(&body).map_err(|e| {
        warn!(%service, error = %e, body = %truncate_body(&body), "undecodable response");
        Error::Decode {
            service,
            message: e.to_string(),
        }
    })
}

/// Pick out current conditions, tolerating any missing field.
///
/// `current_weather` carries no humidity, so it is looked up in the hourly
/// block at the hour containing the current conditions' time, which is
/// reported at quarter-hour resolution.
fn current_weather(forecast: OmForecastResponse) -> CurrentWeather {
    let Some(current) = forecast.current_weather else {
        return CurrentWeather::default();
    };

    let humidity_pct = current.relative_humidity.or_else(|| {
        let at = parse_timestamp(current.time.as_deref()?).ok()?;
        let hour = at.with_minute(0)?.with_second(0)?;
        let idx = forecast
            .hourly
            .time
            .iter()
            .position(|t| parse_timestamp(t).is_ok_and(|t| t == hour))?;
        forecast
            .hourly
            .relative_humidity_2m
            .get(idx)
            .copied()
            .flatten()
    });

    CurrentWeather {
        temperature_c: current.temperature,
        humidity_pct,
        wind_speed_kmh: current.windspeed,
    }
}

fn hourly_series(hourly: OmAirQualityHourly) -> Result<HourlySeries> {
    let time = hourly
        .time
        .iter()
        .map(|t| parse_timestamp(t))
        .collect::<Result<Vec<_>>>()?;

    HourlySeries::new(
        time,
        hourly.pm10,
        hourly.pm2_5,
        hourly.carbon_monoxide,
        hourly.ozone,
    )
    .inspect_err(|e| warn!(error = %e, "rejecting air quality series"))
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| Error::Decode {
            service: Service::AirQuality,
            message: format!("invalid timestamp {raw:?}: {e}"),
        })
}
