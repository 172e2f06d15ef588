use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result, Service},
    model::Coordinates,
};

use super::{Geocoder, truncate_body};

/// Geocoder backed by a Nominatim-compatible search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Client,
    url: String,
}

impl NominatimGeocoder {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }
}

#[derive(Debug, Deserialize)]
struct NmPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, city: &str) -> Result<Coordinates> {
        let city = city.trim();
        if city.is_empty() {
            return Err(Error::EmptyQuery);
        }

        debug!(url = %self.url, city, "geocoding request");

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("q", city),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|source| {
                warn!(error = %source, "geocoding request could not be sent");
                Error::Transport {
                    service: Service::Geocoding,
                    source,
                }
            })?;

        let status = res.status();
        if !status.is_success() {
            warn!(%status, city, "geocoding request failed");
            return Err(Error::Status {
                service: Service::Geocoding,
                status,
            });
        }

        let body = res.text().await.map_err(|source| Error::Transport {
            service: Service::Geocoding,
            source,
        })?;

        let places: Vec<NmPlace> = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %truncate_body(&body), "geocoding response is not a match list");
            Error::Decode {
                service: Service::Geocoding,
                message: e.to_string(),
            }
        })?;

        let Some(place) = places.into_iter().next() else {
            warn!(city, "no geocoding match");
            return Err(Error::NotFound {
                city: city.to_string(),
            });
        };

        let coords = Coordinates::new(
            parse_degrees("latitude", &place.lat)?,
            parse_degrees("longitude", &place.lon)?,
        );

        info!(
            city,
            %coords,
            place = place.display_name.as_deref().unwrap_or(""),
            "resolved city"
        );

        Ok(coords)
    }
}

fn parse_degrees(field: &'static str, raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        warn!(field, raw, "unparseable coordinate");
        Error::InvalidCoordinate {
            field,
            value: raw.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_degrees_accepts_numeric_strings() {
        assert_eq!(parse_degrees("latitude", "45.4641943").ok(), Some(45.4641943));
        assert_eq!(parse_degrees("longitude", " -9.0 ").ok(), Some(-9.0));
    }

    #[test]
    fn parse_degrees_does_not_range_check() {
        assert_eq!(parse_degrees("latitude", "123.0").ok(), Some(123.0));
    }

    #[test]
    fn parse_degrees_reports_field() {
        let err = parse_degrees("longitude", "east").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidCoordinate { field: "longitude", .. }
        ));
    }

    #[tokio::test]
    async fn blank_city_is_rejected_before_any_request() {
        let geocoder = NominatimGeocoder::new(Client::new(), "http://127.0.0.1:9/search".into());
        let err = geocoder.resolve("   ").await.unwrap_err();

        assert!(matches!(err, Error::EmptyQuery));
    }
}
