use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Upstream service a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Geocoding,
    Weather,
    AirQuality,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Geocoding => "geocoding",
            Service::Weather => "weather",
            Service::AirQuality => "air quality",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything that can stop a dashboard query.
///
/// The `Display` text is the message shown to the user; the fields carry
/// the detail that goes to the log.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Enter a city name to search for.")]
    EmptyQuery,

    #[error("City not found. Check the name and try again.")]
    NotFound { city: String },

    #[error("Request failed with status {}", .status.as_u16())]
    Status { service: Service, status: StatusCode },

    #[error("Could not reach the {service} service: {source}")]
    Transport {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response from the {service} service: {message}")]
    Decode { service: Service, message: String },

    #[error("Geocoding returned an invalid {field}: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },

    /// Weather and air quality are reported together; the message does not
    /// say which of the two failed.
    #[error("Unable to fetch data from the server.")]
    EnvironmentUnavailable {
        weather: Option<StatusCode>,
        air_quality: Option<StatusCode>,
    },

    #[error(
        "Air quality series have mismatched lengths ({series}: {actual}, expected {expected})"
    )]
    SeriesLengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl Error {
    /// True when the city could not be resolved, as opposed to a service failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Status code of the failing upstream call, if the failure was a status.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::EnvironmentUnavailable { weather, air_quality } => {
                let failed = |s: &StatusCode| !s.is_success();
                weather.filter(failed).or(air_quality.filter(failed))
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
