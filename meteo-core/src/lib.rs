//! Core library for the `meteo` dashboard.
//!
//! This crate defines:
//! - Configuration of upstream endpoints
//! - Geocoding and environment data clients behind small traits
//! - Air quality classification against fixed health thresholds
//! - The display-ready view model built for each query
//!
//! It is used by `meteo-cli`, but can also be reused by other hosts.

pub mod classify;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod provider;
pub mod view;

pub use classify::{classify, classify_named, indicator};
pub use config::{Config, Endpoints};
pub use dashboard::Dashboard;
pub use error::{Error, Service};
pub use model::{
    Coordinates, CurrentWeather, EnvironmentSnapshot, HourlySeries, Indicator, PollutantKind,
    SeverityTier,
};
pub use provider::{EnvironmentSource, Geocoder};
pub use view::{ViewModel, ViewSettings, build_view};
