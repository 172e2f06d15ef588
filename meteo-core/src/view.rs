//! Display-ready view of one dashboard query.
//!
//! Everything here is a pure function of its inputs: the same city,
//! coordinates and snapshot always produce the same [`ViewModel`]. Hosts
//! decide how to draw it (terminal text, JSON, a web page).

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    classify::indicator,
    model::{Coordinates, CurrentWeather, EnvironmentSnapshot, Indicator, PollutantKind},
};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub map_zoom: u8,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            map_zoom: crate::config::DEFAULT_MAP_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: Coordinates,
    /// The city name exactly as the user typed it.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub marker: Marker,
}

impl MapView {
    /// OpenStreetMap link showing the marker, for hosts that cannot draw a map.
    pub fn osm_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat:.5}&mlon={lon:.5}#map={zoom}/{lat:.5}/{lon:.5}",
            lat = self.center.latitude,
            lon = self.center.longitude,
            zoom = self.zoom,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionsPanel {
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
}

impl ConditionsPanel {
    pub fn from_weather(current: &CurrentWeather) -> Self {
        Self {
            temperature: with_unit(current.temperature_c, "°C"),
            humidity: with_unit(current.humidity_pct, "%"),
            wind_speed: with_unit(current.wind_speed_kmh, " km/h"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantReading {
    pub kind: PollutantKind,
    pub label: String,
    pub value: Option<f64>,
    /// `value` with its unit, or `N/A`.
    pub display: String,
    pub indicator: Indicator,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartColumn {
    pub kind: PollutantKind,
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// Timestamp-indexed table shared by every chart view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTable {
    pub timestamps: Vec<NaiveDateTime>,
    pub columns: Vec<ChartColumn>,
}

impl ChartTable {
    pub fn row_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn column(&self, kind: PollutantKind) -> Option<&ChartColumn> {
        self.columns.iter().find(|c| c.kind == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Area,
    Bar,
    Line,
}

/// A chart is only a selection of columns from the shared [`ChartTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartView {
    pub kind: ChartKind,
    pub title: String,
    pub series: Vec<PollutantKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub city: String,
    pub map: MapView,
    pub conditions: ConditionsPanel,
    pub pollutants: Vec<PollutantReading>,
    pub table: ChartTable,
    pub charts: Vec<ChartView>,
}

pub fn build_view(
    city: &str,
    coords: Coordinates,
    snapshot: &EnvironmentSnapshot,
    settings: &ViewSettings,
) -> ViewModel {
    let hourly = &snapshot.hourly;

    let pollutants = PollutantKind::all()
        .iter()
        .map(|&kind| {
            let value = hourly.latest(kind);
            PollutantReading {
                kind,
                label: kind.label().to_string(),
                value,
                display: with_unit(value, &format!(" {}", kind.unit())),
                indicator: indicator(value, kind),
            }
        })
        .collect();

    let table = ChartTable {
        timestamps: hourly.time().to_vec(),
        columns: PollutantKind::all()
            .iter()
            .map(|&kind| ChartColumn {
                kind,
                label: kind.column_label().to_string(),
                values: hourly.series(kind).to_vec(),
            })
            .collect(),
    };

    ViewModel {
        city: city.to_string(),
        map: MapView {
            center: coords,
            zoom: settings.map_zoom,
            marker: Marker {
                position: coords,
                label: city.to_string(),
            },
        },
        conditions: ConditionsPanel::from_weather(&snapshot.current),
        pollutants,
        table,
        charts: chart_views(),
    }
}

fn chart_views() -> Vec<ChartView> {
    use PollutantKind::*;

    vec![
        ChartView {
            kind: ChartKind::Area,
            title: "PM10 and PM2.5".to_string(),
            series: vec![Pm10, Pm2_5],
        },
        ChartView {
            kind: ChartKind::Bar,
            title: "CO and ozone".to_string(),
            series: vec![CarbonMonoxide, Ozone],
        },
        ChartView {
            kind: ChartKind::Line,
            title: "All pollutants".to_string(),
            series: vec![Pm10, Pm2_5, CarbonMonoxide, Ozone],
        },
    ]
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v}{unit}"),
        None => NOT_AVAILABLE.to_string(),
    }
}
