use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A resolved position on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Current conditions. `None` means the upstream did not report the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollutantKind {
    Pm10,
    Pm2_5,
    CarbonMonoxide,
    Ozone,
}

impl PollutantKind {
    /// Display order, also the order of chart table columns.
    pub const fn all() -> &'static [PollutantKind] {
        &[
            PollutantKind::Pm10,
            PollutantKind::Pm2_5,
            PollutantKind::CarbonMonoxide,
            PollutantKind::Ozone,
        ]
    }

    /// Variable name used by the air quality service.
    pub fn key(&self) -> &'static str {
        match self {
            PollutantKind::Pm10 => "pm10",
            PollutantKind::Pm2_5 => "pm2_5",
            PollutantKind::CarbonMonoxide => "carbon_monoxide",
            PollutantKind::Ozone => "ozone",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PollutantKind::Pm10 => "PM10",
            PollutantKind::Pm2_5 => "PM2.5",
            PollutantKind::CarbonMonoxide => "Carbon monoxide",
            PollutantKind::Ozone => "Ozone",
        }
    }

    /// All four are reported in µg/m³, CO at a larger scale.
    pub fn unit(&self) -> &'static str {
        "µg/m³"
    }

    pub fn column_label(&self) -> &'static str {
        match self {
            PollutantKind::Pm10 => "PM10 (µg/m³)",
            PollutantKind::Pm2_5 => "PM2.5 (µg/m³)",
            PollutantKind::CarbonMonoxide => "CO (µg/m³)",
            PollutantKind::Ozone => "Ozone (µg/m³)",
        }
    }

    /// Parse a service variable name. Unknown names yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.key() == key)
    }
}

impl fmt::Display for PollutantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Good,
    Moderate,
    Poor,
    Unknown,
}

impl SeverityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Good => "good",
            SeverityTier::Moderate => "moderate",
            SeverityTier::Poor => "poor",
            SeverityTier::Unknown => "unknown",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SeverityTier::Good => "green",
            SeverityTier::Moderate => "yellow",
            SeverityTier::Poor => "red",
            SeverityTier::Unknown => "gray",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a reading, decoupled from any markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub tier: SeverityTier,
    pub label: String,
}

/// Hourly air quality readings sharing one timestamp axis.
///
/// Index `i` of every series refers to `time[i]`. Built only through
/// [`HourlySeries::new`], which rejects series of unequal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlySeries {
    time: Vec<NaiveDateTime>,
    pm10: Vec<Option<f64>>,
    pm2_5: Vec<Option<f64>>,
    carbon_monoxide: Vec<Option<f64>>,
    ozone: Vec<Option<f64>>,
}

impl HourlySeries {
    pub fn new(
        time: Vec<NaiveDateTime>,
        pm10: Vec<Option<f64>>,
        pm2_5: Vec<Option<f64>>,
        carbon_monoxide: Vec<Option<f64>>,
        ozone: Vec<Option<f64>>,
    ) -> Result<Self> {
        let expected = time.len();
        for (kind, values) in [
            (PollutantKind::Pm10, &pm10),
            (PollutantKind::Pm2_5, &pm2_5),
            (PollutantKind::CarbonMonoxide, &carbon_monoxide),
            (PollutantKind::Ozone, &ozone),
        ] {
            if values.len() != expected {
                return Err(Error::SeriesLengthMismatch {
                    series: kind.key(),
                    expected,
                    actual: values.len(),
                });
            }
        }

        Ok(Self {
            time,
            pm10,
            pm2_5,
            carbon_monoxide,
            ozone,
        })
    }

    pub fn time(&self) -> &[NaiveDateTime] {
        &self.time
    }

    pub fn series(&self, kind: PollutantKind) -> &[Option<f64>] {
        match kind {
            PollutantKind::Pm10 => &self.pm10,
            PollutantKind::Pm2_5 => &self.pm2_5,
            PollutantKind::CarbonMonoxide => &self.carbon_monoxide,
            PollutantKind::Ozone => &self.ozone,
        }
    }

    /// First reading of the series, which the dashboard treats as "now".
    pub fn latest(&self, kind: PollutantKind) -> Option<f64> {
        self.series(kind).first().copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Everything fetched for one set of coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentSnapshot {
    pub current: CurrentWeather,
    pub hourly: HourlySeries,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hours(n: usize) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date");
        (0..n)
            .map(|i| start + chrono::Duration::hours(i as i64))
            .collect()
    }

    #[test]
    fn pollutant_key_roundtrip() {
        for kind in PollutantKind::all() {
            assert_eq!(PollutantKind::from_key(kind.key()), Some(*kind));
        }
        assert_eq!(PollutantKind::from_key("sulphur_dioxide"), None);
    }

    #[test]
    fn hourly_series_rejects_short_pollutant() {
        let err = HourlySeries::new(
            hours(3),
            vec![Some(1.0); 3],
            vec![Some(1.0); 3],
            vec![Some(1.0); 2],
            vec![Some(1.0); 3],
        )
        .unwrap_err();

        match err {
            Error::SeriesLengthMismatch {
                series,
                expected,
                actual,
            } => {
                assert_eq!(series, "carbon_monoxide");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn latest_is_first_reading() {
        let series = HourlySeries::new(
            hours(2),
            vec![Some(12.0), Some(30.0)],
            vec![None, Some(4.0)],
            vec![Some(200.0), Some(210.0)],
            vec![Some(60.0), Some(61.0)],
        )
        .expect("equal lengths");

        assert_eq!(series.len(), 2);
        assert_eq!(series.latest(PollutantKind::Pm10), Some(12.0));
        assert_eq!(series.latest(PollutantKind::Pm2_5), None);
    }

    #[test]
    fn empty_series_has_no_latest() {
        let series =
            HourlySeries::new(vec![], vec![], vec![], vec![], vec![]).expect("all empty");
        assert!(series.is_empty());
        assert_eq!(series.latest(PollutantKind::Ozone), None);
    }
}
