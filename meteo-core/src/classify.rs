//! Health thresholds for pollutant readings.
//!
//! The table is a fixed policy: upper bounds are inclusive, so a reading
//! that sits exactly on a boundary falls into the better tier.

use crate::model::{Indicator, PollutantKind, SeverityTier};

/// Inclusive upper bounds of the good and moderate tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub good: f64,
    pub moderate: f64,
}

pub fn thresholds(kind: PollutantKind) -> Thresholds {
    match kind {
        PollutantKind::Pm10 => Thresholds {
            good: 50.0,
            moderate: 100.0,
        },
        PollutantKind::Pm2_5 => Thresholds {
            good: 35.0,
            moderate: 75.0,
        },
        PollutantKind::CarbonMonoxide => Thresholds {
            good: 1000.0,
            moderate: 2000.0,
        },
        PollutantKind::Ozone => Thresholds {
            good: 180.0,
            moderate: 240.0,
        },
    }
}

pub fn classify(value: f64, kind: PollutantKind) -> SeverityTier {
    if value.is_nan() {
        return SeverityTier::Unknown;
    }

    let t = thresholds(kind);
    if value <= t.good {
        SeverityTier::Good
    } else if value <= t.moderate {
        SeverityTier::Moderate
    } else {
        SeverityTier::Poor
    }
}

/// Classify by service variable name; names outside the table are `Unknown`.
pub fn classify_named(value: f64, key: &str) -> SeverityTier {
    PollutantKind::from_key(key)
        .map(|kind| classify(value, kind))
        .unwrap_or(SeverityTier::Unknown)
}

/// Classify a reading the upstream may have left empty.
pub fn classify_reading(value: Option<f64>, kind: PollutantKind) -> SeverityTier {
    value
        .map(|v| classify(v, kind))
        .unwrap_or(SeverityTier::Unknown)
}

pub fn indicator(value: Option<f64>, kind: PollutantKind) -> Indicator {
    let tier = classify_reading(value, kind);
    Indicator {
        tier,
        label: tier.as_str().to_string(),
    }
}
