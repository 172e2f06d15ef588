use std::fmt::{self, Write};

use chrono::NaiveDateTime;
use meteo_core::{
    Error, SeverityTier, ViewModel,
    view::{ChartKind, ChartTable, ChartView, NOT_AVAILABLE},
};
use tabled::{builder::Builder, settings::Style};

/// Colored dot standing in for the severity tier.
pub fn dot(tier: SeverityTier) -> &'static str {
    match tier {
        SeverityTier::Good => "🟢",
        SeverityTier::Moderate => "🟡",
        SeverityTier::Poor => "🔴",
        SeverityTier::Unknown => "⚪",
    }
}

pub fn error_line(err: &Error) -> String {
    format!("❌ {err}")
}

pub fn json(view: &ViewModel) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// Terminal rendering of one query. Chart tables are folded away unless asked for.
pub fn text(view: &ViewModel, charts: bool) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_view(&mut out, view, charts);
    out
}

fn write_view(out: &mut impl Write, view: &ViewModel, charts: bool) -> fmt::Result {
    writeln!(out, "📍 {} ({})", view.map.marker.label, view.map.center)?;
    writeln!(out, "   {}", view.map.osm_url())?;
    writeln!(out)?;

    writeln!(out, "Current weather")?;
    writeln!(out, "  🌡️  Temperature: {}", view.conditions.temperature)?;
    writeln!(out, "  💧 Humidity: {}", view.conditions.humidity)?;
    writeln!(out, "  🌬️  Wind speed: {}", view.conditions.wind_speed)?;
    writeln!(out)?;

    writeln!(out, "Current air quality")?;
    for reading in &view.pollutants {
        writeln!(
            out,
            "  {} {}: {} ({})",
            dot(reading.indicator.tier),
            reading.label,
            reading.display,
            reading.indicator.label
        )?;
    }

    if charts {
        for chart in &view.charts {
            writeln!(out)?;
            writeln!(out, "{}", chart_title(chart))?;
            writeln!(out, "{}", chart_table(&view.table, chart))?;
        }
    } else if !view.table.timestamps.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "({} hourly readings, rerun with --charts to show them)",
            view.table.row_count()
        )?;
    }

    Ok(())
}

fn chart_title(chart: &ChartView) -> String {
    let kind = match chart.kind {
        ChartKind::Area => "Area",
        ChartKind::Bar => "Bar",
        ChartKind::Line => "Line",
    };
    format!("{kind} chart: {}", chart.title)
}

/// The chart's columns of the shared table, one row per hour.
fn chart_table(table: &ChartTable, chart: &ChartView) -> String {
    let columns: Vec<_> = chart
        .series
        .iter()
        .filter_map(|kind| table.column(*kind))
        .collect();

    let mut builder = Builder::default();

    let mut header = vec!["Timestamp".to_string()];
    header.extend(columns.iter().map(|c| c.label.clone()));
    builder.push_record(header);

    for (row, ts) in table.timestamps.iter().enumerate() {
        let mut record = vec![timestamp(ts)];
        record.extend(columns.iter().map(|c| cell(c.values.get(row).copied().flatten())));
        builder.push_record(record);
    }

    builder.build().with(Style::rounded()).to_string()
}

fn timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

fn cell(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use meteo_core::{
        Coordinates, CurrentWeather, EnvironmentSnapshot, HourlySeries, ViewSettings, build_view,
    };

    fn view(hours: usize) -> ViewModel {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date");
        let time = (0..hours)
            .map(|i| start + chrono::Duration::hours(i as i64))
            .collect();

        let snapshot = EnvironmentSnapshot {
            current: CurrentWeather {
                temperature_c: Some(18.0),
                humidity_pct: None,
                wind_speed_kmh: Some(5.5),
            },
            hourly: HourlySeries::new(
                time,
                vec![Some(20.0); hours],
                vec![Some(80.0); hours],
                vec![None; hours],
                vec![Some(200.0); hours],
            )
            .expect("equal lengths"),
        };

        build_view(
            "Milano",
            Coordinates::new(45.0, 9.0),
            &snapshot,
            &ViewSettings::default(),
        )
    }

    #[test]
    fn text_shows_conditions_and_dots() {
        let out = text(&view(3), false);

        assert!(out.contains("📍 Milano (45.0000, 9.0000)"));
        assert!(out.contains("Temperature: 18°C"));
        assert!(out.contains("Humidity: N/A"));
        assert!(out.contains("Wind speed: 5.5 km/h"));
        assert!(out.contains("🟢 PM10: 20 µg/m³ (good)"));
        assert!(out.contains("🔴 PM2.5: 80 µg/m³ (poor)"));
        assert!(out.contains("⚪ Carbon monoxide: N/A (unknown)"));
        assert!(out.contains("🟡 Ozone: 200 µg/m³ (moderate)"));
        assert!(out.contains("rerun with --charts"));
        assert!(!out.contains("Area chart"));
    }

    #[test]
    fn charts_render_selected_columns_only() {
        let out = text(&view(2), true);

        assert!(out.contains("Area chart: PM10 and PM2.5"));
        assert!(out.contains("Bar chart: CO and ozone"));
        assert!(out.contains("Line chart: All pollutants"));
        assert!(out.contains("2024-05-01 01:00"));

        let v = view(2);
        let area = chart_table(&v.table, &v.charts[0]);
        assert!(area.contains("PM10 (µg/m³)"));
        assert!(!area.contains("Ozone (µg/m³)"));
        assert_eq!(area.lines().filter(|l| l.contains("2024-05-01")).count(), 2);
    }

    #[test]
    fn write_view_feeds_any_writer() {
        let v = view(2);
        let mut out = String::new();

        write_view(&mut out, &v, true).expect("writes");
        assert_eq!(out, text(&v, true));
    }

    #[test]
    fn json_is_the_whole_view() {
        let out = json(&view(1)).expect("serializes");
        let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");

        assert_eq!(value["city"], "Milano");
        assert_eq!(value["pollutants"][1]["indicator"]["tier"], "poor");
        assert_eq!(value["charts"][1]["kind"], "bar");
        assert_eq!(value["table"]["timestamps"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn error_line_is_the_user_message() {
        let err = Error::NotFound {
            city: "Atlantis".into(),
        };
        assert_eq!(
            error_line(&err),
            "❌ City not found. Check the name and try again."
        );
    }
}
