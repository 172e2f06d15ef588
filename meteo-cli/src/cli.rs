use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{InquireError, Text};
use meteo_core::{Config, Dashboard};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "City weather and air quality dashboard")]
pub struct Cli {
    /// Read settings from this file instead of the platform config dir.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug details (request URLs, statuses) to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask for city names one after another (the default).
    Interactive {
        /// Show the hourly chart tables under each result.
        #[arg(long)]
        charts: bool,
    },

    /// Show the dashboard for a single city.
    Show {
        /// City or place name, as you would type it in a map search.
        city: String,

        /// Show the hourly chart tables.
        #[arg(long)]
        charts: bool,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Print the config file location and the settings in effect.
    Config,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        tracing::debug!(?config, "configuration loaded");

        match self.command.unwrap_or(Command::Interactive { charts: false }) {
            Command::Interactive { charts } => {
                let dashboard = Dashboard::from_config(&config)?;
                interactive(&dashboard, charts).await
            }
            Command::Show {
                city,
                charts,
                format,
            } => {
                let dashboard = Dashboard::from_config(&config)?;
                match dashboard.render(&city).await {
                    Ok(view) => {
                        match format {
                            Format::Text => print!("{}", render::text(&view, charts)),
                            Format::Json => println!("{}", render::json(&view)?),
                        }
                        Ok(())
                    }
                    Err(e) => {
                        tracing::debug!(status = ?e.status(), "query failed");
                        eprintln!("{}", render::error_line(&e));
                        std::process::exit(if e.is_not_found() { 2 } else { 1 });
                    }
                }
            }
            Command::Config => {
                match &self.config {
                    Some(path) => println!("# {}", path.display()),
                    None => println!("# {}", Config::config_file_path()?.display()),
                }
                print!("{}", config.to_toml()?);
                Ok(())
            }
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load().context("Failed to load configuration"),
        }
    }
}

/// Prompt, render, repeat. A failed query prints its message and the
/// prompt comes back; an empty answer or Esc ends the session.
async fn interactive(dashboard: &Dashboard, charts: bool) -> anyhow::Result<()> {
    loop {
        let city = match Text::new("City name:").prompt() {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city name"),
        };

        if city.trim().is_empty() {
            break;
        }

        println!("{}", answer(dashboard, &city, charts).await);
    }

    Ok(())
}

/// One prompt's worth of output: the rendered view, or the error line.
async fn answer(dashboard: &Dashboard, city: &str, charts: bool) -> String {
    match dashboard.render(city).await {
        Ok(view) => render::text(&view, charts),
        Err(e) => {
            tracing::debug!(status = ?e.status(), "query failed");
            render::error_line(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use meteo_core::{
        Coordinates, CurrentWeather, EnvironmentSnapshot, EnvironmentSource, Error, Geocoder,
        HourlySeries, ViewSettings,
    };

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["meteo"]).expect("parses");
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn show_takes_city_and_options() {
        let cli = Cli::try_parse_from(["meteo", "show", "Milano", "--charts", "--format", "json"])
            .expect("parses");

        match cli.command {
            Some(Command::Show {
                city,
                charts,
                format,
            }) => {
                assert_eq!(city, "Milano");
                assert!(charts);
                assert_eq!(format, Format::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["meteo", "show", "Roma", "-v", "--config", "/tmp/m.toml"])
            .expect("parses");

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.toml")));
    }

    #[test]
    fn show_requires_a_city() {
        assert!(Cli::try_parse_from(["meteo", "show"]).is_err());
    }

    #[derive(Debug)]
    struct KnownCities;

    #[async_trait]
    impl Geocoder for KnownCities {
        async fn resolve(&self, city: &str) -> meteo_core::error::Result<Coordinates> {
            match city {
                "Milano" => Ok(Coordinates::new(45.0, 9.0)),
                other => Err(Error::NotFound {
                    city: other.to_string(),
                }),
            }
        }
    }

    #[derive(Debug)]
    struct OneHour;

    #[async_trait]
    impl EnvironmentSource for OneHour {
        async fn fetch(&self, _coords: Coordinates) -> meteo_core::error::Result<EnvironmentSnapshot> {
            let time = NaiveDate::from_ymd_opt(2024, 5, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .into_iter()
                .collect();

            Ok(EnvironmentSnapshot {
                current: CurrentWeather {
                    temperature_c: Some(17.0),
                    humidity_pct: Some(60.0),
                    wind_speed_kmh: Some(4.0),
                },
                hourly: HourlySeries::new(
                    time,
                    vec![Some(20.0)],
                    vec![Some(10.0)],
                    vec![Some(300.0)],
                    vec![Some(90.0)],
                )?,
            })
        }
    }

    #[tokio::test]
    async fn failed_query_does_not_end_the_session() {
        let dashboard = Dashboard::new(
            Box::new(KnownCities),
            Box::new(OneHour),
            ViewSettings::default(),
        );

        let first = answer(&dashboard, "Atlantis", false).await;
        let second = answer(&dashboard, "Milano", false).await;

        assert_eq!(first, "❌ City not found. Check the name and try again.");
        assert!(second.starts_with("📍 Milano (45.0000, 9.0000)"));
        assert!(second.contains("Temperature: 17°C"));
        assert!(second.contains("🟢 PM10: 20 µg/m³ (good)"));
    }
}
