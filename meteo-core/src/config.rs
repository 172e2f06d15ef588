use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_USER_AGENT: &str = concat!(
    "meteo-cli/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/meteo-cli/meteo)"
);

pub const DEFAULT_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";
pub const DEFAULT_MAP_ZOOM: u8 = 10;

/// Base URLs of the three upstream services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding: String,
    pub weather: String,
    pub air_quality: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: DEFAULT_GEOCODING_URL.to_string(),
            weather: DEFAULT_WEATHER_URL.to_string(),
            air_quality: DEFAULT_AIR_QUALITY_URL.to_string(),
        }
    }
}

/// Optional settings file. Every field falls back to its default.
///
/// Example TOML:
/// user_agent = "my-dashboard/1.0 (me@example.com)"
/// map_zoom = 12
///
/// [endpoints]
/// geocoding = "https://nominatim.openstreetmap.org/search"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sent to the geocoding service, whose usage policy requires a client identifier.
    pub user_agent: String,
    pub map_zoom: u8,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            map_zoom: DEFAULT_MAP_ZOOM,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config dir, or defaults if there is no file.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo-cli", "meteo")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(anyhow!(
                "user_agent must not be empty.\n\
                 Hint: the geocoding service rejects anonymous clients."
            ));
        }

        for (name, url) in [
            ("geocoding", &self.endpoints.geocoding),
            ("weather", &self.endpoints.weather),
            ("air_quality", &self.endpoints.air_quality),
        ] {
            reqwest::Url::parse(url)
                .with_context(|| format!("endpoints.{name} is not a valid URL: {url}"))?;
        }

        Ok(())
    }
}
