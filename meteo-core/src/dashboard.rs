use tracing::info;

use crate::{
    Config,
    error::Result,
    provider::{EnvironmentSource, Geocoder, environment_from_config, geocoder_from_config},
    view::{ViewModel, ViewSettings, build_view},
};

/// One query in, one view out. Holds the upstream clients and nothing else,
/// so every call starts from scratch.
#[derive(Debug)]
pub struct Dashboard {
    geocoder: Box<dyn Geocoder>,
    environment: Box<dyn EnvironmentSource>,
    settings: ViewSettings,
}

impl Dashboard {
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        environment: Box<dyn EnvironmentSource>,
        settings: ViewSettings,
    ) -> Self {
        Self {
            geocoder,
            environment,
            settings,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            geocoder_from_config(config)?,
            environment_from_config(config)?,
            ViewSettings {
                map_zoom: config.map_zoom,
            },
        ))
    }

    /// Resolve `city`, fetch its conditions and build the view.
    ///
    /// Stops at the first failing step; nothing partial is returned.
    pub async fn render(&self, city: &str) -> Result<ViewModel> {
        info!(city, "dashboard query");

        let coords = self.geocoder.resolve(city).await?;
        let snapshot = self.environment.fetch(coords).await?;

        Ok(build_view(city, coords, &snapshot, &self.settings))
    }
}
