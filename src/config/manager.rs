use super::{
    geometry::GeometryConfig, objectives::ObjectivesConfig, search::SearchConfig,
    storage::StorageConfig, traits::ConfigSection,
};
use crate::error::SearchError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `ANTENNA__SEARCH__POPULATION_SIZE=24`.
pub const ENV_PREFIX: &str = "ANTENNA";

/// Immutable run configuration handed to the search engine at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub objectives: ObjectivesConfig,
    pub geometry: GeometryConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        self.search.validate()?;
        self.objectives.validate()?;
        self.geometry.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Loads a TOML file, applies environment overrides, then validates.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SearchError> {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());
        Self::build(Config::builder().add_source(File::from(path).format(FileFormat::Toml)))
    }

    /// Same as [`AppConfig::load_from_file`] for an in-memory TOML document.
    pub fn load_from_str(contents: &str) -> Result<Self, SearchError> {
        Self::build(Config::builder().add_source(File::from_str(contents, FileFormat::Toml)))
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, SearchError> {
        let config: AppConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SearchError> {
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}
