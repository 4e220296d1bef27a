//! ConfigLoader: layers defaults, an optional file, and the environment.

use super::SidebarConfig;
use crate::error::ApiError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ApiError> {
        let defaults = Config::try_from(&SidebarConfig::default())?;
        Ok(Config::builder().add_source(defaults))
    }

    fn environment() -> Environment {
        Environment::with_prefix("CANOPY")
            .separator("__")
            .try_parsing(true)
    }

    /// Defaults overlaid with the environment.
    pub fn load() -> Result<SidebarConfig, ApiError> {
        let config = Self::builder_with_defaults()?
            .add_source(Self::environment())
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Defaults, then `path` (must exist), then the environment.
    pub fn load_from_file(path: &Path) -> Result<SidebarConfig, ApiError> {
        let config = Self::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(Self::environment())
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// `load_from_file` when a path is given, `load` otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<SidebarConfig, ApiError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }
}
