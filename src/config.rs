//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsworld/rsworld.toml`
//! 3. Environment variables: `RSWORLD_*` prefix

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::World;

pub const DEFAULT_WORLDS_DIR: &str = "data/worlds";
pub const DEFAULT_WORLD_NAME: &str = World::DEFAULT_NAME;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory scanned for world documents by `rsworld list`
    pub worlds_dir: PathBuf,
    /// Name given to a world created without an explicit name
    pub default_world_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            worlds_dir: PathBuf::from(DEFAULT_WORLDS_DIR),
            default_world_name: DEFAULT_WORLD_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("worlds_dir", DEFAULT_WORLDS_DIR)?
            .set_default("default_world_name", DEFAULT_WORLD_NAME)?;

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                builder = builder.add_source(File::from(path));
            }
        }

        builder = builder.add_source(Environment::with_prefix("RSWORLD"));
        builder.build()?.try_deserialize()
    }

    /// Location of the global config file, if a home directory exists.
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "rsworld").map(|dirs| dirs.config_dir().join("rsworld.toml"))
    }

    /// Render the effective settings as TOML, as they would appear in
    /// the global config file.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_compiled_in() {
        let settings = Settings::default();
        assert_eq!(settings.worlds_dir, PathBuf::from("data/worlds"));
        assert_eq!(settings.default_world_name, "World");
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let settings = Settings::default();
        let rendered = settings.to_toml();
        let parsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, settings);
    }
}
