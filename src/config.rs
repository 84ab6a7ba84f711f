//! Generator configuration
//!
//! Generation parameters can be loaded from a RON file; anything the file
//! leaves out falls back to the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::generation::RoomBounds;
use crate::world::grid::MIN_DIMENSION;

/// Feature quota used when the requested one is zero
pub const DEFAULT_FEATURE_QUOTA: u32 = 10;

/// Errors raised while loading or saving a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Parameters for one dungeon generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Grid width in cells (at least 3)
    pub width: i32,
    /// Grid height in cells (at least 3)
    pub height: i32,
    /// Number of rooms and corridors to place, seed room included
    pub features: u32,
    /// Largest room the generator will try
    pub room_bounds: RoomBounds,
    pub max_corridor_length: i32,
    /// Percent chance (0-100) that a new feature is a room rather than a corridor
    pub room_chance: i32,
    /// Placement attempts before giving up on the quota
    pub max_attempts: u32,
    /// Random probes per attempt when searching for a connection point
    pub max_probes: u32,
    /// Fresh draws allowed for the seed room before carrying on without it
    pub seed_room_tries: u32,
    /// Wall-clock budget for the placement loop, in milliseconds
    pub time_limit_ms: Option<u64>,
    /// Fixed seed; a random one is used when absent
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 60,
            features: 50,
            room_bounds: RoomBounds::default(),
            max_corridor_length: 10,
            room_chance: 50,
            max_attempts: 1000,
            max_probes: 1000,
            seed_room_tries: 100,
            time_limit_ms: None,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Config for a given size and quota, everything else default
    pub fn new(width: i32, height: i32, features: u32) -> Self {
        Self {
            width,
            height,
            features,
            ..Self::default()
        }
    }

    /// Copy with out-of-range sizes and quota replaced by their fallbacks
    pub fn normalized(&self) -> Self {
        let features = if self.features < 1 {
            DEFAULT_FEATURE_QUOTA
        } else {
            self.features
        };
        Self {
            width: self.width.max(MIN_DIMENSION),
            height: self.height.max(MIN_DIMENSION),
            features,
            ..self.clone()
        }
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Reject values the generator cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width.checked_mul(self.height).is_none() {
            return Err(ConfigError::Invalid(format!(
                "{}x{} grid has too many cells",
                self.width, self.height
            )));
        }
        if !(0..=100).contains(&self.room_chance) {
            return Err(ConfigError::Invalid(format!(
                "room_chance must be within 0..=100, got {}",
                self.room_chance
            )));
        }
        if self.max_probes == 0 {
            return Err(ConfigError::Invalid("max_probes must be at least 1".into()));
        }
        if self.room_bounds.max_width < 1 || self.room_bounds.max_height < 1 {
            return Err(ConfigError::Invalid(format!(
                "room bounds must be positive, got {}x{}",
                self.room_bounds.max_width, self.room_bounds.max_height
            )));
        }
        if self.max_corridor_length < 1 {
            return Err(ConfigError::Invalid(format!(
                "max_corridor_length must be positive, got {}",
                self.max_corridor_length
            )));
        }
        Ok(())
    }

    /// Parse and validate a RON document
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load a config from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&content)
    }

    /// Load a config from a RON file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Failed to load {}: {}. Using defaults.", path.display(), e);
            Self::default()
        })
    }

    /// Write this config as pretty RON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_ron()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
