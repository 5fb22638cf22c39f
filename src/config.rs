//! Engine tuning knobs, loadable from TOML.
//!
//! Every key is optional. Values are clamped into workable ranges when the
//! raw file is resolved, so a bad value degrades instead of failing startup.

use crate::cache::CachePolicy;
use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Permits for concurrent parse/analysis work.
    pub parse_parallelism: usize,
    pub prepared_cache_capacity: usize,
    pub screen_cache_capacity: usize,
    pub cache_policy: CachePolicy,
    /// How close to the end of a list a visible item must be to fetch the next page.
    pub prefetch_distance: usize,
    pub default_page_size: u32,
    /// Containers with more children than this are prepared in the medium tier.
    pub medium_child_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(RawConfig::default())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    parse_parallelism: usize,
    prepared_cache_capacity: usize,
    screen_cache_capacity: usize,
    cache_policy: CachePolicy,
    prefetch_distance: usize,
    default_page_size: u32,
    medium_child_threshold: usize,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            parse_parallelism: 2,
            prepared_cache_capacity: 512,
            screen_cache_capacity: 32,
            cache_policy: CachePolicy::Lru,
            prefetch_distance: 3,
            default_page_size: 20,
            medium_child_threshold: 10,
        }
    }
}

impl From<RawConfig> for EngineConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            parse_parallelism: raw.parse_parallelism.clamp(1, 64),
            prepared_cache_capacity: raw.prepared_cache_capacity.max(1),
            screen_cache_capacity: raw.screen_cache_capacity.max(1),
            cache_policy: raw.cache_policy,
            prefetch_distance: raw.prefetch_distance,
            default_page_size: raw.default_page_size.clamp(1, 1000),
            medium_child_threshold: raw.medium_child_threshold,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Toml(e.to_string()))?;
        Ok(Self::from(raw))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` if it exists, falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        Self::from_file(path).unwrap_or_else(|e| {
            warn!("{e}; falling back to default engine config");
            Self::default()
        })
    }
}
