// SPDX-License-Identifier: LGPL-3.0-only

//! # Cache Configuration
//!
//! [CacheConfig] sizes the [VectorCache](crate::cache::VectorCache) and picks
//! the path key policy. It can be built in code, read from a TOML file or
//! taken from the environment.
//!
//! ## TOML
//!
//! ```toml
//! [cache]
//! capacity = 20000
//! rotation_sensitive_paths = false
//! ```
//!
//! ## Environment Variables
//!
//! - `MAPRENDER_CACHE_CONFIG`: path to a TOML configuration file
//! - `MAPRENDER_CACHE_CAPACITY`: path store capacity, overrides the file
//! - `MAPRENDER_ROTATION_SENSITIVE_PATHS`: `true`/`false` (also `1`, `yes`,
//!   `on`, `enable` and their negations), overrides the file

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{CacheError, CacheResult};

/// Default capacity of the path store.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Environment variable holding a configuration file path.
pub const CONFIG_PATH_ENV: &str = "MAPRENDER_CACHE_CONFIG";
/// Environment variable overriding the capacity.
pub const CAPACITY_ENV: &str = "MAPRENDER_CACHE_CAPACITY";
/// Environment variable overriding the path key rotation policy.
pub const ROTATION_SENSITIVE_PATHS_ENV: &str = "MAPRENDER_ROTATION_SENSITIVE_PATHS";

/// Configuration of a [VectorCache](crate::cache::VectorCache).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached paths. The viewport store holds
    /// `max(1, capacity / 100)` rectangles.
    pub capacity: usize,
    /// Whether the viewport rotation is part of the path key. If `false`,
    /// views that only differ in rotation but share an extent reuse paths.
    pub rotation_sensitive_paths: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            rotation_sensitive_paths: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    cache: CacheConfig,
}

impl CacheConfig {
    /// Create a configuration with default settings.
    ///
    /// ```rust
    /// use maprender_core::config::CacheConfig;
    ///
    /// let config = CacheConfig::new();
    /// assert_eq!(config.capacity, 10_000);
    /// assert_eq!(config.viewport_capacity(), 100);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path store capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set whether the viewport rotation is part of the path key.
    pub fn with_rotation_sensitive_paths(mut self, sensitive: bool) -> Self {
        self.rotation_sensitive_paths = sensitive;
        self
    }

    /// Capacity of the viewport rectangle store.
    pub fn viewport_capacity(&self) -> usize {
        (self.capacity / 100).max(1)
    }

    /// Check that the configuration can build a cache.
    pub fn validate(&self) -> CacheResult<()> {
        if self.capacity == 0 {
            return Err(CacheError::invalid_capacity(self.capacity));
        }
        Ok(())
    }

    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> CacheResult<Self> {
        let path = path.as_ref();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            return Err(CacheError::unsupported_format(path));
        }

        let content = fs::read_to_string(path).map_err(|err| CacheError::config_io(path, err))?;
        Self::from_toml(&content)
    }

    /// Load the configuration from the `[cache]` table of TOML content.
    ///
    /// Missing keys keep their defaults.
    ///
    /// ```rust
    /// use maprender_core::config::CacheConfig;
    ///
    /// let config = CacheConfig::from_toml(r#"
    /// [cache]
    /// capacity = 500
    /// "#).unwrap();
    ///
    /// assert_eq!(config.capacity, 500);
    /// assert_eq!(config.viewport_capacity(), 5);
    /// assert!(config.rotation_sensitive_paths);
    /// ```
    pub fn from_toml(content: &str) -> CacheResult<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        file.cache.validate()?;
        Ok(file.cache)
    }

    /// Create a configuration from environment variables or use defaults.
    ///
    /// Unreadable files and invalid values are logged and ignored.
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();

        if let Some(path) = lookup(CONFIG_PATH_ENV) {
            match Self::from_file(&path) {
                Ok(file_config) => {
                    log::info!("{}={} loaded", CONFIG_PATH_ENV, path);
                    config = file_config;
                },
                Err(err) => log::warn!("{}={} ignored: {}", CONFIG_PATH_ENV, path, err),
            }
        }

        if let Some(value) = lookup(CAPACITY_ENV) {
            match value.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => {
                    log::info!("{}={} detected", CAPACITY_ENV, capacity);
                    config.capacity = capacity;
                },
                _ => log::warn!(
                    "{}={} ignored (expected a positive integer)",
                    CAPACITY_ENV,
                    value
                ),
            }
        }

        if let Some(value) = lookup(ROTATION_SENSITIVE_PATHS_ENV) {
            match parse_flag(&value) {
                Some(sensitive) => {
                    log::info!("{}={} detected", ROTATION_SENSITIVE_PATHS_ENV, value);
                    config.rotation_sensitive_paths = sensitive;
                },
                None => log::warn!(
                    "{}={} ignored (expected: true, 1, yes, on, enable or false, 0, no, off, disable)",
                    ROTATION_SENSITIVE_PATHS_ENV,
                    value
                ),
            }
        }

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enable" => Some(true),
        "false" | "0" | "no" | "off" | "disable" => Some(false),
        _ => None,
    }
}
