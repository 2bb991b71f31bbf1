//! Configuration layer: typed settings with layered precedence (defaults → files).

use std::{collections::HashMap, num::NonZeroUsize, path::Path, str::FromStr};

use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::domain::error::GravatarError;

mod avatar;

pub use avatar::{
    AvatarConfig, ConfigSource, DEFAULT_GROUP, DEFAULT_SERVICE, DEFAULT_VIEW, GravatarSettings,
    RawAvatarConfig,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "gravatar";
const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub cache: CacheSettings,
    pub gravatar: GravatarSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub capacity: NonZeroUsize,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("invalid gravatar group `{group}`: {source}")]
    Group {
        group: String,
        #[source]
        source: GravatarError,
    },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings from `config/default`, then `gravatar`, then `config_file` when given.
///
/// The first two are optional and may use any format the `config` crate
/// recognises by extension; an explicit file must exist.
pub fn load(config_file: Option<&Path>) -> Result<Settings, LoadError> {
    let mut builder = base_builder();

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

impl Settings {
    /// Parse settings from an in-memory TOML document, without touching the filesystem.
    pub fn from_toml_str(source: &str) -> Result<Self, LoadError> {
        let raw: RawSettings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            cache,
            gravatar,
        } = raw;

        let logging = build_logging_settings(logging)?;
        let cache = build_cache_settings(cache)?;
        let gravatar = GravatarSettings::from_groups(gravatar)
            .map_err(|(group, source)| LoadError::Group { group, source })?;

        Ok(Self {
            logging,
            cache,
            gravatar,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logging: LoggingSettings {
                level: LevelFilter::INFO,
                format: LogFormat::Compact,
            },
            cache: CacheSettings {
                capacity: NonZeroUsize::new(DEFAULT_CACHE_CAPACITY)
                    .unwrap_or(NonZeroUsize::MIN),
            },
            gravatar: GravatarSettings::default(),
        }
    }
}

fn base_builder() -> ConfigBuilder<DefaultState> {
    Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false))
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let capacity = cache.capacity.unwrap_or(DEFAULT_CACHE_CAPACITY);
    let capacity = NonZeroUsize::new(capacity)
        .ok_or_else(|| LoadError::invalid("cache.capacity", "must be greater than zero"))?;

    Ok(CacheSettings { capacity })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    cache: RawCacheSettings,
    gravatar: HashMap<String, RawAvatarConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    capacity: Option<usize>,
}
