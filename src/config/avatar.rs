//! Avatar configuration groups and their merge rules.

use std::collections::HashMap;

use serde::Deserialize;
use url::Url;

use crate::domain::error::GravatarError;
use crate::domain::types::{AvatarSize, DefaultImage, Rating};

/// Name of the group every other group is merged over.
pub const DEFAULT_GROUP: &str = "default";
pub const DEFAULT_SERVICE: &str = "https://www.gravatar.com/avatar/";
pub const DEFAULT_VIEW: &str = "gravatar/image";

/// Fully-resolved configuration for a single avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarConfig {
    /// Base URL of the avatar service, emitted verbatim in front of the query.
    pub service: String,
    pub size: AvatarSize,
    pub rating: Rating,
    pub default_image: Option<DefaultImage>,
    /// Alt text template with `{$email}`, `{$size}` and `{$rating}` placeholders.
    pub alt: Option<String>,
    /// Identifier of the view used when rendering without an explicit one.
    pub view: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            size: AvatarSize::DEFAULT,
            rating: Rating::G,
            default_image: None,
            alt: None,
            view: DEFAULT_VIEW.to_string(),
        }
    }
}

/// Partial configuration as written in settings files or passed per call.
///
/// Unset fields inherit from the configuration it is merged over. An empty
/// `default_image` or `alt` clears the inherited value.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct RawAvatarConfig {
    pub service: Option<String>,
    pub size: Option<u32>,
    pub rating: Option<String>,
    pub default_image: Option<String>,
    pub alt: Option<String>,
    pub view: Option<String>,
}

impl RawAvatarConfig {
    /// Merge these values over `base`, validating every field that is set.
    pub fn merge_over(&self, base: &AvatarConfig) -> Result<AvatarConfig, GravatarError> {
        let mut merged = base.clone();

        if let Some(service) = self.service.as_deref() {
            merged.service = validate_service(service)?;
        }
        if let Some(size) = self.size {
            merged.size = AvatarSize::new(size)?;
        }
        if let Some(rating) = self.rating.as_deref() {
            merged.rating = rating.parse()?;
        }
        if let Some(default_image) = self.default_image.as_deref() {
            merged.default_image = if default_image.trim().is_empty() {
                None
            } else {
                Some(default_image.parse()?)
            };
        }
        if let Some(alt) = self.alt.as_ref() {
            merged.alt = (!alt.is_empty()).then(|| alt.clone());
        }
        if let Some(view) = self.view.as_deref() {
            let view = view.trim();
            if view.is_empty() {
                return Err(GravatarError::InvalidView);
            }
            merged.view = view.to_string();
        }

        Ok(merged)
    }
}

fn validate_service(value: &str) -> Result<String, GravatarError> {
    let trimmed = value.trim();
    let url = Url::parse(trimmed).map_err(|err| GravatarError::InvalidService {
        value: value.to_string(),
        reason: err.to_string(),
    })?;
    if !url.has_host() {
        return Err(GravatarError::InvalidService {
            value: value.to_string(),
            reason: "url must include a host".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Where a builder takes its configuration from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ConfigSource {
    /// The `default` group.
    #[default]
    Default,
    /// A named group, merged over `default` when settings were loaded.
    Group(String),
    /// Explicit values merged over the `default` group.
    Explicit(RawAvatarConfig),
}

impl ConfigSource {
    pub fn group(name: impl Into<String>) -> Self {
        Self::Group(name.into())
    }
}

impl From<RawAvatarConfig> for ConfigSource {
    fn from(raw: RawAvatarConfig) -> Self {
        Self::Explicit(raw)
    }
}

/// Named avatar configuration groups, each already merged over `default`.
#[derive(Debug, Clone, Default)]
pub struct GravatarSettings {
    default: AvatarConfig,
    groups: HashMap<String, AvatarConfig>,
}

impl GravatarSettings {
    /// Resolve raw groups from a settings file.
    ///
    /// The `default` group is merged over the built-in defaults and every
    /// other group over the result. Fails on the first invalid group.
    pub fn from_groups(
        mut raw: HashMap<String, RawAvatarConfig>,
    ) -> Result<Self, (String, GravatarError)> {
        let default = match raw.remove(DEFAULT_GROUP) {
            Some(group) => group
                .merge_over(&AvatarConfig::default())
                .map_err(|err| (DEFAULT_GROUP.to_string(), err))?,
            None => AvatarConfig::default(),
        };

        let mut groups = HashMap::with_capacity(raw.len());
        for (name, group) in raw {
            let resolved = group.merge_over(&default).map_err(|err| (name.clone(), err))?;
            groups.insert(name, resolved);
        }

        Ok(Self { default, groups })
    }

    pub fn default_config(&self) -> &AvatarConfig {
        &self.default
    }

    pub fn group(&self, name: &str) -> Result<&AvatarConfig, GravatarError> {
        if name == DEFAULT_GROUP {
            return Ok(&self.default);
        }
        self.groups
            .get(name)
            .ok_or_else(|| GravatarError::config_not_found(name))
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(DEFAULT_GROUP).chain(self.groups.keys().map(String::as_str))
    }

    pub fn resolve(&self, source: &ConfigSource) -> Result<AvatarConfig, GravatarError> {
        match source {
            ConfigSource::Default => Ok(self.default.clone()),
            ConfigSource::Group(name) => self.group(name).cloned(),
            ConfigSource::Explicit(raw) => raw.merge_over(&self.default),
        }
    }
}
