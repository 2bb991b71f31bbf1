//! Typed values carried by an avatar configuration.

use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;
use std::str::FromStr;

use url::Url;

use super::error::GravatarError;

/// Content-suitability rating understood by the avatar service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rating {
    G,
    PG,
    R,
    X,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::G => "G",
            Self::PG => "PG",
            Self::R => "R",
            Self::X => "X",
        }
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = GravatarError;

    /// Parses case-insensitively, so `"pg"` yields [`Rating::PG`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "G" => Ok(Self::G),
            "PG" => Ok(Self::PG),
            "R" => Ok(Self::R),
            "X" => Ok(Self::X),
            _ => Err(GravatarError::invalid_rating(s)),
        }
    }
}

/// Generated fallback styles offered by the service when no avatar is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultIcon {
    /// Respond with HTTP 404 instead of an image.
    NotFound,
    /// Mystery-man silhouette; does not vary by email.
    MysteryMan,
    Identicon,
    MonsterId,
    Wavatar,
}

impl DefaultIcon {
    pub const ALL: [DefaultIcon; 5] = [
        Self::NotFound,
        Self::MysteryMan,
        Self::Identicon,
        Self::MonsterId,
        Self::Wavatar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "404",
            Self::MysteryMan => "mm",
            Self::Identicon => "identicon",
            Self::MonsterId => "monsterid",
            Self::Wavatar => "wavatar",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.as_str() == name)
    }
}

/// Fallback used by the service when the identifier has no registered avatar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DefaultImage {
    Icon(DefaultIcon),
    /// Absolute http(s) URL, kept exactly as supplied after trimming.
    Url(String),
}

impl DefaultImage {
    /// Value as it appears in the `d` query parameter.
    pub fn query_value(&self) -> String {
        match self {
            Self::Icon(icon) => icon.as_str().to_string(),
            Self::Url(url) => {
                url::form_urlencoded::byte_serialize(url.as_bytes()).collect()
            }
        }
    }
}

impl Display for DefaultImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Icon(icon) => f.write_str(icon.as_str()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

impl FromStr for DefaultImage {
    type Err = GravatarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if let Some(icon) = DefaultIcon::from_name(value) {
            return Ok(Self::Icon(icon));
        }

        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                Ok(Self::Url(value.to_string()))
            }
            _ => Err(GravatarError::invalid_default_image(s)),
        }
    }
}

/// Edge length of the square avatar, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AvatarSize(NonZeroU32);

impl AvatarSize {
    pub const DEFAULT: AvatarSize = match NonZeroU32::new(80) {
        Some(size) => AvatarSize(size),
        None => panic!("default avatar size must be non-zero"),
    };

    pub fn new(size: u32) -> Result<Self, GravatarError> {
        NonZeroU32::new(size)
            .map(Self)
            .ok_or(GravatarError::InvalidSize { size })
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Display for AvatarSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
