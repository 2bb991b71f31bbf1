use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GravatarError {
    #[error("gravatar configuration group `{group}` not found")]
    ConfigNotFound { group: String },
    #[error("the rating value `{rating}` is not valid, use G, PG, R or X")]
    InvalidRating { rating: String },
    #[error("the default image `{value}` is neither a known icon nor a valid url")]
    InvalidDefaultImage { value: String },
    #[error("avatar size must be greater than zero, got {size}")]
    InvalidSize { size: u32 },
    #[error("invalid gravatar service url `{value}`: {reason}")]
    InvalidService { value: String, reason: String },
    #[error("view name must not be empty")]
    InvalidView,
}

impl GravatarError {
    pub fn config_not_found(group: impl Into<String>) -> Self {
        Self::ConfigNotFound {
            group: group.into(),
        }
    }

    pub fn invalid_rating(rating: impl Into<String>) -> Self {
        Self::InvalidRating {
            rating: rating.into(),
        }
    }

    pub fn invalid_default_image(value: impl Into<String>) -> Self {
        Self::InvalidDefaultImage {
            value: value.into(),
        }
    }
}
