//! Gravatar URL building and view rendering.
//!
//! ```no_run
//! use gravatar_view::{AskamaViews, ConfigSource, Gravatar, Settings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::from_toml_str(
//!     r#"
//!     [gravatar.default]
//!     alt = "Gravatar for {$email}"
//!     default_image = "identicon"
//!     "#,
//! )?;
//!
//! let mut avatar = Gravatar::configure(&settings.gravatar, "test@example.com", &ConfigSource::Default)?;
//! avatar.with_size(48)?;
//! let html = avatar.to_display_string(&AskamaViews)?;
//! # let _ = html;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;

pub use application::Gravatar;
pub use cache::GravatarCache;
pub use config::{AvatarConfig, ConfigSource, RawAvatarConfig, Settings};
pub use domain::error::GravatarError;
pub use domain::types::{AvatarSize, DefaultIcon, DefaultImage, Rating};
pub use presentation::{AskamaViews, AvatarRenderData, ViewError, ViewRenderer};
