//! Avatar reference builder.
//!
//! A [`Gravatar`] pairs an email address with a resolved [`AvatarConfig`]
//! and turns them into a service URL, alt text and render data. Nothing here
//! performs I/O; the image itself is fetched by whoever follows the URL.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::{AvatarConfig, ConfigSource, GravatarSettings};
use crate::domain::error::GravatarError;
use crate::domain::identifier::content_identifier;
use crate::domain::types::{AvatarSize, DefaultImage, Rating};
use crate::presentation::views::{AvatarRenderData, ViewError, ViewRenderer};

const EMAIL_PLACEHOLDER: &str = "{$email}";
const SIZE_PLACEHOLDER: &str = "{$size}";
const RATING_PLACEHOLDER: &str = "{$rating}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gravatar {
    email: String,
    config: AvatarConfig,
    attributes: BTreeMap<String, String>,
}

impl Gravatar {
    pub fn new(email: impl Into<String>, config: AvatarConfig) -> Self {
        Self {
            email: email.into(),
            config,
            attributes: BTreeMap::new(),
        }
    }

    /// Build a gravatar for `email` using the configuration selected by `source`.
    pub fn configure(
        settings: &GravatarSettings,
        email: impl Into<String>,
        source: &ConfigSource,
    ) -> Result<Self, GravatarError> {
        let config = settings.resolve(source)?;

        debug!(
            source = source_label(source),
            size = config.size.get(),
            rating = config.rating.as_str(),
            "Configured gravatar"
        );

        Ok(Self::new(email, config))
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn with_email(&mut self, email: impl Into<String>) -> &mut Self {
        self.email = email.into();
        self
    }

    pub fn config(&self) -> &AvatarConfig {
        &self.config
    }

    pub fn size(&self) -> u32 {
        self.config.size.get()
    }

    pub fn with_size(&mut self, size: u32) -> Result<&mut Self, GravatarError> {
        self.config.size = AvatarSize::new(size)?;
        Ok(self)
    }

    pub fn rating(&self) -> Rating {
        self.config.rating
    }

    /// Set the rating from its name; matching ignores case.
    pub fn with_rating(&mut self, rating: &str) -> Result<&mut Self, GravatarError> {
        self.config.rating = rating.parse()?;
        Ok(self)
    }

    pub fn default_image(&self) -> Option<&DefaultImage> {
        self.config.default_image.as_ref()
    }

    /// Set the fallback to a named icon (`identicon`, `mm`, ...) or an absolute URL.
    pub fn with_default_image(&mut self, value: &str) -> Result<&mut Self, GravatarError> {
        self.config.default_image = Some(value.parse()?);
        Ok(self)
    }

    pub fn clear_default_image(&mut self) -> &mut Self {
        self.config.default_image = None;
        self
    }

    pub fn alt_template(&self) -> Option<&str> {
        self.config.alt.as_deref()
    }

    /// An empty template removes alt text.
    pub fn with_alt_template(&mut self, template: impl Into<String>) -> &mut Self {
        let template = template.into();
        self.config.alt = (!template.is_empty()).then_some(template);
        self
    }

    pub fn view(&self) -> &str {
        &self.config.view
    }

    pub fn with_view(&mut self, view: &str) -> Result<&mut Self, GravatarError> {
        let view = view.trim();
        if view.is_empty() {
            return Err(GravatarError::InvalidView);
        }
        self.config.view = view.to_string();
        Ok(self)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn with_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Identifier the service uses to look up the avatar for this email.
    pub fn identifier(&self) -> String {
        content_identifier(&self.email)
    }

    /// `<service>?gravatar_id=<md5>&s=<size>&r=<rating>[&d=<default>]`
    pub fn build_url(&self) -> String {
        let mut url = format!(
            "{}?gravatar_id={}&s={}&r={}",
            self.config.service,
            self.identifier(),
            self.config.size,
            self.config.rating
        );

        if let Some(default_image) = self.config.default_image.as_ref() {
            url.push_str("&d=");
            url.push_str(&default_image.query_value());
        }

        url
    }

    /// Expand the alt template, or `None` when no template is configured.
    pub fn build_alt_text(&self) -> Option<String> {
        let template = self.config.alt.as_deref()?;
        let replacements = [
            (EMAIL_PLACEHOLDER, self.email.clone()),
            (SIZE_PLACEHOLDER, self.config.size.to_string()),
            (RATING_PLACEHOLDER, self.config.rating.to_string()),
        ];
        Some(substitute_placeholders(template, &replacements))
    }

    /// Assemble the data handed to a view.
    ///
    /// Configured alt text replaces any `alt` supplied through
    /// [`with_attribute`](Self::with_attribute).
    pub fn render_data(&self) -> AvatarRenderData {
        let alt = self.build_alt_text();
        let mut attr = self.attributes.clone();
        if let Some(alt) = alt.as_ref() {
            attr.insert("alt".to_string(), alt.clone());
        }

        AvatarRenderData {
            src: self.build_url(),
            alt,
            attr,
        }
    }

    /// Render through `renderer`, optionally switching the email first.
    ///
    /// Without an explicit `view` the configured one is used.
    pub fn render<R>(
        &mut self,
        renderer: &R,
        view: Option<&str>,
        email: Option<&str>,
    ) -> Result<String, ViewError>
    where
        R: ViewRenderer + ?Sized,
    {
        if let Some(email) = email {
            self.email = email.to_string();
        }

        let view = view.unwrap_or(self.config.view.as_str());
        debug!(view, "Rendering gravatar");
        renderer.render_view(view, &self.render_data())
    }

    /// Render with the configured view and current email.
    pub fn to_display_string<R>(&self, renderer: &R) -> Result<String, ViewError>
    where
        R: ViewRenderer + ?Sized,
    {
        renderer.render_view(&self.config.view, &self.render_data())
    }
}

fn source_label(source: &ConfigSource) -> &str {
    match source {
        ConfigSource::Default => "default",
        ConfigSource::Group(name) => name.as_str(),
        ConfigSource::Explicit(_) => "explicit",
    }
}

/// Replace every placeholder in a single pass; substituted text is never rescanned.
fn substitute_placeholders(template: &str, replacements: &[(&str, String)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{$") {
        output.push_str(&rest[..start]);
        let tail = &rest[start..];
        match replacements
            .iter()
            .find(|(placeholder, _)| tail.starts_with(placeholder))
        {
            Some((placeholder, value)) => {
                output.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                output.push_str("{$");
                rest = &tail[2..];
            }
        }
    }

    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use crate::config::RawAvatarConfig;
    use crate::domain::types::DefaultIcon;
    use crate::presentation::views::AskamaViews;

    use super::*;

    const BASE_URL: &str = "https://www.gravatar.com/avatar/?gravatar_id=55502f40dc8b7c769880b10874abc9d0&s=80&r=G";

    fn gravatar(email: &str) -> Gravatar {
        Gravatar::configure(&GravatarSettings::default(), email, &ConfigSource::Default)
            .expect("default configuration")
    }

    #[test]
    fn url_matches_service_format() {
        assert_eq!(gravatar("test@example.com").build_url(), BASE_URL);
    }

    #[test]
    fn url_is_deterministic() {
        let avatar = gravatar("someone@example.org");
        assert_eq!(avatar.build_url(), avatar.build_url());
        assert_eq!(avatar.build_url(), gravatar("someone@example.org").build_url());
    }

    #[test]
    fn default_icon_is_appended() {
        let mut avatar = gravatar("test@example.com");
        avatar.with_default_image("identicon").expect("known icon");
        assert_eq!(avatar.build_url(), format!("{BASE_URL}&d=identicon"));
    }

    #[test]
    fn default_url_is_encoded_into_the_query() {
        let mut avatar = gravatar("test@example.com");
        avatar
            .with_default_image("http://example.com/x.png")
            .expect("valid url");
        assert_eq!(
            avatar.build_url(),
            format!("{BASE_URL}&d=http%3A%2F%2Fexample.com%2Fx.png")
        );

        avatar.clear_default_image();
        assert_eq!(avatar.build_url(), BASE_URL);
    }

    #[test]
    fn default_url_keeps_caller_spelling() {
        let mut avatar = gravatar("test@example.com");
        avatar
            .with_default_image("http://Example.com/a/../b.png")
            .expect("valid url");
        assert_eq!(
            avatar.build_url(),
            format!("{BASE_URL}&d=http%3A%2F%2FExample.com%2Fa%2F..%2Fb.png")
        );
    }

    #[test]
    fn invalid_default_image_leaves_previous_value() {
        let mut avatar = gravatar("test@example.com");
        avatar.with_default_image("mm").expect("known icon");

        let err = avatar.with_default_image("not a url").unwrap_err();
        assert_eq!(err, GravatarError::invalid_default_image("not a url"));
        assert_eq!(
            avatar.default_image(),
            Some(&DefaultImage::Icon(DefaultIcon::MysteryMan))
        );
    }

    #[test]
    fn rating_is_validated_and_normalized() {
        let mut avatar = gravatar("test@example.com");

        let err = avatar.with_rating("INVALID").unwrap_err();
        assert_eq!(err, GravatarError::invalid_rating("INVALID"));
        assert_eq!(avatar.rating(), Rating::G);

        avatar.with_rating("pg").expect("valid rating");
        assert_eq!(avatar.rating(), Rating::PG);
        assert!(avatar.build_url().ends_with("&r=PG"));
    }

    #[test]
    fn setters_chain() {
        let mut avatar = gravatar("test@example.com");
        avatar
            .with_size(120)
            .and_then(|avatar| avatar.with_rating("x"))
            .expect("valid values");

        assert_eq!(avatar.size(), 120);
        assert_eq!(avatar.rating(), Rating::X);
        assert!(avatar.build_url().contains("&s=120&r=X"));
    }

    #[test]
    fn zero_size_is_rejected() {
        let mut avatar = gravatar("test@example.com");
        assert_eq!(
            avatar.with_size(0).unwrap_err(),
            GravatarError::InvalidSize { size: 0 }
        );
        assert_eq!(avatar.size(), 80);
    }

    #[test]
    fn email_is_normalized_before_hashing() {
        assert_eq!(gravatar("  TEST@Example.com ").build_url(), BASE_URL);
    }

    #[test]
    fn alt_text_expands_placeholders() {
        let mut avatar = gravatar("a@b.com");
        assert_eq!(avatar.build_alt_text(), None);

        avatar.with_alt_template("Avatar for {$email}");
        assert_eq!(avatar.build_alt_text().as_deref(), Some("Avatar for a@b.com"));

        avatar
            .with_alt_template("{$email} ({$size}px, {$rating}) {$other}")
            .with_size(32)
            .expect("valid size");
        assert_eq!(
            avatar.build_alt_text().as_deref(),
            Some("a@b.com (32px, G) {$other}")
        );
    }

    #[test]
    fn alt_text_is_not_rescanned() {
        let mut avatar = gravatar("{$size}@example.com");
        avatar.with_alt_template("{$email}");
        assert_eq!(
            avatar.build_alt_text().as_deref(),
            Some("{$size}@example.com")
        );
    }

    #[test]
    fn unknown_group_fails_without_builder() {
        let result = Gravatar::configure(
            &GravatarSettings::default(),
            "test@example.com",
            &ConfigSource::group("sidebar"),
        );
        assert_eq!(result, Err(GravatarError::config_not_found("sidebar")));
    }

    #[test]
    fn explicit_config_merges_over_default_group() {
        let source = ConfigSource::Explicit(RawAvatarConfig {
            size: Some(24),
            default_image: Some("retro".to_string()),
            ..Default::default()
        });
        let err = Gravatar::configure(&GravatarSettings::default(), "a@b.com", &source)
            .unwrap_err();
        assert_eq!(err, GravatarError::invalid_default_image("retro"));

        let source = ConfigSource::Explicit(RawAvatarConfig {
            size: Some(24),
            default_image: Some("monsterid".to_string()),
            ..Default::default()
        });
        let avatar = Gravatar::configure(&GravatarSettings::default(), "a@b.com", &source)
            .expect("valid explicit config");
        assert_eq!(avatar.size(), 24);
        assert_eq!(avatar.rating(), Rating::G);
        assert!(avatar.build_url().ends_with("&s=24&r=G&d=monsterid"));
    }

    #[test]
    fn render_data_merges_attributes_and_alt() {
        let mut avatar = gravatar("a@b.com");
        avatar
            .with_attribute("class", "avatar")
            .with_attribute("alt", "caller alt");

        let data = avatar.render_data();
        assert_eq!(data.alt, None);
        assert_eq!(data.attr.get("alt").map(String::as_str), Some("caller alt"));

        avatar.with_alt_template("Avatar for {$email}");
        let data = avatar.render_data();
        assert_eq!(data.src, avatar.build_url());
        assert_eq!(data.alt.as_deref(), Some("Avatar for a@b.com"));
        assert_eq!(
            data.attr.get("alt").map(String::as_str),
            Some("Avatar for a@b.com")
        );
        assert_eq!(data.attr.get("class").map(String::as_str), Some("avatar"));
    }

    #[test]
    fn render_can_switch_email_and_view() {
        let mut avatar = gravatar("a@b.com");
        let renderer = |view: &str, data: &AvatarRenderData| -> Result<String, ViewError> {
            Ok(format!("{view} {}", data.src))
        };

        let output = avatar
            .render(&renderer, Some("custom/view"), Some("test@example.com"))
            .expect("rendered");
        assert_eq!(output, format!("custom/view {BASE_URL}"));
        assert_eq!(avatar.email(), "test@example.com");

        let output = avatar.render(&renderer, None, None).expect("rendered");
        assert_eq!(output, format!("gravatar/image {BASE_URL}"));
    }

    #[test]
    fn display_string_uses_configured_view() {
        let mut avatar = gravatar("test@example.com");
        let html = avatar.to_display_string(&AskamaViews).expect("rendered");
        assert!(html.starts_with("<img "));

        avatar.with_view("gravatar/unknown").expect("non-empty view");
        assert!(matches!(
            avatar.to_display_string(&AskamaViews),
            Err(ViewError::UnknownView { .. })
        ));
    }
}
