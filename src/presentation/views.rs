use std::collections::BTreeMap;

use askama::{Error as AskamaError, Template};
use thiserror::Error;

pub use crate::config::DEFAULT_VIEW as IMAGE_VIEW;
pub const FIGURE_VIEW: &str = "gravatar/figure";

/// Everything a view needs to draw one avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarRenderData {
    pub src: String,
    pub alt: Option<String>,
    /// Extra HTML attributes, already including `alt` when alt text exists.
    pub attr: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }

    /// Module path of the call site that failed.
    pub fn origin(&self) -> &'static str {
        self.source
    }
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("unknown view `{view}`")]
    UnknownView { view: String },
    #[error(transparent)]
    Template(#[from] TemplateRenderError),
}

/// Renders avatar data through a named view.
///
/// Host applications implement this to route avatars into their own template
/// engine; [`AskamaViews`] covers the built-in views.
pub trait ViewRenderer {
    fn render_view(&self, view: &str, data: &AvatarRenderData) -> Result<String, ViewError>;
}

impl<F> ViewRenderer for F
where
    F: Fn(&str, &AvatarRenderData) -> Result<String, ViewError>,
{
    fn render_view(&self, view: &str, data: &AvatarRenderData) -> Result<String, ViewError> {
        self(view, data)
    }
}

pub fn render_template<T: Template>(template: T) -> Result<String, TemplateRenderError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
    })
}

#[derive(Clone)]
pub struct AttributeView {
    pub name: String,
    pub value: String,
}

fn attribute_views(attr: &BTreeMap<String, String>) -> Vec<AttributeView> {
    attr.iter()
        .map(|(name, value)| AttributeView {
            name: name.clone(),
            value: value.clone(),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "gravatar/image.html")]
pub struct ImageTemplate {
    pub src: String,
    pub attributes: Vec<AttributeView>,
}

impl From<&AvatarRenderData> for ImageTemplate {
    fn from(data: &AvatarRenderData) -> Self {
        Self {
            src: data.src.clone(),
            attributes: attribute_views(&data.attr),
        }
    }
}

#[derive(Template)]
#[template(path = "gravatar/figure.html")]
pub struct FigureTemplate {
    pub src: String,
    pub attributes: Vec<AttributeView>,
    pub caption: Option<String>,
}

impl From<&AvatarRenderData> for FigureTemplate {
    fn from(data: &AvatarRenderData) -> Self {
        Self {
            src: data.src.clone(),
            attributes: attribute_views(&data.attr),
            caption: data.alt.clone(),
        }
    }
}

/// Built-in askama views: `gravatar/image` and `gravatar/figure`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AskamaViews;

impl ViewRenderer for AskamaViews {
    fn render_view(&self, view: &str, data: &AvatarRenderData) -> Result<String, ViewError> {
        match view {
            IMAGE_VIEW => Ok(render_template(ImageTemplate::from(data))?),
            FIGURE_VIEW => Ok(render_template(FigureTemplate::from(data))?),
            other => Err(ViewError::UnknownView {
                view: other.to_string(),
            }),
        }
    }
}
