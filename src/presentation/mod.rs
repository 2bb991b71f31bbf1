//! Rendering of avatar data into HTML fragments.

pub mod views;

pub use views::{AskamaViews, AvatarRenderData, TemplateRenderError, ViewError, ViewRenderer};
