//! Application services layer.

pub mod gravatar;

pub use gravatar::Gravatar;
