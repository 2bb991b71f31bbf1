//! Runtime bootstrap helpers.

pub mod error;
pub mod telemetry;
