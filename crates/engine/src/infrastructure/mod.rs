//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies and the
//! engine's runtime settings.

pub mod app_settings;
pub mod ports;
pub mod random;
