//! Typed request and response models for the Coolify REST API (v1).

pub mod models;

pub use models::*;
