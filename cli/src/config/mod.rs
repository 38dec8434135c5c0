//! Connection configuration

pub mod resolver;

pub use resolver::{resolve, EffectiveConfig, EnvVars, Overrides};
