//! Deployment module

pub mod controller;
pub mod watch;

pub use controller::{DeployOptions, DeploymentController, DeploymentReference, DeploymentStatus};
pub use watch::{WatchOptions, WatchState};
