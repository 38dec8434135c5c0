//! Environment variable synchronization between `.env` files and the Platform

pub mod diff;
pub mod dotenv;
pub mod engine;

pub use diff::SyncPlan;
pub use dotenv::EnvMap;
pub use engine::{ApplicationEnv, EnvSync, RemoteEnv, ServiceEnv};
