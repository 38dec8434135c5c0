//! Platform REST client: transport, retry policy and per-resource facades

pub mod applications;
pub mod client;
pub mod databases;
pub mod deployments;
pub mod keys;
pub mod projects;
pub mod resources;
pub mod retry;
pub mod servers;
pub mod services;
pub mod system;
pub mod teams;
pub mod transport;
