//! coolifyme library
//!
//! Profile-aware client for the Coolify REST API: configuration resolution,
//! an authenticated transport, resource clients, deployment watching,
//! `.env` synchronization and bulk actions.

pub mod app;
pub mod bulk;
pub mod config;
pub mod deploy;
pub mod envsync;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod output;
pub mod storage;
pub mod utils;
