//! Bulk actions over many resources

pub mod actions;
pub mod executor;

pub use actions::{BulkAction, ResourceKind, Target};
pub use executor::{BulkReport, DEFAULT_CONCURRENCY};
