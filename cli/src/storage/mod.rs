//! On-disk state of the CLI

pub mod layout;
pub mod profiles;

pub use profiles::{Profile, ProfileDocument, ProfileStore};
