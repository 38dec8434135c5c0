//! Integration tests for the coolifyme library and binary

mod common;
mod test_bulk;
mod test_cli;
mod test_deploy;
mod test_envsync;
mod test_profiles;
mod test_resources;
mod test_watch;
