//! Migration framework
//!
//! Provides:
//! - Migration runner with checksums and idempotent application
//! - Checksum verification of already-applied migrations
//! - Embedded SQL migrations

mod checksums;
mod embedded;
mod runner;

pub use runner::apply_migrations;
