//! CLI commands for ship
//!
//! - **deploy**: Validate, confirm, build, push and tag a release
//! - **init**: Write a starter ship.toml and version file
//! - **version**: `current` and `next` version queries

pub mod deploy;
pub mod init;
pub mod version;

pub use deploy::run_deploy;
pub use init::run_init;
pub use version::{run_current, run_next};
