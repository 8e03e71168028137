//! Cargo manifest integration
//!
//! - **manifest**: keep `[package].version` in step with the released version

pub mod manifest;

pub use manifest::set_package_version;
