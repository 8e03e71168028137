//! Core engine for ship
//!
//! - **config**: ship.toml parsing and validation
//! - **context**: Deploy context shared by planning, validation and execution
//! - **error**: Error types with contextual help messages and exit codes
//! - **executor**: Runs a deploy plan step by step
//! - **plan**: Deploy plan assembly and rendering
//! - **vcs**: Git operations (SystemGit)
//! - **version**: The `major.minor.patch` value type

pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod plan;
pub mod vcs;
pub mod version;
