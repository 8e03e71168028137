//! Build step: run the release build, then move its artifact into the repo

pub mod artifact;
pub mod runner;

pub use artifact::move_artifact;
pub use runner::run_build;
