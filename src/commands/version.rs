//! `ship current` and `ship next` - read-only version queries

use crate::core::config::ShipConfig;
use crate::core::context::project_root;
use crate::core::error::ShipResult;
use crate::core::version::{BumpPart, Version};
use serde::Serialize;
use std::env;

#[derive(Serialize)]
struct CurrentReport<'a> {
  version: Version,
  tag: String,
  file: &'a std::path::Path,
}

/// Print the recorded version
pub fn run_current(json: bool) -> ShipResult<()> {
  let root = project_root(&env::current_dir()?);
  let config = ShipConfig::load(&root)?;
  let version = Version::load(&root.join(&config.version_file))?;

  if json {
    let report = CurrentReport {
      version,
      tag: config.tag_name(&version),
      file: &config.version_file,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    println!("{}", version);
  }

  Ok(())
}

/// Print the version a bump of `part` would produce
pub fn run_next(part: BumpPart) -> ShipResult<()> {
  let root = project_root(&env::current_dir()?);
  let config = ShipConfig::load(&root)?;
  let current = Version::load(&root.join(&config.version_file))?;

  println!("{}", current.bump(part)?);
  Ok(())
}
