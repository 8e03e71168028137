//! Running the configured build command

use crate::core::error::{BuildError, ShipResult};
use std::path::Path;
use std::process::Command;

/// Run `command` (program followed by arguments) in `cwd` with inherited stdio
pub fn run_build(command: &[String], cwd: &Path) -> ShipResult<()> {
  let (program, args) = command.split_first().ok_or_else(|| BuildError::Spawn {
    command: String::new(),
    reason: "empty build command".to_string(),
  })?;
  let rendered = command.join(" ");

  tracing::debug!(command = %rendered, cwd = %cwd.display(), "running build");

  let status = Command::new(program)
    .args(args)
    .current_dir(cwd)
    .status()
    .map_err(|e| BuildError::Spawn {
      command: rendered.clone(),
      reason: e.to_string(),
    })?;

  if !status.success() {
    return Err(
      BuildError::Failed {
        command: rendered,
        code: status.code(),
        context: None,
      }
      .into(),
    );
  }

  Ok(())
}
