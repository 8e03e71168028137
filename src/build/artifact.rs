//! Moving the build artifact into the repository

use crate::core::error::{BuildError, ShipError, ShipResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

/// Move `source` into the directory `dest_dir`, keeping its file name
///
/// A previous artifact of the same name is replaced. Returns the final path.
pub fn move_artifact(source: &Path, dest_dir: &Path) -> ShipResult<PathBuf> {
  if !source.exists() {
    return Err(
      BuildError::ArtifactMissing {
        path: source.to_path_buf(),
      }
      .into(),
    );
  }

  let file_name = source
    .file_name()
    .ok_or_else(|| ShipError::message(format!("Artifact path has no file name: {}", source.display())))?;

  fs::create_dir_all(dest_dir).with_context(|| format!("Failed to create {}", dest_dir.display()))?;
  let target = dest_dir.join(file_name);

  if target.exists() {
    remove_path(&target)?;
  }

  tracing::debug!(from = %source.display(), to = %target.display(), "moving artifact");

  if let Err(e) = fs::rename(source, &target) {
    // rename cannot cross filesystems
    tracing::debug!(error = %e, "rename failed, copying instead");
    copy_path(source, &target)?;
    remove_path(source)?;
  }

  Ok(target)
}

fn remove_path(path: &Path) -> ShipResult<()> {
  if path.is_dir() {
    fs::remove_dir_all(path).with_context(|| format!("Failed to remove {}", path.display()))
  } else {
    fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))
  }
}

fn copy_path(from: &Path, to: &Path) -> ShipResult<()> {
  if from.is_dir() {
    fs::create_dir_all(to).with_context(|| format!("Failed to create {}", to.display()))?;
    for entry in fs::read_dir(from)? {
      let entry = entry?;
      copy_path(&entry.path(), &to.join(entry.file_name()))?;
    }
    Ok(())
  } else {
    fs::copy(from, to)
      .map(|_| ())
      .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))
  }
}
