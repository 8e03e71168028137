use crate::core::error::{ShipError, ShipResult, ResultExt};
use crate::core::version::Version;
use std::fs;
use std::path::Path;
use toml_edit::{Item, Value};

/// Set `[package].version` in the manifest at `path`, preserving formatting
pub fn set_package_version(path: &Path, version: &Version) -> ShipResult<()> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

  let mut doc: toml_edit::DocumentMut = content
    .parse()
    .map_err(|e| ShipError::message(format!("Failed to parse {}: {}", path.display(), e)))?;

  let package = doc
    .get_mut("package")
    .and_then(Item::as_table_mut)
    .ok_or_else(|| ShipError::message(format!("No [package] section in {}", path.display())))?;

  match package.get_mut("version").and_then(Item::as_value_mut) {
    // Keep the whitespace and trailing comment around the old value
    Some(existing) => {
      let decor = existing.decor();
      let prefix = decor.prefix().cloned().unwrap_or_else(|| " ".into());
      let suffix = decor.suffix().cloned().unwrap_or_else(|| "".into());
      *existing = Value::from(version.to_string()).decorated(prefix, suffix);
    }
    None => package["version"] = toml_edit::value(version.to_string()),
  }

  fs::write(path, doc.to_string()).with_context(|| format!("Failed to write {}", path.display()))?;
  tracing::debug!(manifest = %path.display(), %version, "updated package version");

  Ok(())
}
