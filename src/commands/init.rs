//! `ship init` - write a starter ship.toml and version file

use crate::core::config::ShipConfig;
use crate::core::context::project_root;
use crate::core::error::{ShipError, ShipResult};
use crate::core::version::Version;
use std::env;

/// Run the init command
pub fn run_init(version: Option<String>, force: bool) -> ShipResult<()> {
  let root = project_root(&env::current_dir()?);

  if let Some(existing) = ShipConfig::find_config_path(&root)
    && !force
  {
    return Err(ShipError::with_help(
      format!("Configuration already exists: {}", existing.display()),
      "Use --force to overwrite it.",
    ));
  }

  let initial = match version.as_deref() {
    Some(v) => Version::parse(v)?,
    None => Version::new(0, 0, 0),
  };

  let config = ShipConfig::starter(&root);
  config.save(&root)?;
  println!("📝 Wrote {}", root.join("ship.toml").display());

  let version_path = root.join(&config.version_file);
  if version_path.exists() && version.is_none() {
    println!("   Keeping existing {}", config.version_file.display());
  } else {
    initial.save(&version_path)?;
    println!("   Recorded version {} in {}", initial, config.version_file.display());
  }

  println!();
  println!("Next steps:");
  println!("  1. Check `[build]` and `[artifact]` in ship.toml");
  println!("  2. Commit ship.toml and {}", config.version_file.display());
  println!("  3. ship deploy --bump patch --dry-run");

  Ok(())
}
