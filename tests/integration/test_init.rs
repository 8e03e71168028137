//! Integration tests for `ship init`

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_init_creates_config_and_version() -> Result<()> {
  let temp = tempfile::TempDir::new()?;
  let path = temp.path().join("widget");
  std::fs::create_dir_all(&path)?;
  git(&path, &["init", "--initial-branch=main"])?;

  let output = run_ship(&path, &["init"])?;
  assert!(stdout(&output).contains("Next steps"));

  let config = std::fs::read_to_string(path.join("ship.toml"))?;
  assert!(config.contains("branch = \"release\""), "config: {}", config);
  assert!(config.contains("[artifact]"), "config: {}", config);
  assert!(config.contains("widget"), "config: {}", config);
  assert_eq!(std::fs::read_to_string(path.join("VERSION"))?, "0.0.0\n");

  let output = run_ship(&path, &["current"])?;
  assert_eq!(stdout(&output).trim(), "0.0.0");

  Ok(())
}

#[test]
fn test_init_with_start_version() -> Result<()> {
  let temp = tempfile::TempDir::new()?;

  run_ship(temp.path(), &["init", "--start", "2.3.4"])?;

  assert_eq!(std::fs::read_to_string(temp.path().join("VERSION"))?, "2.3.4\n");

  Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_ship_with_input(&repo.path, &["init"], "")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("--force"), "stderr: {}", stderr(&output));

  // --force rewrites the config but keeps the recorded version
  run_ship(&repo.path, &["init", "--force"])?;
  assert_eq!(repo.read_file("VERSION")?, "0.1.0\n");
  assert!(repo.read_file("ship.toml")?.contains("cargo"));

  Ok(())
}

#[test]
fn test_init_rejects_bad_start_version() -> Result<()> {
  let temp = tempfile::TempDir::new()?;

  let output = run_ship_with_input(temp.path(), &["init", "--start", "2.x"], "")?;

  assert_eq!(output.status.code(), Some(3));
  assert!(!temp.path().join("ship.toml").exists());

  Ok(())
}
