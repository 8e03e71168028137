//! Integration tests for `ship deploy`

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_deploy_full_flow() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_ship(&repo.path, &["deploy", "0.2.0", "--yes"])?;
  let out = stdout(&output);

  assert!(out.contains("Released 0.2.0"), "stdout: {}", out);
  assert_eq!(repo.remote_tags()?, vec!["v0.2.0".to_string()]);
  assert_eq!(repo.remote_file("release", "dist/app")?, "artifact");
  assert_eq!(repo.remote_subject("release")?, "Release 0.2.0");
  assert_eq!(repo.read_file("VERSION")?, "0.2.0\n");

  // Back where we started, build output moved away
  assert_eq!(repo.current_branch()?, "main");
  assert!(!repo.file_exists("build/app"));

  Ok(())
}

#[test]
fn test_deploy_with_bump() -> Result<()> {
  let repo = TestRepo::new()?;

  run_ship(&repo.path, &["deploy", "--bump", "minor", "--yes"])?;

  assert_eq!(repo.remote_tags()?, vec!["v0.2.0".to_string()]);
  assert_eq!(repo.read_file("VERSION")?, "0.2.0\n");

  Ok(())
}

#[test]
fn test_consecutive_deploys() -> Result<()> {
  let repo = TestRepo::new()?;

  run_ship(&repo.path, &["deploy", "--bump", "patch", "--yes"])?;
  run_ship(&repo.path, &["deploy", "--bump", "patch", "--yes"])?;

  let mut tags = repo.remote_tags()?;
  tags.sort();
  assert_eq!(tags, vec!["v0.1.1".to_string(), "v0.1.2".to_string()]);
  assert_eq!(repo.read_file("VERSION")?, "0.1.2\n");

  Ok(())
}

#[test]
fn test_rejects_version_not_newer() -> Result<()> {
  let repo = TestRepo::new()?;

  for version in ["0.1.0", "0.0.9"] {
    let output = run_ship_with_input(&repo.path, &["deploy", version, "--yes"], "")?;
    assert_eq!(output.status.code(), Some(3), "version {} should be rejected", version);
    assert!(stderr(&output).contains("not newer"), "stderr: {}", stderr(&output));
  }

  assert!(repo.remote_tags()?.is_empty());
  assert_eq!(repo.read_file("VERSION")?, "0.1.0\n");

  Ok(())
}

#[test]
fn test_rejects_malformed_version() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_ship_with_input(&repo.path, &["deploy", "1.2", "--yes"], "")?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("Invalid version '1.2'"), "stderr: {}", stderr(&output));
  assert!(repo.remote_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_declined_prompt_changes_nothing() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_ship_with_input(&repo.path, &["deploy", "0.2.0"], "n\n")?;

  assert!(output.status.success());
  let out = stdout(&output);
  assert!(out.contains("[y/N]"), "stdout: {}", out);
  assert!(out.contains("cancelled"), "stdout: {}", out);
  assert!(repo.remote_tags()?.is_empty());
  assert_eq!(repo.read_file("VERSION")?, "0.1.0\n");
  assert_eq!(repo.current_branch()?, "main");

  Ok(())
}

#[test]
fn test_confirmed_prompt_deploys() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_ship_with_input(&repo.path, &["deploy", "1.0.0"], "y\n")?;

  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert_eq!(repo.remote_tags()?, vec!["v1.0.0".to_string()]);

  Ok(())
}

#[test]
fn test_dry_run() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_ship(&repo.path, &["deploy", "0.2.0", "--dry-run"])?;
  let out = stdout(&output);

  assert!(out.contains("Deploy plan"), "stdout: {}", out);
  assert!(out.contains("Checkout branch release"));
  assert!(out.contains("Push tag v0.2.0 to origin"));
  assert!(out.contains("Dry-run"));

  assert!(repo.remote_tags()?.is_empty());
  assert!(!repo.file_exists("build/app"));
  assert_eq!(repo.read_file("VERSION")?, "0.1.0\n");

  Ok(())
}

#[test]
fn test_dry_run_json() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_ship(&repo.path, &["deploy", "--bump", "major", "--dry-run", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  assert_eq!(json["current"], "0.1.0");
  assert_eq!(json["version"], "1.0.0");
  assert_eq!(json["tag"], "v1.0.0");
  assert_eq!(json["steps"][0]["type"], "checkout");
  assert_eq!(json["steps"][1]["type"], "build");

  Ok(())
}

#[test]
fn test_rejects_existing_tag() -> Result<()> {
  let repo = TestRepo::new()?;
  git(&repo.path, &["tag", "v0.2.0"])?;

  let output = run_ship_with_input(&repo.path, &["deploy", "0.2.0", "--yes"], "")?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("already exists"), "stderr: {}", stderr(&output));

  Ok(())
}

#[test]
fn test_rejects_tag_already_on_remote() -> Result<()> {
  let repo = TestRepo::new()?;
  git(&repo.path, &["tag", "v0.2.0"])?;
  git(&repo.path, &["push", "origin", "v0.2.0"])?;
  git(&repo.path, &["tag", "-d", "v0.2.0"])?;

  let output = run_ship_with_input(&repo.path, &["deploy", "0.2.0", "--yes"], "")?;

  assert_eq!(output.status.code(), Some(3));
  let err = stderr(&output);
  assert!(err.contains("already exists on remote 'origin'"), "stderr: {}", err);

  // Nothing was pushed before the refusal
  assert_ne!(repo.remote_subject("release")?, "Release 0.2.0");
  assert_eq!(repo.read_file("VERSION")?, "0.1.0\n");

  Ok(())
}

#[test]
fn test_rejects_dirty_tree() -> Result<()> {
  let repo = TestRepo::new()?;
  std::fs::write(repo.path.join("README.md"), "# edited\n")?;

  let output = run_ship_with_input(&repo.path, &["deploy", "0.2.0", "--yes"], "")?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("README.md"), "stderr: {}", stderr(&output));
  assert!(repo.remote_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_rejects_missing_remote() -> Result<()> {
  let repo = TestRepo::with_config(&default_config("remote = \"upstream\""))?;

  let output = run_ship_with_input(&repo.path, &["deploy", "0.2.0", "--yes"], "")?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("upstream"), "stderr: {}", stderr(&output));

  Ok(())
}

#[test]
fn test_build_failure_stops_deploy() -> Result<()> {
  let repo = TestRepo::with_config(&config_with_build("", "exit 4"))?;

  let output = run_ship_with_input(&repo.path, &["deploy", "0.2.0", "--yes"], "")?;

  assert_eq!(output.status.code(), Some(2));
  let err = stderr(&output);
  assert!(err.contains("exit code 4"), "stderr: {}", err);
  assert!(err.contains("step 2/"), "stderr: {}", err);

  assert!(repo.remote_tags()?.is_empty());
  assert_eq!(repo.read_file("VERSION")?, "0.1.0\n");

  Ok(())
}

#[test]
fn test_missing_artifact_stops_deploy() -> Result<()> {
  let repo = TestRepo::with_config(&config_with_build("", "true"))?;

  let output = run_ship_with_input(&repo.path, &["deploy", "0.2.0", "--yes"], "")?;

  assert_eq!(output.status.code(), Some(2));
  let err = stderr(&output);
  assert!(err.contains("artifact not found"), "stderr: {}", err);
  assert!(err.contains("Deploy stopped at step 3/"), "stderr: {}", err);
  assert!(repo.remote_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_custom_tag_and_manifest() -> Result<()> {
  let repo = TestRepo::with_config(&default_config(
    "tag_format = \"release-{version}\"\nmanifest = \"Cargo.toml\"",
  ))?;
  repo.commit_file(
    "Cargo.toml",
    "[package]\nname = \"app\"\nversion = \"0.1.0\" # bumped by ship\n",
    "Add manifest",
  )?;

  run_ship(&repo.path, &["deploy", "0.3.0", "--yes"])?;

  assert_eq!(repo.remote_tags()?, vec!["release-0.3.0".to_string()]);
  let manifest = repo.read_file("Cargo.toml")?;
  assert!(manifest.contains("version = \"0.3.0\""), "manifest: {}", manifest);
  assert!(manifest.contains("# bumped by ship"), "manifest: {}", manifest);

  Ok(())
}

#[test]
fn test_stays_on_deploy_branch_when_configured() -> Result<()> {
  let repo = TestRepo::with_config(&default_config("return_to_branch = false"))?;

  run_ship(&repo.path, &["deploy", "0.2.0", "--yes"])?;

  assert_eq!(repo.current_branch()?, "release");
  assert_eq!(repo.read_file("dist/app")?, "artifact");
  assert_eq!(repo.read_file("VERSION")?, "0.2.0\n");

  Ok(())
}

#[test]
fn test_dot_slash_version_file_is_not_dirty() -> Result<()> {
  let repo = TestRepo::with_config(&default_config("version_file = \"./VERSION\""))?;

  run_ship(&repo.path, &["deploy", "--bump", "patch", "--yes"])?;
  // The uncommitted VERSION from the first deploy must not block the second
  run_ship(&repo.path, &["deploy", "--bump", "patch", "--yes"])?;

  assert_eq!(repo.read_file("VERSION")?, "0.1.2\n");

  Ok(())
}
