//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Build script used by the default test config: writes `build/app`
pub const BUILD_SCRIPT: &str = "mkdir -p build && printf artifact > build/app";

/// A test repository with a bare remote and a `release` branch
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
  pub remote: PathBuf,
}

impl TestRepo {
  /// Create a repo on `main` at version 0.1.0 with a working ship.toml
  pub fn new() -> Result<Self> {
    Self::with_config(&default_config(""))
  }

  /// Create a repo whose committed ship.toml is `config`
  pub fn with_config(config: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("repo");
    let remote = root.path().join("remote.git");
    std::fs::create_dir_all(&path)?;

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(path.join("ship.toml"), config)?;
    std::fs::write(path.join("VERSION"), "0.1.0\n")?;
    std::fs::write(path.join(".gitignore"), "build/\n")?;
    std::fs::write(path.join("README.md"), "# test project\n")?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;
    git(&path, &["branch", "release"])?;

    git(root.path(), &["init", "--bare", "remote.git"])?;
    let remote_url = remote.to_string_lossy().to_string();
    git(&path, &["remote", "add", "origin", &remote_url])?;
    git(&path, &["push", "origin", "main", "release"])?;

    Ok(Self {
      _root: root,
      path,
      remote,
    })
  }

  /// Write a file and commit it on the current branch
  pub fn commit_file(&self, file: &str, content: &str, message: &str) -> Result<()> {
    std::fs::write(self.path.join(file), content)?;
    git(&self.path, &["add", file])?;
    git(&self.path, &["commit", "-m", message])?;
    Ok(())
  }

  /// Read a file in the work tree
  pub fn read_file(&self, file: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(file))?)
  }

  /// Check if a file exists in the work tree
  pub fn file_exists(&self, file: &str) -> bool {
    self.path.join(file).exists()
  }

  /// Branch checked out in the work tree
  pub fn current_branch(&self) -> Result<String> {
    let output = git(&self.path, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Tags present on the bare remote
  pub fn remote_tags(&self) -> Result<Vec<String>> {
    let output = git(&self.remote, &["tag", "-l"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Content of `file` on `branch` in the bare remote
  pub fn remote_file(&self, branch: &str, file: &str) -> Result<String> {
    let output = git(&self.remote, &["show", &format!("{}:{}", branch, file)])?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Subject of the latest commit on `branch` in the bare remote
  pub fn remote_subject(&self, branch: &str) -> Result<String> {
    let output = git(&self.remote, &["log", "-1", "--format=%s", branch])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// ship.toml with the test build script and `extra` prepended as top-level keys
pub fn default_config(extra: &str) -> String {
  config_with_build(extra, BUILD_SCRIPT)
}

/// ship.toml whose build runs `script` through `sh -c`
pub fn config_with_build(extra: &str, script: &str) -> String {
  format!(
    r#"{}
[build]
command = ["sh", "-c", "{}"]

[artifact]
source = "build/app"
dest = "dist"
"#,
    extra, script
  )
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run ship, requiring success
pub fn run_ship(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_ship_with_input(cwd, args, "")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "ship command failed: ship {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run ship with `input` on stdin, whatever the exit status
pub fn run_ship_with_input(cwd: &Path, args: &[&str], input: &str) -> Result<Output> {
  let ship_bin = env!("CARGO_BIN_EXE_ship");

  let mut child = Command::new(ship_bin)
    .current_dir(cwd)
    .args(args)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .context("Failed to run ship")?;

  if let Some(mut stdin) = child.stdin.take() {
    stdin.write_all(input.as_bytes())?;
  }

  Ok(child.wait_with_output()?)
}

/// stdout of a finished command as text
pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

/// stderr of a finished command as text
pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
