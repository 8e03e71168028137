//! System git backend
//!
//! Every operation shells out to the `git` on PATH with an isolated
//! environment, so user-level hooks into the process environment cannot change
//! what a deploy does.

use crate::core::error::{GitError, ShipError, ShipResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Environment variables forwarded to git; everything else is cleared
const FORWARDED_ENV: &[&str] = &[
  "PATH",
  "HOME",
  "SSH_AUTH_SOCK",
  "GIT_SSH_COMMAND",
  "GIT_AUTHOR_NAME",
  "GIT_AUTHOR_EMAIL",
  "GIT_COMMITTER_NAME",
  "GIT_COMMITTER_EMAIL",
];

/// Git backend using system git
pub struct SystemGit {
  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the git repository containing `path`
  pub fn open(path: &Path) -> ShipResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ShipError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ShipError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = PathBuf::from(stdout.trim());
    tracing::debug!(work_tree = %work_tree.display(), "opened repository");

    Ok(Self { work_tree })
  }

  /// Repository root
  pub fn root(&self) -> &Path {
    &self.work_tree
  }

  /// Get current branch name ("HEAD" when detached)
  pub fn current_branch(&self) -> ShipResult<String> {
    let output = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;

    if !output.status.success() {
      return Ok("HEAD".to_string());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Runs against the work tree root
  /// - Clears environment variables except `FORWARDED_ENV`
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_tree);

    cmd.env_clear();
    for key in FORWARDED_ENV {
      if let Ok(value) = std::env::var(key) {
        cmd.env(key, value);
      }
    }

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }

  /// Run git with `args`, returning the raw output whatever the exit status
  pub(crate) fn run(&self, args: &[&str]) -> ShipResult<Output> {
    tracing::debug!(command = %format_command(args), "running git");
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute {}", format_command(args)))?;
    tracing::trace!(status = ?output.status, stderr = %String::from_utf8_lossy(&output.stderr).trim(), "git finished");
    Ok(output)
  }

  /// Run git with `args`, turning a non-zero exit into `GitError::CommandFailed`
  pub(crate) fn run_checked(&self, args: &[&str]) -> ShipResult<Output> {
    let output = self.run(args)?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ShipError::Git(GitError::CommandFailed {
        command: format_command(args),
        stderr: stderr.trim().to_string(),
      }));
    }

    Ok(output)
  }
}

/// Render a git invocation for logs and error messages
pub(crate) fn format_command(args: &[&str]) -> String {
  let mut rendered = String::from("git");
  for arg in args {
    rendered.push(' ');
    if arg.contains(char::is_whitespace) {
      rendered.push_str(&format!("\"{}\"", arg));
    } else {
      rendered.push_str(arg);
    }
  }
  rendered
}
