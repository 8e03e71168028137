//! Deploy-facing operations for SystemGit (refs, status, commit, tag, push)

use super::system_git::{SystemGit, format_command};
use crate::core::error::{GitError, ShipError, ShipResult};
use std::path::Path;

impl SystemGit {
  /// Check whether `refname` resolves (e.g. `refs/tags/v1.0.0`)
  pub fn ref_exists(&self, refname: &str) -> ShipResult<bool> {
    let output = self.run(&["rev-parse", "--quiet", "--verify", refname])?;
    Ok(output.status.success())
  }

  /// Check whether a tag exists locally
  pub fn tag_exists(&self, tag: &str) -> ShipResult<bool> {
    self.ref_exists(&format!("refs/tags/{}", tag))
  }

  /// Check whether `remote` already has `tag`
  pub fn remote_tag_exists(&self, remote: &str, tag: &str) -> ShipResult<bool> {
    let output = self.run_checked(&["ls-remote", "--tags", remote, &format!("refs/tags/{}", tag)])?;
    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
  }

  /// Check whether `branch` exists locally or as `<remote>/<branch>`
  pub fn branch_exists(&self, branch: &str, remote: &str) -> ShipResult<bool> {
    if self.ref_exists(&format!("refs/heads/{}", branch))? {
      return Ok(true);
    }
    self.ref_exists(&format!("refs/remotes/{}/{}", remote, branch))
  }

  /// List all remotes as (name, fetch url)
  pub fn list_remotes(&self) -> ShipResult<Vec<(String, String)>> {
    let output = self.run(&["remote", "-v"])?;

    if !output.status.success() {
      return Ok(vec![]);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut remotes = Vec::new();

    for line in stdout.lines() {
      // Format: "origin  git@github.com:user/repo.git (fetch)"
      let parts: Vec<&str> = line.split_whitespace().collect();
      if parts.len() >= 2 && line.contains("(fetch)") {
        remotes.push((parts[0].to_string(), parts[1].to_string()));
      }
    }

    Ok(remotes)
  }

  /// Check if remote exists
  pub fn has_remote(&self, name: &str) -> ShipResult<bool> {
    let remotes = self.list_remotes()?;
    Ok(remotes.iter().any(|(n, _)| n == name))
  }

  /// Paths with uncommitted changes (tracked or untracked), relative to the root
  pub fn dirty_paths(&self) -> ShipResult<Vec<String>> {
    let output = self.run_checked(&["status", "--porcelain", "--untracked-files=all"])?;

    let paths = String::from_utf8_lossy(&output.stdout)
      .lines()
      .filter(|line| line.len() > 3)
      .map(|line| {
        // "XY path" or "XY old -> new" for renames
        let path = &line[3..];
        path.rsplit(" -> ").next().unwrap_or(path).trim_matches('"').to_string()
      })
      .collect();

    Ok(paths)
  }

  /// Checkout a branch
  pub fn checkout(&self, branch: &str) -> ShipResult<()> {
    self.run_checked(&["checkout", branch])?;
    Ok(())
  }

  /// Stage a path (relative to the repo root)
  pub fn add(&self, path: &Path) -> ShipResult<()> {
    let path = path.to_string_lossy();
    self.run_checked(&["add", "--all", "--", path.as_ref()])?;
    Ok(())
  }

  /// Commit staged changes, returning the new HEAD SHA
  ///
  /// Empty commits are allowed: an unchanged artifact still gets its own release commit.
  pub fn commit(&self, message: &str) -> ShipResult<String> {
    self.run_checked(&["commit", "--allow-empty", "-m", message])?;
    self.head_commit()
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> ShipResult<String> {
    let output = self.run_checked(&["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create an annotated tag at HEAD
  pub fn create_annotated_tag(&self, tag: &str, message: &str) -> ShipResult<()> {
    self.run_checked(&["tag", "-a", tag, "-m", message])?;
    Ok(())
  }

  /// Push a branch or tag to a remote
  pub fn push(&self, remote: &str, refspec: &str) -> ShipResult<()> {
    let args = ["push", remote, refspec];
    let output = self.run(&args)?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      tracing::debug!(command = %format_command(&args), "push rejected");
      return Err(ShipError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        refspec: refspec.to_string(),
        reason: stderr.trim().to_string(),
      }));
    }

    Ok(())
  }
}
