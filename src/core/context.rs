//! Deploy context - load once, pass everywhere
//!
//! `DeployContext` gathers the repository handle, the config, the branch the
//! user started on and the currently recorded version. Commands build it once
//! and pass it by reference to planning, validation and execution.

use crate::core::config::ShipConfig;
use crate::core::error::ShipResult;
use crate::core::vcs::SystemGit;
use crate::core::version::Version;
use std::path::{Component, Path, PathBuf};

pub struct DeployContext {
  /// Repository root (absolute path)
  pub root: PathBuf,

  /// Loaded ship.toml
  pub config: ShipConfig,

  /// Repository handle
  pub git: SystemGit,

  /// Branch checked out when ship started
  pub start_branch: String,

  /// Version recorded in the version file
  pub current: Version,
}

/// Repository root containing `cwd`, or `cwd` itself outside a repository
///
/// Read-only commands (`current`, `next`) and `init` work without git.
pub fn project_root(cwd: &Path) -> PathBuf {
  match SystemGit::open(cwd) {
    Ok(git) => git.root().to_path_buf(),
    Err(e) => {
      tracing::debug!(error = %e, "not in a git repository, using working directory");
      cwd.to_path_buf()
    }
  }
}

impl DeployContext {
  /// Build the context for the repository containing `cwd`
  pub fn build(cwd: &Path) -> ShipResult<Self> {
    let git = SystemGit::open(cwd)?;
    let root = git.root().to_path_buf();
    let config = ShipConfig::load(&root)?;
    let current = Version::load(&root.join(&config.version_file))?;
    let start_branch = git.current_branch()?;

    tracing::debug!(root = %root.display(), %current, branch = %start_branch, "deploy context ready");

    Ok(Self {
      root,
      config,
      git,
      start_branch,
      current,
    })
  }

  /// Absolute path of a repo-relative config path
  pub fn resolve(&self, path: &Path) -> PathBuf {
    self.root.join(path)
  }

  /// Paths deploys may leave modified: the version file and its manifest mirror
  ///
  /// Paths are in the form `git status` reports them (no `./` components).
  pub fn bookkeeping_paths(&self) -> Vec<PathBuf> {
    std::iter::once(&self.config.version_file)
      .chain(self.config.manifest.as_ref())
      .map(|p| without_cur_dir(p))
      .collect()
  }

  #[cfg(test)]
  pub fn for_tests(config: ShipConfig, start_branch: &str, current: Version) -> Self {
    Self {
      root: PathBuf::from("."),
      config,
      git: SystemGit {
        work_tree: PathBuf::from("."),
      },
      start_branch: start_branch.to_string(),
      current,
    }
  }
}

fn without_cur_dir(path: &Path) -> PathBuf {
  path.components().filter(|c| !matches!(c, Component::CurDir)).collect()
}
