//! Error types for ship with contextual messages and exit codes
//!
//! Every error maps to an exit code and, where we know how to get out of the
//! situation, a help line printed under the message.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, build, I/O)
  System = 2,
  /// Validation failure (version ordering, pre-flight checks)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for ship
#[derive(Debug)]
pub enum ShipError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Pre-flight and version validation errors
  Validation(ValidationError),

  /// Build step and artifact errors
  Build(BuildError),

  /// I/O errors
  Io(io::Error),

  /// A structured error that gained context it has no slot for
  Context { source: Box<ShipError>, context: String },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// Structured errors keep their category, help text and exit code.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => attach_context(other, ctx_str),
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Config(_) => ExitCode::User,
      ShipError::Git(_) => ExitCode::System,
      ShipError::Validation(_) => ExitCode::Validation,
      ShipError::Build(_) => ExitCode::System,
      ShipError::Io(_) => ExitCode::System,
      ShipError::Context { source, .. } => source.exit_code(),
      ShipError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Git(e) => e.help_message(),
      ShipError::Validation(e) => e.help_message(),
      ShipError::Build(e) => e.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      ShipError::Context { source, .. } => source.help_message(),
      ShipError::Io(_) => None,
    }
  }
}

/// Attach context to a structured error without discarding its category.
fn attach_context(err: ShipError, ctx: String) -> ShipError {
  match err {
    ShipError::Git(GitError::CommandFailed { command, stderr }) => ShipError::Git(GitError::CommandFailed {
      command,
      stderr: format!("{}\n{}", stderr.trim_end(), ctx),
    }),
    ShipError::Git(GitError::PushFailed { remote, refspec, reason }) => ShipError::Git(GitError::PushFailed {
      remote,
      refspec,
      reason: format!("{}\n{}", reason.trim_end(), ctx),
    }),
    ShipError::Io(e) => ShipError::Io(io::Error::new(e.kind(), format!("{}: {}", ctx, e))),
    ShipError::Build(BuildError::Failed { command, code, .. }) => ShipError::Build(BuildError::Failed {
      command,
      code,
      context: Some(ctx),
    }),
    ShipError::Context { source, context } => ShipError::Context {
      source,
      context: format!("{}\n{}", context, ctx),
    },
    other => ShipError::Context {
      source: Box::new(other),
      context: ctx,
    },
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Git(e) => write!(f, "{}", e),
      ShipError::Validation(e) => write!(f, "{}", e),
      ShipError::Build(e) => write!(f, "{}", e),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Context { source, context } => write!(f, "{}\n{}", source, context),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      ShipError::Context { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ShipError {
  fn from(err: toml_edit::TomlError) -> Self {
    ShipError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ShipError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

impl From<ConfigError> for ShipError {
  fn from(err: ConfigError) -> Self {
    ShipError::Config(err)
  }
}

impl From<GitError> for ShipError {
  fn from(err: GitError) -> Self {
    ShipError::Git(err)
  }
}

impl From<ValidationError> for ShipError {
  fn from(err: ValidationError) -> Self {
    ShipError::Validation(err)
  }
}

impl From<BuildError> for ShipError {
  fn from(err: BuildError) -> Self {
    ShipError::Build(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// ship.toml not found
  NotFound { root: PathBuf },

  /// Version file not found
  VersionFileNotFound { path: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Field present but unusable
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `ship init` to create a configuration file.".to_string()),
      ConfigError::VersionFileNotFound { .. } => {
        Some("Run `ship init --start <X.Y.Z>` to record the current version.".to_string())
      }
      ConfigError::MissingField { field } if field == "artifact" => Some(
        "Add an [artifact] table to ship.toml with `source` (build output) and `dest` (directory in the repo)."
          .to_string(),
      ),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { root } => {
        write!(f, "No ship configuration found.\nExpected file: {}/ship.toml", root.display())
      }
      ConfigError::VersionFileNotFound { path } => {
        write!(f, "Version file not found: {}", path.display())
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid value for '{}' in config: {}", field, reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed {
    remote: String,
    refspec: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        let reason = reason.to_lowercase();
        if reason.contains("non-fast-forward") || reason.contains("fetch first") {
          Some("The remote has commits you don't have. Pull the release branch and retry.".to_string())
        } else if reason.contains("permission denied") || reason.contains("403") {
          Some("Check your SSH key or token has write access to the remote.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run ship from inside a git repository (checked: {})",
        path.display()
      )),
      GitError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { remote, refspec, reason } => {
        write!(f, "Push of {} to {} failed: {}", refspec, remote, reason)
      }
    }
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// Version string could not be parsed
  InvalidVersion { input: String, reason: String },

  /// Requested version does not move forward
  VersionNotNewer { current: String, requested: String },

  /// Tag already present in the repository
  TagExists { tag: String },

  /// Tag already pushed to the remote but missing locally
  RemoteTagExists { tag: String, remote: String },

  /// Remote not configured in the repository
  RemoteMissing { remote: String },

  /// Deploy branch not found locally or on the remote
  BranchMissing { branch: String, remote: String },

  /// Uncommitted changes in the working tree
  DirtyTree { paths: Vec<String> },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::InvalidVersion { .. } => {
        Some("Versions are three dot-separated numbers, e.g. 1.4.2".to_string())
      }
      ValidationError::VersionNotNewer { current, .. } => Some(format!(
        "Pick a version greater than {}, or use `ship next <major|minor|patch>`.",
        current
      )),
      ValidationError::TagExists { tag } => Some(format!(
        "This version has already been released. Delete the tag with `git tag -d {}` if that was a mistake.",
        tag
      )),
      ValidationError::RemoteTagExists { remote, .. } => Some(format!(
        "Run `git fetch {} --tags` to see it locally, then pick a newer version.",
        remote
      )),
      ValidationError::RemoteMissing { remote } => {
        Some(format!("Add it with `git remote add {} <url>` or set `remote` in ship.toml.", remote))
      }
      ValidationError::BranchMissing { branch, .. } => {
        Some(format!("Create it with `git branch {}` or set `branch` in ship.toml.", branch))
      }
      ValidationError::DirtyTree { .. } => Some("Commit or stash your changes before deploying.".to_string()),
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::InvalidVersion { input, reason } => {
        write!(f, "Invalid version '{}': {}", input, reason)
      }
      ValidationError::VersionNotNewer { current, requested } => {
        write!(
          f,
          "Version {} is not newer than the current version {}",
          requested, current
        )
      }
      ValidationError::TagExists { tag } => write!(f, "Tag '{}' already exists", tag),
      ValidationError::RemoteTagExists { tag, remote } => {
        write!(f, "Tag '{}' already exists on remote '{}'", tag, remote)
      }
      ValidationError::RemoteMissing { remote } => write!(f, "Remote '{}' is not configured", remote),
      ValidationError::BranchMissing { branch, remote } => {
        write!(f, "Branch '{}' not found locally or on '{}'", branch, remote)
      }
      ValidationError::DirtyTree { paths } => {
        write!(f, "Working tree has uncommitted changes:")?;
        for path in paths {
          write!(f, "\n  {}", path)?;
        }
        Ok(())
      }
    }
  }
}

/// Build step errors
#[derive(Debug)]
pub enum BuildError {
  /// Build command could not be started
  Spawn { command: String, reason: String },

  /// Build command exited unsuccessfully
  Failed {
    command: String,
    code: Option<i32>,
    context: Option<String>,
  },

  /// Build finished but the artifact is not where the config says
  ArtifactMissing { path: PathBuf },
}

impl BuildError {
  fn help_message(&self) -> Option<String> {
    match self {
      BuildError::Spawn { .. } => Some("Check `build.command` in ship.toml and that the program is on PATH.".to_string()),
      BuildError::ArtifactMissing { .. } => {
        Some("Check `artifact.source` in ship.toml points at the file your build produces.".to_string())
      }
      BuildError::Failed { .. } => None,
    }
  }
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::Spawn { command, reason } => {
        write!(f, "Failed to start build command `{}`: {}", command, reason)
      }
      BuildError::Failed { command, code, context } => {
        match code {
          Some(code) => write!(f, "Build command `{}` failed with exit code {}", command, code)?,
          None => write!(f, "Build command `{}` was terminated by a signal", command)?,
        }
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
      BuildError::ArtifactMissing { path } => {
        write!(f, "Build artifact not found: {}", path.display())
      }
    }
  }
}

/// Result type alias for ship
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
