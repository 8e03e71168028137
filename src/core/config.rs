use crate::core::error::{ConfigError, ShipError, ShipResult, ResultExt};
use crate::core::version::Version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Configuration for ship
/// Searched in order: ship.toml, .ship.toml, .config/ship.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipConfig {
  /// File holding the currently released version (relative to repo root)
  #[serde(default = "default_version_file")]
  pub version_file: PathBuf,

  /// Branch the release commit is pushed to
  #[serde(default = "default_branch")]
  pub branch: String,

  /// Remote that receives the branch and tag
  #[serde(default = "default_remote")]
  pub remote: String,

  /// Switch back to the starting branch once the tag is pushed
  #[serde(default = "default_true")]
  pub return_to_branch: bool,

  /// Optional Cargo.toml-style manifest whose `[package].version` mirrors the version file
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub manifest: Option<PathBuf>,

  /// Tag name template (must contain `{version}`)
  #[serde(default = "default_tag_format")]
  pub tag_format: String,

  /// Release commit message template
  #[serde(default = "default_commit_message")]
  pub commit_message: String,

  /// Annotated tag message template
  #[serde(default = "default_tag_message")]
  pub tag_message: String,

  #[serde(default)]
  pub build: BuildConfig,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub artifact: Option<ArtifactConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Program followed by its arguments
  #[serde(default = "default_build_command")]
  pub command: Vec<String>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      command: default_build_command(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
  /// Path the build writes the artifact to
  pub source: PathBuf,

  /// Directory inside the repository the artifact is moved into
  pub dest: PathBuf,
}

fn default_version_file() -> PathBuf {
  PathBuf::from("VERSION")
}

fn default_branch() -> String {
  "release".to_string()
}

fn default_remote() -> String {
  "origin".to_string()
}

fn default_true() -> bool {
  true
}

fn default_tag_format() -> String {
  "v{version}".to_string()
}

fn default_commit_message() -> String {
  "Release {version}".to_string()
}

fn default_tag_message() -> String {
  "Release {version} ({date})".to_string()
}

fn default_build_command() -> Vec<String> {
  vec!["cargo".to_string(), "build".to_string(), "--release".to_string()]
}

impl ShipConfig {
  /// Find config file in search order: ship.toml, .ship.toml, .config/ship.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("ship.toml"),
      path.join(".ship.toml"),
      path.join(".config").join("ship.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from ship.toml (searches multiple locations)
  pub fn load(path: &Path) -> ShipResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      ShipError::Config(ConfigError::NotFound {
        root: path.to_path_buf(),
      })
    })?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::from_toml(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config.validate()?;
    tracing::debug!(path = %config_path.display(), "loaded config");

    Ok(config)
  }

  /// Parse config from TOML text without validating it
  pub fn from_toml(content: &str) -> ShipResult<Self> {
    Ok(toml_edit::de::from_str(content)?)
  }

  /// Validate field values that serde cannot check on its own
  pub fn validate(&self) -> ShipResult<()> {
    if self.build.command.is_empty() || self.build.command[0].trim().is_empty() {
      return Err(invalid("build.command", "must name a program to run"));
    }
    if self.branch.trim().is_empty() {
      return Err(ConfigError::MissingField {
        field: "branch".to_string(),
      }
      .into());
    }
    if self.remote.trim().is_empty() {
      return Err(ConfigError::MissingField {
        field: "remote".to_string(),
      }
      .into());
    }
    if !self.tag_format.contains("{version}") {
      return Err(invalid("tag_format", "must contain {version}"));
    }
    if let Some(artifact) = &self.artifact
      && !is_contained(&artifact.dest)
    {
      return Err(invalid(
        "artifact.dest",
        "must be a relative path inside the repository",
      ));
    }
    Ok(())
  }

  /// The artifact table, which deploys cannot do without
  pub fn require_artifact(&self) -> ShipResult<&ArtifactConfig> {
    self.artifact.as_ref().ok_or_else(|| {
      ConfigError::MissingField {
        field: "artifact".to_string(),
      }
      .into()
    })
  }

  /// Tag name for `version`
  pub fn tag_name(&self, version: &Version) -> String {
    render_template(&self.tag_format, version, "")
  }

  /// Save config to ship.toml
  pub fn save(&self, path: &Path) -> ShipResult<()> {
    let config_path = path.join("ship.toml");
    let content = toml_edit::ser::to_string_pretty(self)
      .map_err(|e| ShipError::message(format!("Failed to serialize config to TOML: {}", e)))?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(())
  }

  /// A starter config for a repository, with the artifact guessed from the directory name
  pub fn starter(root: &Path) -> Self {
    let name = root
      .file_name()
      .and_then(|n| n.to_str())
      .unwrap_or("app")
      .to_string();

    Self {
      version_file: default_version_file(),
      branch: default_branch(),
      remote: default_remote(),
      return_to_branch: true,
      manifest: None,
      tag_format: default_tag_format(),
      commit_message: default_commit_message(),
      tag_message: default_tag_message(),
      build: BuildConfig::default(),
      artifact: Some(ArtifactConfig {
        source: PathBuf::from("target").join("release").join(name),
        dest: PathBuf::from("dist"),
      }),
    }
  }
}

fn invalid(field: &str, reason: &str) -> ShipError {
  ConfigError::InvalidField {
    field: field.to_string(),
    reason: reason.to_string(),
  }
  .into()
}

/// Relative, non-empty, and never climbing out through `..`
fn is_contained(path: &Path) -> bool {
  !path.as_os_str().is_empty() && path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Substitute `{version}` and `{date}` in a template
pub fn render_template(template: &str, version: &Version, date: &str) -> String {
  template
    .replace("{version}", &version.to_string())
    .replace("{date}", date)
}
