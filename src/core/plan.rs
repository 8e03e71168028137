//! Deploy plans: the ordered steps of a release, reviewable before they run
//!
//! Every deploy produces a `DeployPlan` before anything is touched, enabling:
//!
//! - **Dry-run mode**: Show what will happen without actually doing it
//! - **Confirmation**: The user approves the exact steps that will run
//! - **Auditability**: Plans are JSON-serializable for logging/review
//!
//! # Architecture
//!
//! ```text
//! deploy command
//!   ↓
//! DeployPlan (what to do)
//!   ↓
//! Executor (run the steps, stop at the first failure)
//! ```

use crate::core::context::DeployContext;
use crate::core::config::render_template;
use crate::core::error::ShipResult;
use crate::core::version::Version;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

/// Plan identifier (SHA256 hash of the plan's steps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanId(String);

impl PlanId {
  /// Create a plan ID from plan contents
  pub fn from_contents(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let result = hasher.finalize();
    Self(format!("{:x}", result))
  }

  /// Get the short ID (first 12 characters)
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for PlanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// One deploy step
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
  /// Switch to the deploy branch
  Checkout { branch: String },

  /// Run the build command in the repo root
  Build { command: Vec<String> },

  /// Move the built artifact into the repo
  MoveArtifact { source: PathBuf, dest: PathBuf },

  /// Stage the artifact directory and commit it
  Commit { paths: Vec<PathBuf>, message: String },

  /// Push the deploy branch
  Push { remote: String, branch: String },

  /// Create an annotated tag at HEAD
  Tag { name: String, message: String },

  /// Push the tag
  PushTag { remote: String, tag: String },

  /// Switch back to the branch the deploy started on
  RestoreBranch { branch: String },

  /// Record the new version (and mirror it into the manifest, if any)
  WriteVersion {
    path: PathBuf,
    version: Version,
    manifest: Option<PathBuf>,
  },
}

impl Step {
  /// Short name used in progress lines and error context
  pub fn name(&self) -> &'static str {
    match self {
      Step::Checkout { .. } => "checkout",
      Step::Build { .. } => "build",
      Step::MoveArtifact { .. } => "move artifact",
      Step::Commit { .. } => "commit",
      Step::Push { .. } => "push",
      Step::Tag { .. } => "tag",
      Step::PushTag { .. } => "push tag",
      Step::RestoreBranch { .. } => "restore branch",
      Step::WriteVersion { .. } => "write version",
    }
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Step::Checkout { branch } => write!(f, "Checkout branch {}", branch),
      Step::Build { command } => write!(f, "Build: {}", command.join(" ")),
      Step::MoveArtifact { source, dest } => write!(f, "Move {} → {}/", source.display(), dest.display()),
      Step::Commit { message, .. } => write!(f, "Commit: {}", message),
      Step::Push { remote, branch } => write!(f, "Push to {}/{}", remote, branch),
      Step::Tag { name, .. } => write!(f, "Create tag {}", name),
      Step::PushTag { remote, tag } => write!(f, "Push tag {} to {}", tag, remote),
      Step::RestoreBranch { branch } => write!(f, "Checkout branch {}", branch),
      Step::WriteVersion { path, version, manifest } => {
        write!(f, "Record version {} in {}", version, path.display())?;
        if let Some(manifest) = manifest {
          write!(f, " and {}", manifest.display())?;
        }
        Ok(())
      }
    }
  }
}

/// A deploy plan: everything `ship deploy` will do, in order
#[derive(Debug, Clone, Serialize)]
pub struct DeployPlan {
  pub id: PlanId,
  pub current: Version,
  pub version: Version,
  pub tag: String,
  pub steps: Vec<Step>,
}

impl DeployPlan {
  /// Assemble the steps for deploying `version` in `ctx`
  pub fn build(ctx: &DeployContext, version: Version, date: &str) -> ShipResult<Self> {
    let config = &ctx.config;
    let artifact = config.require_artifact()?;
    let tag = config.tag_name(&version);

    let mut steps = vec![
      Step::Checkout {
        branch: config.branch.clone(),
      },
      Step::Build {
        command: config.build.command.clone(),
      },
      Step::MoveArtifact {
        source: artifact.source.clone(),
        dest: artifact.dest.clone(),
      },
      Step::Commit {
        paths: vec![artifact.dest.clone()],
        message: render_template(&config.commit_message, &version, date),
      },
      Step::Push {
        remote: config.remote.clone(),
        branch: config.branch.clone(),
      },
      Step::Tag {
        name: tag.clone(),
        message: render_template(&config.tag_message, &version, date),
      },
      Step::PushTag {
        remote: config.remote.clone(),
        tag: tag.clone(),
      },
    ];

    if config.return_to_branch && ctx.start_branch != config.branch && ctx.start_branch != "HEAD" {
      steps.push(Step::RestoreBranch {
        branch: ctx.start_branch.clone(),
      });
    }

    steps.push(Step::WriteVersion {
      path: config.version_file.clone(),
      version,
      manifest: config.manifest.clone(),
    });

    let json = serde_json::to_vec(&steps)?;

    Ok(Self {
      id: PlanId::from_contents(&json),
      current: ctx.current,
      version,
      tag,
      steps,
    })
  }

  /// Serialize to JSON
  pub fn to_json(&self) -> ShipResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Get human-readable representation
  pub fn to_human_readable(&self) -> String {
    let mut output = String::new();

    output.push_str(&format!("📋 Deploy plan ({})\n", self.id));
    output.push_str(&format!("   Current:  {}\n", self.current));
    output.push_str(&format!("   Release:  {} (tag {})\n", self.version, self.tag));
    output.push_str(&format!("\n   Steps ({}):\n", self.steps.len()));

    for (i, step) in self.steps.iter().enumerate() {
      output.push_str(&format!("   {}. {}\n", i + 1, step));
    }

    output
  }
}
