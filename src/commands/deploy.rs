//! `ship deploy` - bump, build, tag and push a release
//!
//! Sequence: validate input → confirm with user → checkout branch → build →
//! move artifact → commit & push → tag & push tag → record the new version.

use crate::core::context::DeployContext;
use crate::core::error::{ShipError, ShipResult, ValidationError};
use crate::core::executor::Executor;
use crate::core::plan::DeployPlan;
use crate::core::version::{BumpPart, Version};
use crate::ui::prompt;
use std::env;
use std::path::PathBuf;

/// Run the deploy command
pub fn run_deploy(
  version: Option<String>,
  bump: Option<BumpPart>,
  yes: bool,
  dry_run: bool,
  json: bool,
) -> ShipResult<()> {
  let cwd = env::current_dir()?;
  let ctx = DeployContext::build(&cwd)?;

  let requested = requested_version(ctx.current, version.as_deref(), bump)?;
  ctx.current.ensure_newer(requested)?;

  let date = chrono::Utc::now().format("%Y-%m-%d").to_string();
  let plan = DeployPlan::build(&ctx, requested, &date)?;

  preflight(&ctx, &plan)?;

  if json {
    println!("{}", plan.to_json()?);
    return Ok(());
  }

  print!("{}", plan.to_human_readable());

  if dry_run {
    println!();
    println!("🔍 Dry-run mode (no changes applied)");
    return Ok(());
  }

  if !yes && !prompt::confirm(&format!("Deploy {}?", plan.version))? {
    println!("❌ Deploy cancelled");
    return Ok(());
  }

  println!();
  println!("🚀 Deploying {}...", plan.version);
  Executor::new(&ctx).run(&plan)?;

  println!();
  println!("✅ Released {} ({})", plan.version, plan.tag);
  println!("   {} → {}", ctx.current, plan.version);
  println!("   Pushed {} and {} to {}", ctx.config.branch, plan.tag, ctx.config.remote);

  Ok(())
}

/// Resolve the version being deployed from an explicit string or a bump
fn requested_version(current: Version, explicit: Option<&str>, bump: Option<BumpPart>) -> ShipResult<Version> {
  match (explicit, bump) {
    (Some(v), None) => Ok(v.parse::<Version>()?),
    (None, Some(part)) => Ok(current.bump(part)?),
    (Some(_), Some(_)) => Err(ShipError::message("Specify either a version or --bump, not both")),
    (None, None) => Err(ShipError::with_help(
      "No version given",
      "Pass the new version (`ship deploy 1.4.0`) or a bump (`ship deploy --bump minor`).",
    )),
  }
}

/// Check everything the plan relies on before the first step runs
fn preflight(ctx: &DeployContext, plan: &DeployPlan) -> ShipResult<()> {
  let git = &ctx.git;
  let config = &ctx.config;

  if !git.has_remote(&config.remote)? {
    return Err(
      ValidationError::RemoteMissing {
        remote: config.remote.clone(),
      }
      .into(),
    );
  }

  if !git.branch_exists(&config.branch, &config.remote)? {
    return Err(
      ValidationError::BranchMissing {
        branch: config.branch.clone(),
        remote: config.remote.clone(),
      }
      .into(),
    );
  }

  if git.tag_exists(&plan.tag)? {
    return Err(ValidationError::TagExists { tag: plan.tag.clone() }.into());
  }

  if git.remote_tag_exists(&config.remote, &plan.tag)? {
    return Err(
      ValidationError::RemoteTagExists {
        tag: plan.tag.clone(),
        remote: config.remote.clone(),
      }
      .into(),
    );
  }

  let allowed = ctx.bookkeeping_paths();
  let dirty: Vec<String> = git
    .dirty_paths()?
    .into_iter()
    .filter(|p| !allowed.contains(&PathBuf::from(p)))
    .collect();

  if !dirty.is_empty() {
    return Err(ValidationError::DirtyTree { paths: dirty }.into());
  }

  tracing::debug!(tag = %plan.tag, "preflight passed");
  Ok(())
}
