//! Plan execution: run each step in order, stop at the first failure
//!
//! There is no rollback. A failed step leaves the repository exactly as that
//! step left it, and the error names the step so the user can finish by hand.

use crate::build;
use crate::cargo;
use crate::core::context::DeployContext;
use crate::core::error::ShipResult;
use crate::core::plan::{DeployPlan, Step};

pub struct Executor<'a> {
  ctx: &'a DeployContext,
}

impl<'a> Executor<'a> {
  pub fn new(ctx: &'a DeployContext) -> Self {
    Self { ctx }
  }

  /// Run every step of `plan`
  pub fn run(&self, plan: &DeployPlan) -> ShipResult<()> {
    let total = plan.steps.len();

    for (i, step) in plan.steps.iter().enumerate() {
      let n = i + 1;
      println!("   [{}/{}] {}", n, total, step);
      tracing::info!(step = step.name(), index = n, total, "executing step");

      if let Err(err) = self.run_step(step) {
        eprintln!("   ✗ Step {}/{} ({}) failed", n, total, step.name());
        tracing::error!(step = step.name(), index = n, total, "step failed");
        return Err(err.context(format!("Deploy stopped at step {}/{} ({})", n, total, step.name())));
      }
    }

    Ok(())
  }

  fn run_step(&self, step: &Step) -> ShipResult<()> {
    let git = &self.ctx.git;

    match step {
      Step::Checkout { branch } | Step::RestoreBranch { branch } => git.checkout(branch),
      Step::Build { command } => build::run_build(command, &self.ctx.root),
      Step::MoveArtifact { source, dest } => {
        let target = build::move_artifact(&self.ctx.resolve(source), &self.ctx.resolve(dest))?;
        tracing::debug!(artifact = %target.display(), "artifact in place");
        Ok(())
      }
      Step::Commit { paths, message } => {
        for path in paths {
          git.add(path)?;
        }
        let sha = git.commit(message)?;
        println!("         {}", &sha[..12.min(sha.len())]);
        Ok(())
      }
      Step::Push { remote, branch } => git.push(remote, branch),
      Step::Tag { name, message } => git.create_annotated_tag(name, message),
      Step::PushTag { remote, tag } => git.push(remote, &format!("refs/tags/{}", tag)),
      Step::WriteVersion {
        path,
        version,
        manifest,
      } => {
        version.save(&self.ctx.resolve(path))?;
        if let Some(manifest) = manifest {
          cargo::set_package_version(&self.ctx.resolve(manifest), version)?;
        }
        Ok(())
      }
    }
  }
}
