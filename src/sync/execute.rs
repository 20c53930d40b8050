//! Sync execution - runs a plan against one context
//!
//! Steps run strictly in order. The first failure stops the remaining
//! steps; the plan's teardown step runs regardless.

use crate::error::{Error, Result};
use crate::exec::CommandRunner;
use crate::review::ReviewService;
use crate::sync::plan::{SyncPlan, SyncStep};
use crate::sync::progress::{Interaction, ProgressCallback};
use crate::sync::{PipelineContext, steps};
use tracing::{debug, warn};

/// Collaborators the steps talk to
pub struct SyncEnv<'a> {
    /// Review service queries
    pub review: &'a dyn ReviewService,
    /// External command execution (git, rm)
    pub runner: &'a dyn CommandRunner,
    /// Confirmation prompt
    pub interaction: &'a dyn Interaction,
    /// Progress output
    pub progress: &'a dyn ProgressCallback,
}

/// Steps that completed in a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Completed steps in execution order, teardown included
    pub completed: Vec<SyncStep>,
}

/// Run a single step
pub async fn execute_step(
    step: SyncStep,
    ctx: &mut PipelineContext,
    env: &SyncEnv<'_>,
) -> Result<()> {
    match step {
        SyncStep::FetchChange => steps::fetch_change_step(ctx, env).await,
        SyncStep::SplitMessage => steps::split_message_step(ctx),
        SyncStep::Reconcile => steps::reconcile_step(ctx, env).await,
        SyncStep::Preview => steps::preview_step(ctx, env).await,
        SyncStep::Confirm => steps::confirm_step(ctx, env).await,
        SyncStep::EnsureOpen => steps::ensure_open_step(ctx),
        SyncStep::Clone => steps::clone_step(ctx, env).await,
        SyncStep::FetchRevision => steps::fetch_revision_step(ctx, env).await,
        SyncStep::Checkout => steps::checkout_step(ctx, env).await,
        SyncStep::Amend => steps::amend_step(ctx, env).await,
        SyncStep::Push => steps::push_step(ctx, env).await,
        SyncStep::Cleanup => steps::cleanup_step(ctx, env).await,
    }
}

async fn run_reported(step: SyncStep, ctx: &mut PipelineContext, env: &SyncEnv<'_>) -> Result<()> {
    debug!(step = %step, "Starting step");
    env.progress.on_step_started(step).await;
    match execute_step(step, ctx, env).await {
        Ok(()) => {
            env.progress.on_step_finished(step).await;
            Ok(())
        }
        Err(e) => {
            debug!(step = %step, error = %e, "Step failed");
            env.progress.on_step_failed(step, &e).await;
            Err(e)
        }
    }
}

/// Execute `plan` against `ctx` (EFFECTFUL)
///
/// Returns the first error raised by a step. The teardown step always runs;
/// its error is returned only when every other step succeeded, otherwise it
/// is logged and the earlier error wins.
pub async fn execute_sync(
    plan: &SyncPlan,
    ctx: &mut PipelineContext,
    env: &SyncEnv<'_>,
) -> Result<SyncReport> {
    let mut report = SyncReport::default();
    let mut failure: Option<Error> = None;

    for &step in &plan.steps {
        match run_reported(step, ctx, env).await {
            Ok(()) => report.completed.push(step),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    let teardown = run_reported(plan.teardown, ctx, env).await;

    match (failure, teardown) {
        (None, Ok(())) => {
            report.completed.push(plan.teardown);
            Ok(report)
        }
        (None, Err(e)) => Err(e),
        (Some(e), Ok(())) => Err(e),
        (Some(e), Err(teardown_err)) => {
            warn!(error = %teardown_err, "Teardown failed after earlier error");
            env.progress
                .on_warning(&format!("{} also failed: {teardown_err}", plan.teardown))
                .await;
            Err(e)
        }
    }
}
