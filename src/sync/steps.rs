//! Step bodies
//!
//! Each function takes the shared context and the run environment and
//! either fills context fields or fails. They are dispatched by
//! [`execute_step`](super::execute_step) but can be called directly in tests.

use crate::error::{Error, Result};
use crate::git::GitRepository;
use crate::message::{build_reconciliation, split_ticket_lines};
use crate::review::fetch_change;
use crate::sync::{MessagePreview, PipelineContext, SyncEnv};
use crate::types::ApprovalRecord;
use crate::workdir::remove_work_dir;
use chrono::{DateTime, Utc};
use similar::TextDiff;
use tracing::{info, warn};

/// Query and validate the change
pub async fn fetch_change_step(ctx: &mut PipelineContext, env: &SyncEnv<'_>) -> Result<()> {
    let change = fetch_change(env.review, &ctx.config.change_id).await?;
    env.progress
        .on_message(&format!(
            "Change {} in {} ({}), patchset {}",
            change.number, change.project, change.status, change.revision_ref
        ))
        .await;
    ctx.change = Some(change);
    Ok(())
}

/// Extract the ticket lines from the current commit message
pub fn split_message_step(ctx: &mut PipelineContext) -> Result<()> {
    let lines = split_ticket_lines(&ctx.change()?.commit_message);
    ctx.ticket_lines = Some(lines);
    Ok(())
}

/// Author date for the amended commit: the newest accepted vote, or the
/// change creation time when nothing was accepted
pub fn commit_timestamp(approvals: &[ApprovalRecord], created_on: DateTime<Utc>) -> DateTime<Utc> {
    approvals
        .iter()
        .map(|a| a.granted_on)
        .max()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(created_on)
}

/// Build the approval block and candidate message
///
/// Reports skipped votes and the accepted approvals before deciding whether
/// anything changed.
pub async fn reconcile_step(ctx: &mut PipelineContext, env: &SyncEnv<'_>) -> Result<()> {
    let change = ctx.change()?;
    let reconciliation =
        build_reconciliation(&change.commit_message, ctx.ticket_lines()?, &change.approvals)?;

    for warning in &reconciliation.warnings {
        warn!(change = change.number, "{warning}");
        env.progress.on_warning(warning).await;
    }

    if reconciliation.accepted.is_empty() {
        env.progress.on_message("No approvals to record").await;
    }
    for approval in &reconciliation.accepted {
        info!(
            change = change.number,
            kind = %approval.kind,
            reviewer = %approval.email,
            "Accepted approval"
        );
        env.progress
            .on_message(&format!(
                "{}: {} <{}>",
                approval.kind, approval.name, approval.email
            ))
            .await;
    }

    if reconciliation.unchanged {
        return Err(Error::NoChangeNeeded);
    }

    let timestamp = commit_timestamp(&reconciliation.accepted, change.created_on);
    ctx.new_timestamp = Some(timestamp);
    ctx.approvals = Some(reconciliation.accepted);
    ctx.approval_block = Some(reconciliation.approval_block);
    ctx.new_message = Some(reconciliation.new_message);
    Ok(())
}

/// Unified diff between two commit messages
pub fn message_diff(original: &str, candidate: &str) -> String {
    TextDiff::from_lines(original, candidate)
        .unified_diff()
        .header("current", "new")
        .context_radius(3)
        .to_string()
}

/// Show the current message, the candidate and their diff
pub async fn preview_step(ctx: &PipelineContext, env: &SyncEnv<'_>) -> Result<()> {
    let change = ctx.change()?;
    let candidate = ctx.new_message()?;
    let preview = MessagePreview {
        change_number: change.number,
        original: change.commit_message.clone(),
        candidate: candidate.to_string(),
        diff: message_diff(&change.commit_message, candidate),
        timestamp: ctx.new_timestamp()?,
    };
    env.progress.on_preview(&preview).await;
    Ok(())
}

/// Ask the operator before anything is mutated
pub async fn confirm_step(ctx: &PipelineContext, env: &SyncEnv<'_>) -> Result<()> {
    let number = ctx.change()?.number;
    let prompt = format!("Push a new patchset of change {number} with this message?");
    if env.interaction.confirm(&prompt).await? {
        Ok(())
    } else {
        Err(Error::OperatorAbort)
    }
}

/// Fail if the change can no longer take new patchsets
pub fn ensure_open_step(ctx: &PipelineContext) -> Result<()> {
    let change = ctx.change()?;
    if change.is_open() {
        Ok(())
    } else {
        Err(Error::ChangeNotOpen(change.number))
    }
}

/// Clone the project into the working directory
pub async fn clone_step(ctx: &PipelineContext, env: &SyncEnv<'_>) -> Result<()> {
    let url = ctx.config.remote_url(&ctx.change()?.project);
    GitRepository::new(env.runner, &ctx.config.work_dir)
        .clone_remote(&url)
        .await
}

/// Fetch the current patchset ref
pub async fn fetch_revision_step(ctx: &PipelineContext, env: &SyncEnv<'_>) -> Result<()> {
    GitRepository::new(env.runner, &ctx.config.work_dir)
        .fetch(&ctx.change()?.revision_ref)
        .await
}

/// Check out the current patchset
pub async fn checkout_step(ctx: &PipelineContext, env: &SyncEnv<'_>) -> Result<()> {
    GitRepository::new(env.runner, &ctx.config.work_dir)
        .checkout(&ctx.change()?.revision)
        .await
}

/// Amend the commit with the reconciled message
pub async fn amend_step(ctx: &PipelineContext, env: &SyncEnv<'_>) -> Result<()> {
    GitRepository::new(env.runner, &ctx.config.work_dir)
        .amend(ctx.new_message()?, ctx.new_timestamp()?)
        .await
}

/// Push the amended commit as a new patchset
pub async fn push_step(ctx: &PipelineContext, env: &SyncEnv<'_>) -> Result<()> {
    let number = ctx.change()?.number;
    GitRepository::new(env.runner, &ctx.config.work_dir)
        .push_change(number)
        .await?;
    env.progress
        .on_message(&format!("Pushed new patchset of change {number}"))
        .await;
    Ok(())
}

/// Remove the working directory
pub async fn cleanup_step(ctx: &PipelineContext, env: &SyncEnv<'_>) -> Result<()> {
    remove_work_dir(env.runner, &ctx.config.work_dir).await
}
