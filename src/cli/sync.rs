//! Sync command - record current approvals in a change's commit message

use crate::cli::context::CommandContext;
use crate::cli::style::{CHECK, Stylize};
use crate::cli::{CliProgress, DialoguerInteraction};
use anstream::println;
use approval_sync::config::Overrides;
use approval_sync::error::Result;
use approval_sync::sync::{PipelineContext, SyncEnv, SyncPlan, execute_sync};
use std::path::Path;

/// Run the sync command
pub async fn run_sync(change_id: &str, config_path: Option<&Path>, overrides: Overrides) -> Result<()> {
    let ctx = CommandContext::new(change_id, config_path, overrides)?;

    println!(
        "{} {} {}",
        "Syncing approvals for change".emphasis(),
        ctx.config.change_id.accent(),
        format!("on {}", ctx.config.host).muted()
    );

    let progress = CliProgress::default();
    let env = SyncEnv {
        review: ctx.review.as_ref(),
        runner: ctx.runner.as_ref(),
        interaction: &DialoguerInteraction,
        progress: &progress,
    };

    let mut pipeline = PipelineContext::new(ctx.config.clone());
    execute_sync(&SyncPlan::standard(), &mut pipeline, &env).await?;

    println!();
    println!(
        "{} {}",
        format!("{CHECK} Sync complete:").success(),
        format!(
            "{} approval(s) recorded",
            pipeline.approvals.as_ref().map_or(0, Vec::len)
        )
        .accent()
    );
    Ok(())
}
