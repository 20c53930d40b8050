//! Sync pipeline
//!
//! One run threads a [`PipelineContext`] through the steps of a
//! [`SyncPlan`]:
//! 1. Gather - fetch the change and split its message (read-only)
//! 2. Reconcile - build the new message from current approvals (pure)
//! 3. Gate - preview and ask for confirmation
//! 4. Publish - clone, amend and push (effectful)
//! 5. Teardown - remove the working directory, always

mod context;
mod execute;
mod plan;
mod progress;
pub mod steps;

pub use context::PipelineContext;
pub use execute::{SyncEnv, SyncReport, execute_step, execute_sync};
pub use plan::{SyncPlan, SyncStep};
pub use progress::{FixedAnswer, Interaction, MessagePreview, NoopProgress, ProgressCallback};
