//! Progress reporting and operator interaction

use crate::error::{Error, Result};
use crate::sync::SyncStep;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Everything shown to the operator before the confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePreview {
    /// Change number
    pub change_number: u64,
    /// Current commit message
    pub original: String,
    /// Message that would be pushed
    pub candidate: String,
    /// Unified diff from `original` to `candidate`
    pub diff: String,
    /// Author date the amended commit will carry
    pub timestamp: DateTime<Utc>,
}

/// Callback for progress updates during a sync run
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// A step is about to run
    async fn on_step_started(&self, step: SyncStep);

    /// A step completed successfully
    async fn on_step_finished(&self, step: SyncStep);

    /// A step failed
    async fn on_step_failed(&self, step: SyncStep, error: &Error);

    /// Informational message
    async fn on_message(&self, message: &str);

    /// Non-fatal warning
    async fn on_warning(&self, message: &str);

    /// Original/candidate message and diff, before confirmation
    async fn on_preview(&self, preview: &MessagePreview);
}

/// No-op progress callback for silent operation
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_step_started(&self, _step: SyncStep) {}
    async fn on_step_finished(&self, _step: SyncStep) {}
    async fn on_step_failed(&self, _step: SyncStep, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
    async fn on_warning(&self, _message: &str) {}
    async fn on_preview(&self, _preview: &MessagePreview) {}
}

/// Operator interaction used by the confirmation gate
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Ask a yes/no question; `true` only for an explicit yes
    async fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Interaction that always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

#[async_trait]
impl Interaction for FixedAnswer {
    async fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}
