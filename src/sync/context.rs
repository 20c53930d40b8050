//! Shared state threaded through every step of a run

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::types::{ApprovalRecord, ChangeRecord};
use chrono::{DateTime, Utc};

/// Mutable state of one sync run
///
/// Created with every derived field empty; steps fill fields in as they
/// complete and never clear them.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Settings for this run
    pub config: RunConfig,
    /// Change as fetched from the review service
    pub change: Option<ChangeRecord>,
    /// Ticket lines of the current message
    pub ticket_lines: Option<Vec<String>>,
    /// Approvals accepted into the message, in trailer order
    pub approvals: Option<Vec<ApprovalRecord>>,
    /// Rendered trailer block
    pub approval_block: Option<String>,
    /// Message to publish
    pub new_message: Option<String>,
    /// Author date of the amended commit
    pub new_timestamp: Option<DateTime<Utc>>,
}

fn missing(what: &str) -> Error {
    Error::Internal(format!("{what} not available yet"))
}

impl PipelineContext {
    /// Fresh context for `config`
    pub const fn new(config: RunConfig) -> Self {
        Self {
            config,
            change: None,
            ticket_lines: None,
            approvals: None,
            approval_block: None,
            new_message: None,
            new_timestamp: None,
        }
    }

    /// The fetched change
    pub fn change(&self) -> Result<&ChangeRecord> {
        self.change.as_ref().ok_or_else(|| missing("change record"))
    }

    /// The ticket lines
    pub fn ticket_lines(&self) -> Result<&[String]> {
        self.ticket_lines
            .as_deref()
            .ok_or_else(|| missing("ticket lines"))
    }

    /// The message to publish
    pub fn new_message(&self) -> Result<&str> {
        self.new_message
            .as_deref()
            .ok_or_else(|| missing("new commit message"))
    }

    /// The author date for the amended commit
    pub fn new_timestamp(&self) -> Result<DateTime<Utc>> {
        self.new_timestamp.ok_or_else(|| missing("new commit timestamp"))
    }
}
