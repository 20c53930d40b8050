//! `gerrit query` over SSH

use crate::error::{Error, Result};
use crate::exec::{CommandRunner, CommandSpec, run_checked};
use crate::review::ReviewService;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Review service queried through `ssh <user>@<host> gerrit query`
pub struct SshReviewService {
    runner: Arc<dyn CommandRunner>,
    host: String,
    port: u16,
    user: String,
}

impl SshReviewService {
    /// Create a new SSH-backed review service
    pub fn new(runner: Arc<dyn CommandRunner>, host: String, port: u16, user: String) -> Self {
        Self {
            runner,
            host,
            port,
            user,
        }
    }

    /// The `ssh ... gerrit query` command for `change_id`
    pub fn query_command(&self, change_id: &str) -> CommandSpec {
        CommandSpec::new("ssh")
            .args(["-o", "BatchMode=yes", "-p"])
            .arg(self.port.to_string())
            .arg(format!("{}@{}", self.user, self.host))
            .args(["gerrit", "query", "--format=JSON", "--current-patch-set"])
            .arg(format!("change:{change_id}"))
    }
}

/// Split `gerrit query --format=JSON` output into change records
///
/// The output is one JSON object per line; the final `stats` row carries the
/// row count and is dropped. An `error` row is surfaced as a review API error.
pub(crate) fn parse_query_output(stdout: &str) -> Result<Vec<serde_json::Value>> {
    let mut records = Vec::new();
    let mut row_count = None;

    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        let value: serde_json::Value = serde_json::from_str(line)?;
        match value.get("type").and_then(serde_json::Value::as_str) {
            Some("stats") => {
                row_count = value.get("rowCount").and_then(serde_json::Value::as_u64);
            }
            Some("error") => {
                let message = value
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("unknown error");
                return Err(Error::ReviewApi(message.to_string()));
            }
            _ => records.push(value),
        }
    }

    if let Some(count) = row_count {
        if usize::try_from(count).ok() != Some(records.len()) {
            warn!(
                row_count = count,
                records = records.len(),
                "Query stats disagree with returned records"
            );
        }
    }

    Ok(records)
}

#[async_trait]
impl ReviewService for SshReviewService {
    async fn query_changes(&self, change_id: &str) -> Result<Vec<serde_json::Value>> {
        let command = self.query_command(change_id);
        debug!(host = %self.host, change = change_id, "Querying change over SSH");
        let output = run_checked(self.runner.as_ref(), "query", &command).await?;
        parse_query_output(&output.stdout)
    }
}
