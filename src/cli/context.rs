//! Shared setup for a CLI run
//!
//! Loads configuration, applies command-line overrides and builds the
//! collaborators the sync pipeline needs.

use approval_sync::config::{Overrides, RunConfig, load_config};
use approval_sync::error::Result;
use approval_sync::exec::{CommandRunner, TokioCommandRunner};
use approval_sync::review::{ReviewService, create_review_service};
use approval_sync::workdir::work_dir_for_process;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Everything a sync run needs besides terminal I/O
pub struct CommandContext {
    /// Resolved settings for this run
    pub config: RunConfig,
    /// Runner for git/ssh/rm
    pub runner: Arc<dyn CommandRunner>,
    /// Review service for the configured transport
    pub review: Box<dyn ReviewService>,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// - Load the config file (explicit path or default location)
    /// - Apply command-line overrides
    /// - Resolve user, host and working directory
    /// - Create the review service
    pub fn new(change_id: &str, config_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let config = load_config(config_path)?
            .merge(overrides)
            .resolve(change_id, work_dir_for_process(), |key| std::env::var(key).ok())?;
        debug!(
            host = %config.host,
            user = %config.user,
            transport = %config.transport,
            work_dir = %config.work_dir.display(),
            "Resolved configuration"
        );

        let runner: Arc<dyn CommandRunner> = Arc::new(TokioCommandRunner);
        let review = create_review_service(&config, Arc::clone(&runner))?;

        Ok(Self {
            config,
            runner,
            review,
        })
    }
}
