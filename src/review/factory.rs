//! Review service factory

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::exec::CommandRunner;
use crate::review::{RestReviewService, ReviewService, SshReviewService};
use crate::types::Transport;
use std::sync::Arc;

/// Create the review service selected by `config.transport`
pub fn create_review_service(
    config: &RunConfig,
    runner: Arc<dyn CommandRunner>,
) -> Result<Box<dyn ReviewService>> {
    match config.transport {
        Transport::Ssh => Ok(Box::new(SshReviewService::new(
            runner,
            config.host.clone(),
            config.port,
            config.user.clone(),
        ))),
        Transport::Http => {
            let url = config
                .http_url
                .as_deref()
                .ok_or_else(|| Error::Config("http transport requires http_url".to_string()))?;
            let credentials = config
                .http_password
                .as_ref()
                .map(|password| (config.user.clone(), password.clone()));
            Ok(Box::new(RestReviewService::new(url, credentials)?))
        }
    }
}
