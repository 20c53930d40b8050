//! Review service access
//!
//! Provides a single query interface over Gerrit's SSH command channel and
//! its REST API. Both transports hand back change records in the shape of
//! `gerrit query --format=JSON`, which [`parse_change_record`] validates.

mod factory;
mod rest;
mod schema;
mod ssh;

pub use factory::create_review_service;
pub use rest::{RestReviewService, parse_gerrit_timestamp};
pub use schema::parse_change_record;
pub use ssh::SshReviewService;

use crate::error::{Error, Result};
use crate::types::ChangeRecord;
use async_trait::async_trait;
use tracing::debug;

/// Query interface to the review service
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Return every change record matching `change_id`
    ///
    /// Records are unvalidated JSON objects in `gerrit query` shape.
    async fn query_changes(&self, change_id: &str) -> Result<Vec<serde_json::Value>>;
}

/// Fetch and validate the single change identified by `change_id`
///
/// Zero or several matches is a [`Error::Lookup`].
pub async fn fetch_change(service: &dyn ReviewService, change_id: &str) -> Result<ChangeRecord> {
    let mut records = service.query_changes(change_id).await?;
    debug!(change = change_id, count = records.len(), "Queried change records");

    if records.len() != 1 {
        return Err(Error::Lookup {
            change: change_id.to_string(),
            count: records.len(),
        });
    }

    parse_change_record(records.remove(0))
}
