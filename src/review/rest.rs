//! Gerrit REST API transport

use crate::error::{Error, Result};
use crate::review::ReviewService;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

/// Prefix Gerrit puts in front of every JSON response to defeat XSSI
const XSSI_PREFIX: &str = ")]}'";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Labels to request along with the change
const QUERY_OPTIONS: &[&str] = &[
    "CURRENT_REVISION",
    "CURRENT_COMMIT",
    "DETAILED_LABELS",
    "DETAILED_ACCOUNTS",
];

#[derive(Deserialize)]
struct RestChange {
    project: String,
    #[serde(rename = "_number")]
    number: u64,
    status: String,
    created: String,
    current_revision: String,
    revisions: BTreeMap<String, RestRevision>,
    #[serde(default)]
    labels: BTreeMap<String, RestLabel>,
}

#[derive(Deserialize)]
struct RestRevision {
    #[serde(rename = "ref")]
    reference: String,
    commit: RestCommit,
}

#[derive(Deserialize)]
struct RestCommit {
    message: String,
}

#[derive(Deserialize)]
struct RestLabel {
    #[serde(default)]
    all: Vec<RestVote>,
}

#[derive(Deserialize)]
struct RestVote {
    value: Option<i64>,
    date: Option<String>,
    name: Option<String>,
    email: Option<String>,
}

/// Parse a Gerrit timestamp (`2024-01-02 03:04:05.000000000`, UTC) to Unix seconds
pub fn parse_gerrit_timestamp(raw: &str) -> Result<i64> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|e| Error::Schema(format!("bad timestamp '{raw}': {e}")))
}

/// Review service backed by the Gerrit REST API
pub struct RestReviewService {
    client: Client,
    base_url: Url,
    credentials: Option<(String, String)>,
}

impl RestReviewService {
    /// Create a new REST service
    ///
    /// With `credentials` set, requests go to the authenticated `/a/` endpoints.
    pub fn new(base_url: &str, credentials: Option<(String, String)>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid http_url '{base_url}': {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent("approval-sync")
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::ReviewApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// URL of the change query for `change_id`
    pub fn query_url(&self, change_id: &str) -> String {
        let prefix = if self.credentials.is_some() { "a/" } else { "" };
        let query = urlencoding::encode(&format!("change:{change_id}")).into_owned();
        let options: String = QUERY_OPTIONS.iter().map(|o| format!("&o={o}")).collect();
        format!("{}{prefix}changes/?q={query}{options}", self.base_url)
    }
}

/// Map one REST change onto the `gerrit query --format=JSON` record shape
fn to_query_record(change: RestChange) -> Result<serde_json::Value> {
    let revision = change
        .revisions
        .get(&change.current_revision)
        .ok_or_else(|| {
            Error::Schema(format!(
                "current revision {} missing from revisions",
                change.current_revision
            ))
        })?;

    let mut approvals = Vec::new();
    for (label, detail) in &change.labels {
        for vote in &detail.all {
            // Reviewers who can vote but have not appear with value 0 and no date
            let (Some(value), Some(date)) = (vote.value, vote.date.as_deref()) else {
                continue;
            };
            if value == 0 {
                continue;
            }
            let mut by = serde_json::Map::new();
            if let Some(ref name) = vote.name {
                by.insert("name".to_string(), json!(name));
            }
            if let Some(ref email) = vote.email {
                by.insert("email".to_string(), json!(email));
            }
            approvals.push(json!({
                "type": label,
                "value": value.to_string(),
                "grantedOn": parse_gerrit_timestamp(date)?,
                "by": by,
            }));
        }
    }

    Ok(json!({
        "project": change.project,
        "number": change.number,
        "commitMessage": revision.commit.message,
        "createdOn": parse_gerrit_timestamp(&change.created)?,
        "open": change.status == "NEW",
        "currentPatchSet": {
            "revision": change.current_revision,
            "ref": revision.reference,
            "approvals": approvals,
        },
    }))
}

/// Strip the XSSI guard and decode a list of changes
pub(crate) fn parse_rest_response(body: &str) -> Result<Vec<serde_json::Value>> {
    let body = body.strip_prefix(XSSI_PREFIX).unwrap_or(body);
    let changes: Vec<RestChange> =
        serde_json::from_str(body).map_err(|e| Error::Schema(e.to_string()))?;
    changes.into_iter().map(to_query_record).collect()
}

#[async_trait]
impl ReviewService for RestReviewService {
    async fn query_changes(&self, change_id: &str) -> Result<Vec<serde_json::Value>> {
        let url = self.query_url(change_id);
        debug!(url = %url, "Querying change over REST");

        let mut request = self.client.get(&url);
        if let Some((ref user, ref password)) = self.credentials {
            request = request.basic_auth(user, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::ReviewApi(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::ReviewApi(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Error::ReviewApi(format!("{status}: {}", body.trim())));
        }

        parse_rest_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#")]}'
[{
  "project": "tools/widget",
  "_number": 4711,
  "status": "NEW",
  "created": "2023-11-14 22:13:20.000000000",
  "current_revision": "abc",
  "revisions": {"abc": {"ref": "refs/changes/11/4711/2", "commit": {"message": "Fix bug\n"}}},
  "labels": {
    "Code-Review": {"all": [
      {"value": 1, "date": "2023-11-14 22:13:30.000000000", "name": "A", "email": "a@x"},
      {"value": 0, "name": "Idle", "email": "idle@x"}
    ]},
    "CI-Testing": {"all": [{"value": -1, "date": "2023-11-14 22:13:25.000000000", "name": "Bot"}]}
  }
}]
"#;

    #[test]
    fn test_parse_gerrit_timestamp() {
        assert_eq!(
            parse_gerrit_timestamp("2023-11-14 22:13:20.000000000").unwrap(),
            1_700_000_000
        );
        assert!(parse_gerrit_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_rest_response_maps_to_query_shape() {
        let records = parse_rest_response(BODY).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["number"], 4711);
        assert_eq!(record["open"], true);
        assert_eq!(record["createdOn"], 1_700_000_000);
        assert_eq!(record["currentPatchSet"]["ref"], "refs/changes/11/4711/2");

        let approvals = record["currentPatchSet"]["approvals"].as_array().unwrap();
        // Idle reviewer dropped; labels come out in name order
        assert_eq!(approvals.len(), 2);
        assert_eq!(approvals[0]["type"], "CI-Testing");
        assert_eq!(approvals[0]["value"], "-1");
        assert!(approvals[0]["by"].get("email").is_none());
        assert_eq!(approvals[1]["type"], "Code-Review");
        assert_eq!(approvals[1]["grantedOn"], 1_700_000_010);
        assert_eq!(approvals[1]["by"]["email"], "a@x");
    }

    #[test]
    fn test_record_passes_schema_validation() {
        let records = parse_rest_response(BODY).unwrap();
        let change = crate::review::parse_change_record(records[0].clone()).unwrap();
        assert_eq!(change.revision, "abc");
        assert_eq!(change.commit_message, "Fix bug\n");
    }

    #[test]
    fn test_missing_current_revision_is_schema_error() {
        let body = r#")]}'
[{"project":"p","_number":1,"status":"NEW","created":"2023-11-14 22:13:20.000000000",
  "current_revision":"zzz","revisions":{}}]"#;
        assert!(matches!(parse_rest_response(body), Err(Error::Schema(_))));
    }

    #[test]
    fn test_query_url_uses_authenticated_prefix() {
        let service = RestReviewService::new(
            "https://review.example.org",
            Some(("alice".to_string(), "secret".to_string())),
        )
        .unwrap();
        let url = service.query_url("4711");
        assert!(url.starts_with("https://review.example.org/a/changes/?q=change%3A4711"));
        assert!(url.contains("&o=DETAILED_LABELS"));

        let anonymous = RestReviewService::new("https://review.example.org/gerrit", None).unwrap();
        assert!(
            anonymous
                .query_url("4711")
                .starts_with("https://review.example.org/gerrit/changes/")
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        assert!(matches!(
            RestReviewService::new("not a url", None),
            Err(Error::Config(_))
        ));
    }
}
