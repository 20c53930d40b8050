//! Shared fixtures for approval-sync tests

#![allow(dead_code)]

mod mock_services;

pub use mock_services::{
    MockReviewService, MockRunner, ProgressEvent, RecordingProgress, ScriptedInteraction,
};

use approval_sync::config::RunConfig;
use approval_sync::types::Transport;
use approval_sync::workdir::work_dir_for;
use serde_json::{Value, json};

/// Change number used by the fixtures
pub const CHANGE_NUMBER: u64 = 4711;

/// A vote in `gerrit query` shape
pub fn vote(kind: &str, value: &str, name: &str, email: &str, granted: i64) -> Value {
    json!({
        "type": kind,
        "description": kind,
        "value": value,
        "grantedOn": granted,
        "by": {"name": name, "email": email, "username": name.to_lowercase()}
    })
}

/// A change record in `gerrit query` shape
pub fn change_json(message: &str, approvals: Vec<Value>) -> Value {
    json!({
        "project": "tools/widget",
        "branch": "main",
        "id": "I0123456789abcdef0123456789abcdef01234567",
        "number": CHANGE_NUMBER,
        "subject": message.lines().next().unwrap_or_default(),
        "commitMessage": message,
        "createdOn": 1_700_000_000,
        "open": true,
        "status": "NEW",
        "currentPatchSet": {
            "number": 3,
            "revision": "5ca1ab1e",
            "ref": "refs/changes/11/4711/3",
            "approvals": approvals
        }
    })
}

/// The two-approval change from the worked example
pub fn example_change() -> Value {
    change_json(
        "Fix bug\n\nTICKET-1",
        vec![
            vote("Code-Review", "1", "A", "a@x", 10),
            vote("Integration-Approval", "1", "B", "b@x", 5),
        ],
    )
}

/// Run settings pointing at a fixed working directory
pub fn run_config() -> RunConfig {
    RunConfig {
        host: "review.example.org".to_string(),
        port: 29418,
        user: "alice".to_string(),
        change_id: CHANGE_NUMBER.to_string(),
        work_dir: work_dir_for(4242),
        transport: Transport::Ssh,
        http_url: None,
        http_password: None,
    }
}
