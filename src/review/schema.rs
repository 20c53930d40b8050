//! Validation of raw change records

use crate::error::{Error, Result};
use crate::types::{ChangeRecord, ChangeStatus};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireChange {
    project: String,
    number: WireNumber,
    commit_message: String,
    created_on: i64,
    open: bool,
    current_patch_set: WirePatchSet,
}

#[derive(Deserialize)]
struct WirePatchSet {
    revision: String,
    #[serde(rename = "ref")]
    reference: String,
    // Gerrit omits the field when nobody has voted
    #[serde(default)]
    approvals: Vec<serde_json::Value>,
}

/// Older Gerrit releases report the change number as a string
#[derive(Deserialize)]
#[serde(untagged)]
enum WireNumber {
    Int(u64),
    Text(String),
}

impl WireNumber {
    fn value(self) -> Result<u64> {
        match self {
            Self::Int(n) => Ok(n),
            Self::Text(s) => s
                .parse()
                .map_err(|_| Error::Schema(format!("change number '{s}' is not numeric"))),
        }
    }
}

/// Validate a raw `gerrit query` record into a [`ChangeRecord`]
///
/// Any missing or mistyped required field rejects the whole record.
pub fn parse_change_record(value: serde_json::Value) -> Result<ChangeRecord> {
    let wire: WireChange =
        serde_json::from_value(value).map_err(|e| Error::Schema(e.to_string()))?;

    let created_on: DateTime<Utc> = DateTime::from_timestamp(wire.created_on, 0)
        .ok_or_else(|| Error::Schema(format!("createdOn {} out of range", wire.created_on)))?;

    Ok(ChangeRecord {
        project: wire.project,
        number: wire.number.value()?,
        commit_message: wire.commit_message,
        revision: wire.current_patch_set.revision,
        revision_ref: wire.current_patch_set.reference,
        status: if wire.open {
            ChangeStatus::Open
        } else {
            ChangeStatus::Closed
        },
        created_on,
        approvals: wire.current_patch_set.approvals,
    })
}
