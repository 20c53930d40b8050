//! Approval reconciliation - pure functions
//!
//! Turns the raw approval list of a change into the canonical trailer block
//! and the commit message that should replace the current one. No I/O
//! happens here.

use crate::error::{Error, Result};
use crate::types::{ApprovalRecord, ApprovalType};
use serde_json::Value;

/// Outcome of reconciling approvals against a commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Approvals that made it into the message, in trailer order
    pub accepted: Vec<ApprovalRecord>,
    /// Rendered trailer block (one line per approval, each newline-terminated)
    pub approval_block: String,
    /// Commit message to publish
    pub new_message: String,
    /// Non-fatal notes about skipped approvals
    pub warnings: Vec<String>,
    /// Whether `new_message` equals the current message
    pub unchanged: bool,
}

/// A validated entry before type filtering
struct Candidate<'a> {
    index: usize,
    kind: ApprovalType,
    name: &'a str,
    email: Option<&'a str>,
    value: String,
    granted_on: i64,
}

fn parse_error(index: usize, reason: impl Into<String>) -> Error {
    Error::ApprovalParse {
        index,
        reason: reason.into(),
    }
}

fn validate(index: usize, raw: &Value) -> Result<Candidate<'_>> {
    let entry = raw
        .as_object()
        .ok_or_else(|| parse_error(index, "entry is not an object"))?;

    let granted_on = entry
        .get("grantedOn")
        .and_then(Value::as_i64)
        .ok_or_else(|| parse_error(index, "missing or non-numeric grantedOn"))?;

    let by = entry
        .get("by")
        .and_then(Value::as_object)
        .ok_or_else(|| parse_error(index, "missing reviewer"))?;
    let name = by
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| parse_error(index, "missing reviewer name"))?;

    let label = entry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| parse_error(index, "missing approval type"))?;
    let kind = ApprovalType::from_label(label)
        .ok_or_else(|| parse_error(index, format!("unknown approval type '{label}'")))?;

    let value = match entry.get("value") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(parse_error(index, "missing approval value")),
    };

    Ok(Candidate {
        index,
        kind,
        name,
        email: by.get("email").and_then(Value::as_str),
        value,
        granted_on,
    })
}

/// Whether `value` is exactly a +1 vote
pub fn is_plus_one(value: &str) -> bool {
    matches!(value.trim(), "1" | "+1")
}

/// Validate, filter and sort raw approvals (PURE)
///
/// Returns the accepted approvals in trailer order plus warnings for
/// votes that were skipped because they are not +1.
pub fn accept_approvals(raw: &[Value]) -> Result<(Vec<ApprovalRecord>, Vec<String>)> {
    let candidates = raw
        .iter()
        .enumerate()
        .map(|(index, value)| validate(index, value))
        .collect::<Result<Vec<_>>>()?;

    let mut accepted = Vec::new();
    let mut warnings = Vec::new();

    for candidate in candidates.into_iter().filter(|c| c.kind.is_recorded()) {
        let email = candidate
            .email
            .ok_or_else(|| parse_error(candidate.index, "missing reviewer email"))?;

        if !is_plus_one(&candidate.value) {
            warnings.push(format!(
                "skipping {} {} from {} <{}>",
                candidate.kind, candidate.value, candidate.name, email
            ));
            continue;
        }

        accepted.push(ApprovalRecord {
            kind: candidate.kind,
            name: candidate.name.to_string(),
            email: email.to_string(),
            value: candidate.value,
            granted_on: candidate.granted_on,
        });
    }

    // Stable: equal keys keep input order
    accepted.sort_by_key(|a| (a.kind, a.granted_on));
    Ok((accepted, warnings))
}

/// Render the trailer block for already sorted approvals
pub fn render_approval_block(approvals: &[ApprovalRecord]) -> String {
    approvals
        .iter()
        .map(|a| format!("{}\n", a.trailer()))
        .collect()
}

/// Join ticket lines and the trailer block into a commit message
pub fn compose_message(ticket_lines: &[String], approval_block: &str) -> String {
    format!("{}\n{approval_block}", ticket_lines.join("\n"))
}

/// Build the candidate message without the idempotence check (PURE)
pub fn build_reconciliation(
    current_message: &str,
    ticket_lines: &[String],
    raw_approvals: &[Value],
) -> Result<Reconciliation> {
    let (accepted, warnings) = accept_approvals(raw_approvals)?;
    let approval_block = render_approval_block(&accepted);
    let new_message = compose_message(ticket_lines, &approval_block);
    let unchanged = new_message == current_message;

    Ok(Reconciliation {
        accepted,
        approval_block,
        new_message,
        warnings,
        unchanged,
    })
}

/// Reconcile approvals against `current_message` (PURE)
///
/// Fails with [`Error::NoChangeNeeded`] when the result would be identical
/// to the current message.
pub fn reconcile_approvals(
    current_message: &str,
    ticket_lines: &[String],
    raw_approvals: &[Value],
) -> Result<Reconciliation> {
    let reconciliation = build_reconciliation(current_message, ticket_lines, raw_approvals)?;
    if reconciliation.unchanged {
        return Err(Error::NoChangeNeeded);
    }
    Ok(reconciliation)
}
