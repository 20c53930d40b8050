//! Core types for approval-sync

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of approval label recorded on a change
///
/// The declaration order is the order approvals appear in a commit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ApprovalType {
    /// Human code review
    #[serde(rename = "Code-Review")]
    CodeReview,
    /// Integration approval by a maintainer
    #[serde(rename = "Integration-Approval")]
    IntegrationApproval,
    /// Vote cast by continuous integration
    #[serde(rename = "CI-Testing")]
    CiTesting,
    /// Submission marker
    #[serde(rename = "SUBM")]
    Submit,
}

impl ApprovalType {
    /// Parse the label name used by the review service
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Code-Review" => Some(Self::CodeReview),
            "Integration-Approval" => Some(Self::IntegrationApproval),
            "CI-Testing" => Some(Self::CiTesting),
            "SUBM" => Some(Self::Submit),
            _ => None,
        }
    }

    /// Label name as reported by the review service
    pub const fn label(self) -> &'static str {
        match self {
            Self::CodeReview => "Code-Review",
            Self::IntegrationApproval => "Integration-Approval",
            Self::CiTesting => "CI-Testing",
            Self::Submit => "SUBM",
        }
    }

    /// Whether approvals of this type ever appear in a commit message
    pub const fn is_recorded(self) -> bool {
        matches!(self, Self::CodeReview | Self::IntegrationApproval)
    }

    /// Verb used in the rendered trailer line
    pub const fn verb(self) -> &'static str {
        match self {
            Self::CodeReview => "Reviewed",
            _ => "Approved",
        }
    }
}

impl std::fmt::Display for ApprovalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single reviewer vote accepted for the commit message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// Label the vote was cast on
    pub kind: ApprovalType,
    /// Reviewer display name
    pub name: String,
    /// Reviewer email
    pub email: String,
    /// Vote value as reported (e.g. "1", "-1", "2")
    pub value: String,
    /// When the vote was cast (Unix seconds)
    pub granted_on: i64,
}

impl ApprovalRecord {
    /// Trailer line for this approval, without the line terminator
    pub fn trailer(&self) -> String {
        format!("{} by: {} <{}>", self.kind.verb(), self.name, self.email)
    }
}

/// Open/closed status of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeStatus {
    /// Change accepts new patchsets
    Open,
    /// Change was merged or abandoned
    Closed,
}

impl std::fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Snapshot of a change as reported by the review service
///
/// Approvals stay in their raw JSON form so the reconciler can report
/// malformed entries by position.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    /// Project (repository) name
    pub project: String,
    /// Change number
    pub number: u64,
    /// Full commit message of the current patchset
    pub commit_message: String,
    /// Commit sha of the current patchset
    pub revision: String,
    /// Ref name of the current patchset (e.g. `refs/changes/45/12345/3`)
    pub revision_ref: String,
    /// Whether the change is still open
    pub status: ChangeStatus,
    /// When the change was created
    pub created_on: DateTime<Utc>,
    /// Approval entries on the current patchset, unvalidated
    pub approvals: Vec<serde_json::Value>,
}

impl ChangeRecord {
    /// Check if the change accepts new patchsets
    pub const fn is_open(&self) -> bool {
        matches!(self.status, ChangeStatus::Open)
    }
}

/// How the review service is queried
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// `ssh <host> gerrit query`
    #[default]
    Ssh,
    /// Gerrit REST API
    Http,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ssh => write!(f, "ssh"),
            Self::Http => write!(f, "http"),
        }
    }
}

impl std::str::FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ssh" => Ok(Self::Ssh),
            "http" | "https" => Ok(Self::Http),
            other => Err(format!("unknown transport '{other}' (expected ssh or http)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_type_round_trips_labels() {
        for kind in [
            ApprovalType::CodeReview,
            ApprovalType::IntegrationApproval,
            ApprovalType::CiTesting,
            ApprovalType::Submit,
        ] {
            assert_eq!(ApprovalType::from_label(kind.label()), Some(kind));
        }
        assert_eq!(ApprovalType::from_label("Verified"), None);
    }

    #[test]
    fn test_code_review_orders_first() {
        assert!(ApprovalType::CodeReview < ApprovalType::IntegrationApproval);
    }

    #[test]
    fn test_trailer_verbs() {
        let mut record = ApprovalRecord {
            kind: ApprovalType::CodeReview,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            value: "1".to_string(),
            granted_on: 0,
        };
        assert_eq!(record.trailer(), "Reviewed by: Ada <ada@example.com>");
        record.kind = ApprovalType::IntegrationApproval;
        assert_eq!(record.trailer(), "Approved by: Ada <ada@example.com>");
    }

    #[test]
    fn test_transport_from_str() {
        assert_eq!("ssh".parse::<Transport>(), Ok(Transport::Ssh));
        assert_eq!("https".parse::<Transport>(), Ok(Transport::Http));
        assert!("ftp".parse::<Transport>().is_err());
    }
}
