//! Sync plan - the ordered steps of one run

/// A single step of the sync pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStep {
    /// Query the review service for the change
    FetchChange,
    /// Extract ticket lines from the current commit message
    SplitMessage,
    /// Build the approval block and candidate message
    Reconcile,
    /// Show original, candidate and diff
    Preview,
    /// Ask the operator to proceed
    Confirm,
    /// Refuse to continue if the change was merged or abandoned
    EnsureOpen,
    /// Clone the project into the working directory
    Clone,
    /// Fetch the current patchset ref
    FetchRevision,
    /// Check out the current patchset
    Checkout,
    /// Amend the commit with the new message
    Amend,
    /// Push the amended commit as a new patchset
    Push,
    /// Remove the working directory
    Cleanup,
}

impl SyncStep {
    /// Whether this step changes anything outside the process
    pub const fn is_mutating(self) -> bool {
        matches!(
            self,
            Self::Clone | Self::FetchRevision | Self::Checkout | Self::Amend | Self::Push
        )
    }
}

impl std::fmt::Display for SyncStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::FetchChange => "fetch change",
            Self::SplitMessage => "split message",
            Self::Reconcile => "reconcile approvals",
            Self::Preview => "preview",
            Self::Confirm => "confirm",
            Self::EnsureOpen => "check change is open",
            Self::Clone => "clone",
            Self::FetchRevision => "fetch revision",
            Self::Checkout => "checkout",
            Self::Amend => "amend",
            Self::Push => "push",
            Self::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Ordered steps plus the teardown step that always runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    /// Steps run in order until one fails
    pub steps: Vec<SyncStep>,
    /// Step run after `steps`, whatever their outcome
    pub teardown: SyncStep,
}

impl SyncPlan {
    /// The full fetch → reconcile → confirm → push pipeline
    pub fn standard() -> Self {
        Self {
            steps: vec![
                SyncStep::FetchChange,
                SyncStep::SplitMessage,
                SyncStep::Reconcile,
                SyncStep::Preview,
                SyncStep::Confirm,
                SyncStep::EnsureOpen,
                SyncStep::Clone,
                SyncStep::FetchRevision,
                SyncStep::Checkout,
                SyncStep::Amend,
                SyncStep::Push,
            ],
            teardown: SyncStep::Cleanup,
        }
    }

    /// Index of the first mutating step
    pub fn first_mutating(&self) -> Option<usize> {
        self.steps.iter().position(|s| s.is_mutating())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_plan_gates_mutation() {
        let plan = SyncPlan::standard();
        let first = plan.first_mutating().unwrap();
        let confirm = plan.steps.iter().position(|s| *s == SyncStep::Confirm).unwrap();
        let open = plan.steps.iter().position(|s| *s == SyncStep::EnsureOpen).unwrap();
        assert!(confirm < open);
        assert_eq!(open + 1, first);
        assert_eq!(plan.teardown, SyncStep::Cleanup);
        assert!(!plan.steps.contains(&SyncStep::Cleanup));
    }

    #[test]
    fn test_mutating_steps() {
        assert!(SyncStep::Push.is_mutating());
        assert!(!SyncStep::Confirm.is_mutating());
        assert!(!SyncStep::Cleanup.is_mutating());
    }
}
