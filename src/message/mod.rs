//! Commit message handling
//!
//! A synced commit message has two parts:
//! 1. Ticket lines - subject and body, preserved verbatim
//! 2. Approval block - `Reviewed by:` / `Approved by:` trailers, regenerated
//!    from the change's current votes on every run

mod reconcile;
mod split;

pub use reconcile::{
    Reconciliation, accept_approvals, build_reconciliation, compose_message, is_plus_one,
    reconcile_approvals, render_approval_block,
};
pub use split::{APPROVAL_MARKERS, split_ticket_lines};
