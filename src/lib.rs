//! approval-sync - keep a Gerrit change's commit message in step with its votes
//!
//! The library reconciles the `Reviewed by:` / `Approved by:` trailers of a
//! change's commit message with the approvals recorded on the review server
//! and republishes the change as a new patchset.
//!
//! - [`message`] - splitting and reconciling commit messages (pure)
//! - [`sync`] - the step pipeline and its shared context
//! - [`review`] - SSH and REST access to the review server
//! - [`git`], [`exec`], [`workdir`] - external commands and scratch space

pub mod config;
pub mod error;
pub mod exec;
pub mod git;
pub mod message;
pub mod review;
pub mod sync;
pub mod types;
pub mod workdir;

pub use error::{Error, Result};
