//! Git operations on the scratch clone
//!
//! Thin command builders over [`CommandRunner`]; each call fails with
//! [`Error::ExternalCommand`](crate::error::Error::ExternalCommand) naming
//! the operation when git exits non-zero.

use crate::error::Result;
use crate::exec::{CommandRunner, CommandSpec, run_checked};
use chrono::{DateTime, Utc};
use std::path::Path;

/// A git working copy at a fixed path
pub struct GitRepository<'a> {
    runner: &'a dyn CommandRunner,
    dir: &'a Path,
}

impl<'a> GitRepository<'a> {
    /// Wrap the working copy at `dir` (which may not exist until [`clone_remote`](Self::clone_remote))
    pub fn new(runner: &'a dyn CommandRunner, dir: &'a Path) -> Self {
        Self { runner, dir }
    }

    fn git(&self) -> CommandSpec {
        CommandSpec::new("git").current_dir(self.dir)
    }

    /// `git clone <url> <dir>`
    pub async fn clone_remote(&self, url: &str) -> Result<()> {
        let command = CommandSpec::new("git")
            .args(["clone", "--quiet", "--no-checkout", url])
            .arg(self.dir.to_string_lossy());
        run_checked(self.runner, "clone", &command).await?;
        Ok(())
    }

    /// `git fetch origin <reference>`
    pub async fn fetch(&self, reference: &str) -> Result<()> {
        let command = self.git().args(["fetch", "--quiet", "origin", reference]);
        run_checked(self.runner, "fetch", &command).await?;
        Ok(())
    }

    /// `git checkout <revision>` (detached)
    pub async fn checkout(&self, revision: &str) -> Result<()> {
        let command = self.git().args(["checkout", "--quiet", "--detach", revision]);
        run_checked(self.runner, "checkout", &command).await?;
        Ok(())
    }

    /// Amend HEAD with a new message and author date
    pub async fn amend(&self, message: &str, date: DateTime<Utc>) -> Result<()> {
        let command = self
            .git()
            .args(["commit", "--quiet", "--amend", "--allow-empty", "-m", message])
            .arg(format!("--date={}", date.to_rfc3339()));
        run_checked(self.runner, "amend", &command).await?;
        Ok(())
    }

    /// Push HEAD as a new patchset of change `number`
    pub async fn push_change(&self, number: u64) -> Result<()> {
        let command = self
            .git()
            .args(["push", "origin"])
            .arg(format!("HEAD:refs/changes/{number}"));
        run_checked(self.runner, "push", &command).await?;
        Ok(())
    }

    /// Current HEAD sha
    pub async fn head(&self) -> Result<String> {
        let command = self.git().args(["rev-parse", "HEAD"]);
        let output = run_checked(self.runner, "rev-parse", &command).await?;
        Ok(output.stdout.trim().to_string())
    }
}
