//! Scratch working directory for a run
//!
//! Each run clones into `<temp_dir>/approval-sync-<pid>`. Removal is only
//! allowed for paths of exactly that shape.

use crate::error::{Error, Result};
use crate::exec::{CommandRunner, CommandSpec, run_checked};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// Prefix of every working directory name
pub const WORK_DIR_PREFIX: &str = "approval-sync-";

static WORK_DIR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{}\d+$", regex::escape(WORK_DIR_PREFIX))).expect("static regex")
});

/// Working directory for the current process
pub fn work_dir_for_process() -> PathBuf {
    work_dir_for(std::process::id())
}

/// Working directory for run id `id`
pub fn work_dir_for(id: u32) -> PathBuf {
    std::env::temp_dir().join(format!("{WORK_DIR_PREFIX}{id}"))
}

/// Check that `path` is a run working directory directly under the temp dir
pub fn is_run_work_dir(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    path.parent() == Some(std::env::temp_dir().as_path()) && WORK_DIR_NAME.is_match(name)
}

/// Remove the working directory at `path`
///
/// Refuses with [`Error::UnsafeWorkDir`] unless `path` passes
/// [`is_run_work_dir`]. Removing a directory that does not exist succeeds.
pub async fn remove_work_dir(runner: &dyn CommandRunner, path: &Path) -> Result<()> {
    if !is_run_work_dir(path) {
        return Err(Error::UnsafeWorkDir(path.to_path_buf()));
    }

    debug!(path = %path.display(), "Removing working directory");
    let command = CommandSpec::new("rm")
        .arg("-rf")
        .arg(path.to_string_lossy());
    run_checked(runner, "cleanup", &command).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::TokioCommandRunner;

    #[test]
    fn test_process_dir_is_accepted() {
        assert!(is_run_work_dir(&work_dir_for_process()));
        assert!(is_run_work_dir(&work_dir_for(1)));
    }

    #[test]
    fn test_unexpected_paths_rejected() {
        let tmp = std::env::temp_dir();
        assert!(!is_run_work_dir(Path::new("/")));
        assert!(!is_run_work_dir(Path::new("/home/user")));
        assert!(!is_run_work_dir(&tmp));
        assert!(!is_run_work_dir(&tmp.join("approval-sync-")));
        assert!(!is_run_work_dir(&tmp.join("approval-sync-12x")));
        assert!(!is_run_work_dir(&tmp.join("other-12")));
        assert!(!is_run_work_dir(&tmp.join("nested").join("approval-sync-12")));
        assert!(!is_run_work_dir(&tmp.join("approval-sync-12").join("..")));
        assert!(!is_run_work_dir(Path::new("approval-sync-12")));
    }

    #[tokio::test]
    async fn test_remove_refuses_unexpected_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = remove_work_dir(&TokioCommandRunner, temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsafeWorkDir(_)));
        assert!(temp.path().exists());
    }

    #[tokio::test]
    async fn test_remove_deletes_tree() {
        let dir = work_dir_for(u32::MAX - std::process::id());
        std::fs::create_dir_all(dir.join("repo").join(".git")).unwrap();
        std::fs::write(dir.join("repo").join("file"), "x").unwrap();

        remove_work_dir(&TokioCommandRunner, &dir).await.unwrap();
        assert!(!dir.exists());

        // Second removal is a no-op
        remove_work_dir(&TokioCommandRunner, &dir).await.unwrap();
    }
}
