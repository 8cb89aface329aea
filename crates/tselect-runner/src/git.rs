//! Git-based changed-file detection.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context};

/// Detect files changed relative to HEAD.
///
/// Runs `git diff --name-only HEAD` in the given directory. Callers treat a
/// failure as degraded-but-continuing: log a warning and proceed with an
/// empty change set.
pub fn changed_files(repo_dir: &Path) -> anyhow::Result<BTreeSet<String>> {
    let output = Command::new("git")
        .args(["diff", "--name-only", "HEAD"])
        .current_dir(repo_dir)
        .output()
        .context("failed to run git")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git diff --name-only HEAD failed: {stderr}");
    }

    let files = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn run_git(repo_dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn make_git_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.name", "test-user"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        fs::write(dir.path().join("tracked.py"), "x = 1\n").unwrap();
        run_git(dir.path(), &["add", "."]);
        run_git(dir.path(), &["commit", "-m", "initial"]);
        dir
    }

    #[test]
    fn test_clean_repo_has_no_changes() {
        let repo = make_git_repo();
        assert!(changed_files(repo.path()).unwrap().is_empty());
    }

    #[test]
    fn test_modified_tracked_file_is_detected() {
        let repo = make_git_repo();
        fs::write(repo.path().join("tracked.py"), "x = 2\n").unwrap();

        let files = changed_files(repo.path()).unwrap();
        assert!(files.contains("tracked.py"));
    }

    #[test]
    fn test_non_repo_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(changed_files(dir.path()).is_err());
    }
}
