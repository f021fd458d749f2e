//! Thin wrapper around the `git` command line.
//!
//! Every call runs `git -C <repo> ...` synchronously; a non-zero exit becomes
//! [`DocsiteError::Command`] carrying git's stderr.

use std::path::Path;
use std::process::Command;

use tracing::{debug, instrument};

use docsite_shared::{DocsiteError, Result};

/// List every tag in the repository.
#[instrument(skip_all, fields(repo = %repo.display()))]
pub fn list_tags(repo: &Path) -> Result<Vec<String>> {
    let out = run_git(repo, &["tag", "--list"])?;
    let tags: Vec<String> = out
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    debug!(count = tags.len(), "listed tags");
    Ok(tags)
}

/// Check out a tag or branch.
///
/// Local modifications that the switch would overwrite make git refuse, and
/// the refusal is returned as [`DocsiteError::Command`].
#[instrument(skip(repo), fields(repo = %repo.display()))]
pub fn checkout(repo: &Path, reference: &str) -> Result<()> {
    run_git(repo, &["checkout", "--quiet", reference])?;
    Ok(())
}

/// Describe what is checked out: the nearest tag, or the abbreviated commit.
pub fn describe(repo: &Path) -> Result<String> {
    let out = run_git(repo, &["describe", "--tags", "--always"])?;
    Ok(out.trim().to_string())
}

fn run_git(repo: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .map_err(|e| DocsiteError::Command {
            program: "git".into(),
            args: args.join(" "),
            code: None,
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(DocsiteError::Command {
            program: "git".into(),
            args: args.join(" "),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git(repo: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args([
                "-c",
                "user.name=Docs Bot",
                "-c",
                "user.email=docs@example.com",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "tag.gpgsign=false",
            ])
            .arg("-C")
            .arg(repo)
            .args(args)
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    fn commit(repo: &Path, file: &str, content: &str) {
        std::fs::write(repo.join(file), content).unwrap();
        git(repo, &["add", "-A"]);
        git(repo, &["commit", "-q", "-m", content]);
    }

    fn two_commit_repo() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path();
        git(repo, &["init", "-q", "-b", "main"]);
        commit(repo, "a.md", "v1");
        git(repo, &["tag", "v0.1.0"]);
        commit(repo, "a.md", "v2");
        tmp
    }

    #[test]
    fn checkout_switches_clean_tree() {
        let tmp = two_commit_repo();
        let repo = tmp.path();

        checkout(repo, "v0.1.0").unwrap();
        assert_eq!(std::fs::read_to_string(repo.join("a.md")).unwrap(), "v1");
        assert_eq!(describe(repo).unwrap(), "v0.1.0");

        checkout(repo, "main").unwrap();
        assert_eq!(std::fs::read_to_string(repo.join("a.md")).unwrap(), "v2");
        assert_eq!(list_tags(repo).unwrap(), vec!["v0.1.0"]);
    }

    #[test]
    fn checkout_refuses_to_discard_local_edits() {
        let tmp = two_commit_repo();
        let repo = tmp.path();
        std::fs::write(repo.join("a.md"), "UNCOMMITTED WORK").unwrap();

        let err = checkout(repo, "v0.1.0").unwrap_err();

        assert!(matches!(err, DocsiteError::Command { .. }));
        assert!(err.to_string().contains("checkout"));
        assert_eq!(
            std::fs::read_to_string(repo.join("a.md")).unwrap(),
            "UNCOMMITTED WORK"
        );
    }

    #[test]
    fn non_repository_is_a_command_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("not-a-repo");
        let err = list_tags(&missing).unwrap_err();
        assert!(matches!(err, DocsiteError::Command { .. }));
        assert!(err.to_string().contains("tag --list"));
    }
}
