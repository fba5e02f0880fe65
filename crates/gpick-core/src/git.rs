//! Git integration for reading branch histories

use crate::commit::RawLogEntry;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread;
use thiserror::Error;

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';
const LOG_FORMAT: &str = "--format=%H%x1f%an%x1f%at%x1f%B%x1e";

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepo,
    #[error("Unknown branch: {0}")]
    UnknownBranch(String),
    #[error("Git command failed: {0}")]
    CommandFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle to a repository on disk. Every git call runs against `root`,
/// never against the process working directory.
#[derive(Debug, Clone)]
pub struct Repo {
    root: PathBuf,
}

impl Repo {
    /// Find the repository containing `path`
    pub fn discover(path: &Path) -> Result<Self, GitError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(path)
            .arg("rev-parse")
            .arg("--show-toplevel")
            .output()?;

        if !output.status.success() {
            return Err(GitError::NotARepo);
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    /// Local branch names
    pub fn branches(&self) -> Result<Vec<String>, GitError> {
        let output = self.run(&["for-each-ref", "--format=%(refname:short)", "refs/heads"])?;
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Name of the checked out branch, `None` on a detached HEAD
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        let output = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if name.is_empty() || name == "HEAD" {
            Ok(None)
        } else {
            Ok(Some(name))
        }
    }

    /// History reachable from `branch`, most recent first
    pub fn log(&self, branch: &str) -> Result<Vec<RawLogEntry>, GitError> {
        self.verify_branch(branch)?;
        tracing::debug!(branch, root = %self.root.display(), "reading branch log");
        let output = self.run(&["log", LOG_FORMAT, branch, "--"])?;
        Ok(parse_log_output(&String::from_utf8_lossy(&output.stdout)))
    }

    fn verify_branch(&self, branch: &str) -> Result<(), GitError> {
        if branch.is_empty() || branch.starts_with('-') {
            return Err(GitError::UnknownBranch(branch.to_string()));
        }
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .arg("rev-parse")
            .arg("--verify")
            .arg("--quiet")
            .arg(format!("{branch}^{{commit}}"))
            .output()?;
        if !output.status.success() {
            return Err(GitError::UnknownBranch(branch.to_string()));
        }
        Ok(())
    }

    fn run(&self, args: &[&str]) -> Result<Output, GitError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()?;

        if !output.status.success() {
            return Err(GitError::CommandFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(output)
    }
}

/// Read both branch logs in parallel and wait for both to finish
pub fn fetch_both(
    repo: &Repo,
    from: &str,
    to: &str,
) -> Result<(Vec<RawLogEntry>, Vec<RawLogEntry>), GitError> {
    thread::scope(|scope| {
        let from_log = scope.spawn(|| repo.log(from));
        let to_log = scope.spawn(|| repo.log(to));
        let from_log = from_log
            .join()
            .map_err(|_| GitError::CommandFailed(format!("reading log of {from} panicked")))?;
        let to_log = to_log
            .join()
            .map_err(|_| GitError::CommandFailed(format!("reading log of {to} panicked")))?;
        Ok((from_log?, to_log?))
    })
}

/// Parse `git log` output written with the record/field separator format
pub fn parse_log_output(output: &str) -> Vec<RawLogEntry> {
    output
        .split(RECORD_SEP)
        .map(|record| record.trim_start_matches(['\n', '\r']))
        .filter(|record| !record.trim().is_empty())
        .map(|record| {
            let mut fields = record.splitn(4, FIELD_SEP);
            let oid = fields.next().map(str::to_string);
            let author_name = fields.next().map(str::to_string);
            let author_time = fields.next().and_then(|s| s.trim().parse::<i64>().ok());
            let message = fields.next().map(str::to_string);
            RawLogEntry {
                oid,
                author_name,
                author_time,
                message,
            }
        })
        .collect()
}
