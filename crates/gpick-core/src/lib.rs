//! Commit reconciliation and selection core for gpick
//!
//! Raw branch logs are normalized into [`Commit`]s, reconciled into a
//! [`CandidateList`] of commits missing from the destination branch, marked
//! through a [`SelectionTracker`], and rendered one line at a time by the
//! formatter.

pub mod commit;
pub mod format;
pub mod git;
pub mod reconcile;
pub mod selection;
pub mod time_format;

pub use commit::{normalize_log, Commit, NormalizeError, RawLogEntry, DEFAULT_SHORT_ID_LEN};
pub use format::{
    display_width, format_line, truncate_to_width, Field, LineFormatter, LineStyle, Segment,
};
pub use git::{fetch_both, GitError, Repo};
pub use reconcile::{reconcile, CandidateList};
pub use selection::{SelectionError, SelectionTracker};
pub use time_format::{format_relative_age, now_unix, TimeFormatter, TimeMode};

use thiserror::Error;

/// Any failure surfaced by the core
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Git(#[from] GitError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Read both branch logs, normalize them and compute the candidates to pick
pub fn candidates_between(
    repo: &Repo,
    from: &str,
    to: &str,
    short_len: usize,
) -> Result<CandidateList, Error> {
    let (from_log, to_log) = fetch_both(repo, from, to)?;
    let from_commits = normalize_log(from_log, short_len)?;
    let to_commits = normalize_log(to_log, short_len)?;
    Ok(reconcile(&from_commits, &to_commits))
}
