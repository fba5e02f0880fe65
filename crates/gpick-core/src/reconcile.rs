//! Ordered set difference between two branch histories

use crate::commit::Commit;
use rustc_hash::FxHashSet;
use std::ops::Index;
use std::sync::Arc;

/// Commits present on the source branch but not on the destination,
/// in the source log's order (most recent first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    commits: Arc<[Commit]>,
}

impl CandidateList {
    pub fn new(commits: Vec<Commit>) -> Self {
        Self {
            commits: commits.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Commit> {
        self.commits.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Commit> {
        self.commits.iter()
    }

    pub fn as_slice(&self) -> &[Commit] {
        &self.commits
    }
}

impl Default for CandidateList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Index<usize> for CandidateList {
    type Output = Commit;

    fn index(&self, index: usize) -> &Self::Output {
        &self.commits[index]
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a Commit;
    type IntoIter = std::slice::Iter<'a, Commit>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Keep the commits of `from` whose full id does not appear in `to`.
///
/// Matching uses the untruncated id, so two commits sharing a short id
/// prefix are never confused.
pub fn reconcile(from: &[Commit], to: &[Commit]) -> CandidateList {
    let known: FxHashSet<&str> = to.iter().map(|commit| commit.oid.as_str()).collect();
    let candidates: Vec<Commit> = from
        .iter()
        .filter(|commit| !known.contains(commit.oid.as_str()))
        .cloned()
        .collect();

    tracing::debug!(
        from = from.len(),
        to = to.len(),
        candidates = candidates.len(),
        "reconciled branch histories"
    );

    CandidateList::new(candidates)
}
