//! Toggleable selection over a fixed candidate list

use crate::commit::Commit;
use crate::reconcile::CandidateList;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Index {index} is out of range for {len} candidates")]
    OutOfRange { index: usize, len: usize },
}

/// Tracks which candidates are marked for picking.
///
/// Indices are kept ordered, so selected commits always come back in
/// history order no matter which order they were toggled in.
#[derive(Debug, Clone)]
pub struct SelectionTracker {
    candidates: CandidateList,
    selected: BTreeSet<usize>,
}

impl SelectionTracker {
    pub fn new(candidates: CandidateList) -> Self {
        Self {
            candidates,
            selected: BTreeSet::new(),
        }
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Flip the mark on `index`, returning whether it is now selected
    pub fn toggle(&mut self, index: usize) -> Result<bool, SelectionError> {
        self.check(index)?;
        if self.selected.remove(&index) {
            Ok(false)
        } else {
            self.selected.insert(index);
            Ok(true)
        }
    }

    pub fn is_selected(&self, index: usize) -> Result<bool, SelectionError> {
        self.check(index)?;
        Ok(self.selected.contains(&index))
    }

    /// Selected commits in ascending candidate index order
    pub fn selected_commits(&self) -> Vec<&Commit> {
        self.selected
            .iter()
            .filter_map(|&index| self.candidates.get(index))
            .collect()
    }

    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.candidates.len()).collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn invert(&mut self) {
        self.selected = (0..self.candidates.len())
            .filter(|index| !self.selected.contains(index))
            .collect();
    }

    fn check(&self, index: usize) -> Result<(), SelectionError> {
        let len = self.candidates.len();
        if index >= len {
            return Err(SelectionError::OutOfRange { index, len });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::test_commit;
    use crate::reconcile::reconcile;

    fn tracker(n: usize) -> SelectionTracker {
        let commits = (0..n)
            .map(|i| test_commit(&format!("{i:040x}"), &format!("commit {i}")))
            .collect();
        SelectionTracker::new(CandidateList::new(commits))
    }

    fn selected_messages(tracker: &SelectionTracker) -> Vec<String> {
        tracker
            .selected_commits()
            .into_iter()
            .map(|commit| commit.message.clone())
            .collect()
    }

    #[test]
    fn test_starts_empty() {
        let tracker = tracker(3);
        assert_eq!(tracker.selected_count(), 0);
        assert!(tracker.selected_commits().is_empty());
        for i in 0..3 {
            assert_eq!(tracker.is_selected(i), Ok(false));
        }
    }

    #[test]
    fn test_example_scenario() {
        let from = vec![test_commit("abc1234", "fix bug"), test_commit("def5678", "add feature")];
        let to = vec![test_commit("def5678", "add feature")];
        let mut tracker = SelectionTracker::new(reconcile(&from, &to));

        assert_eq!(tracker.toggle(0), Ok(true));
        let picked: Vec<&str> = tracker
            .selected_commits()
            .iter()
            .map(|commit| commit.oid.as_str())
            .collect();
        assert_eq!(picked, vec!["abc1234"]);

        assert_eq!(tracker.toggle(0), Ok(false));
        assert!(tracker.selected_commits().is_empty());
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut tracker = tracker(5);
        tracker.toggle(1).unwrap();
        tracker.toggle(3).unwrap();
        let before: Vec<usize> = tracker.selected_indices().collect();

        for i in 0..5 {
            tracker.toggle(i).unwrap();
            tracker.toggle(i).unwrap();
            assert_eq!(tracker.selected_indices().collect::<Vec<_>>(), before);
        }
    }

    #[test]
    fn test_selected_in_index_order() {
        let mut tracker = tracker(6);
        for i in [4, 0, 5, 2] {
            tracker.toggle(i).unwrap();
        }
        assert_eq!(
            selected_messages(&tracker),
            vec!["commit 0", "commit 2", "commit 4", "commit 5"]
        );
    }

    #[test]
    fn test_out_of_range() {
        let mut tracker = tracker(2);
        assert_eq!(
            tracker.toggle(2),
            Err(SelectionError::OutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            tracker.is_selected(9),
            Err(SelectionError::OutOfRange { index: 9, len: 2 })
        );
        // Rejected input leaves state untouched
        assert_eq!(tracker.selected_count(), 0);
    }

    #[test]
    fn test_empty_candidates_reject_everything() {
        let mut tracker = SelectionTracker::new(CandidateList::default());
        assert!(tracker.is_empty());
        assert!(tracker.toggle(0).is_err());
        tracker.select_all();
        assert!(tracker.selected_commits().is_empty());
    }

    #[test]
    fn test_bulk_operations() {
        let mut tracker = tracker(4);
        tracker.select_all();
        assert_eq!(tracker.selected_count(), 4);

        tracker.toggle(1).unwrap();
        tracker.invert();
        assert_eq!(tracker.selected_indices().collect::<Vec<_>>(), vec![1]);

        tracker.toggle(3).unwrap();
        assert_eq!(selected_messages(&tracker), vec!["commit 1", "commit 3"]);

        tracker.clear();
        assert_eq!(tracker.selected_count(), 0);
    }
}
