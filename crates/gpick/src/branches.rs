//! Resolution of the FROM/TO branch pair from command line arguments

use anyhow::{bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPair {
    pub from: String,
    pub to: String,
}

/// Work out which branches to compare.
///
/// With a single argument it names TO and FROM is the checked out branch.
/// `current` is only asked for when FROM has to come from it.
pub fn resolve_branches(
    first: Option<&str>,
    second: Option<&str>,
    branches: &[String],
    current: impl FnOnce() -> Option<String>,
) -> Result<BranchPair> {
    if branches.len() < 2 {
        bail!("You only have one branch, so I can't pick for you.");
    }

    let (from, to) = match (first, second) {
        (Some(from), Some(to)) => (Some(from.to_string()), Some(to)),
        (Some(to), None) => (current(), Some(to)),
        (None, _) => (None, None),
    };

    let Some(to) = to else {
        bail!("I can't figure out the branch to pick to.");
    };
    let Some(from) = from else {
        bail!("I can't figure out the branch to pick from. Is HEAD detached?");
    };

    if from == to {
        let others: Vec<&str> = branches
            .iter()
            .map(String::as_str)
            .filter(|branch| *branch != from)
            .collect();
        bail!(
            "You are trying to pick from '{from}' to itself. Use one of these: {}",
            others.join(", ")
        );
    }

    Ok(BranchPair {
        from,
        to: to.to_string(),
    })
}
