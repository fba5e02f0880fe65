//! Non-interactive output of the candidate list

use anyhow::Result;
use gpick_core::{CandidateList, Commit, LineFormatter};
use std::io::Write;

/// One `<id> - <message> (<when>) <<author>>` line per candidate
pub fn write_plain(
    out: &mut impl Write,
    candidates: &CandidateList,
    formatter: &LineFormatter,
    now: i64,
) -> Result<()> {
    for commit in candidates {
        writeln!(out, "{}", formatter.plain_line(commit, now))?;
    }
    Ok(())
}

/// The candidates as a pretty-printed JSON array
pub fn write_json(out: &mut impl Write, candidates: &CandidateList) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, candidates.as_slice())?;
    writeln!(out)?;
    Ok(())
}

/// Full ids of picked commits, one per line
pub fn write_picked(out: &mut impl Write, commits: &[Commit]) -> Result<()> {
    for commit in commits {
        writeln!(out, "{}", commit.oid)?;
    }
    Ok(())
}
