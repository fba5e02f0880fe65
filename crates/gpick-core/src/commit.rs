//! Normalized commit records built from raw log entries

use crate::time_format::format_relative_age;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display length of the abbreviated commit id
pub const DEFAULT_SHORT_ID_LEN: usize = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Log entry has no commit id")]
    MissingIdentity,
    #[error("Commit {oid} has no author timestamp")]
    MissingTimestamp { oid: String },
}

/// A log entry as yielded by the log producer, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawLogEntry {
    pub oid: Option<String>,
    pub author_name: Option<String>,
    pub author_time: Option<i64>,
    pub message: Option<String>,
}

/// A validated commit. Identity comparisons always use `oid`, never `short_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub oid: String,
    pub short_id: String,
    pub message: String,
    pub author: String,
    /// Author time, seconds since epoch
    pub timestamp: i64,
}

impl Commit {
    /// Validate a raw entry into a commit.
    ///
    /// A missing message or author degrades to an empty string; a missing id or
    /// timestamp is fatal since reconciliation depends on them.
    pub fn from_raw(entry: RawLogEntry, short_len: usize) -> Result<Self, NormalizeError> {
        let oid = entry
            .oid
            .map(|oid| oid.trim().to_string())
            .filter(|oid| !oid.is_empty())
            .ok_or(NormalizeError::MissingIdentity)?;
        let timestamp = entry
            .author_time
            .ok_or_else(|| NormalizeError::MissingTimestamp { oid: oid.clone() })?;
        let short_id = oid.chars().take(short_len.max(1)).collect();
        let message = entry
            .message
            .map(|message| message.trim().to_string())
            .unwrap_or_default();
        let author = entry
            .author_name
            .map(|name| name.trim().to_string())
            .unwrap_or_default();

        Ok(Self {
            oid,
            short_id,
            message,
            author,
            timestamp,
        })
    }

    /// Message on one line: every run of line breaks, tabs or other control
    /// characters becomes a single space, so escape sequences cannot reach a
    /// terminal.
    pub fn single_line_message(&self) -> String {
        self.message
            .split(char::is_control)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Age of the commit relative to `now`, e.g. "3 days ago"
    pub fn relative_time(&self, now: i64) -> String {
        format_relative_age(self.timestamp, now)
    }
}

/// Normalize a whole branch log, keeping its order
pub fn normalize_log(
    entries: impl IntoIterator<Item = RawLogEntry>,
    short_len: usize,
) -> Result<Vec<Commit>, NormalizeError> {
    entries
        .into_iter()
        .map(|entry| Commit::from_raw(entry, short_len))
        .collect()
}

#[cfg(test)]
pub(crate) fn test_commit(oid: &str, message: &str) -> Commit {
    Commit::from_raw(
        RawLogEntry {
            oid: Some(oid.to_string()),
            author_name: Some("Ada".to_string()),
            author_time: Some(1_700_000_000),
            message: Some(message.to_string()),
        },
        DEFAULT_SHORT_ID_LEN,
    )
    .expect("test commit")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(oid: Option<&str>, time: Option<i64>, message: Option<&str>) -> RawLogEntry {
        RawLogEntry {
            oid: oid.map(str::to_string),
            author_name: Some("Grace Hopper".to_string()),
            author_time: time,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_from_raw_abbreviates_id() {
        let commit = Commit::from_raw(
            raw(Some("abc1234def5678"), Some(10), Some("fix bug\n")),
            DEFAULT_SHORT_ID_LEN,
        )
        .unwrap();
        assert_eq!(commit.oid, "abc1234def5678");
        assert_eq!(commit.short_id, "abc1234");
        assert_eq!(commit.message, "fix bug");
        assert_eq!(commit.author, "Grace Hopper");
        assert_eq!(commit.timestamp, 10);
    }

    #[test]
    fn test_short_id_never_longer_than_oid() {
        let commit = Commit::from_raw(raw(Some("abc"), Some(0), None), 40).unwrap();
        assert_eq!(commit.short_id, "abc");
    }

    #[test]
    fn test_missing_message_is_empty() {
        let commit = Commit::from_raw(raw(Some("abc1234"), Some(0), None), 7).unwrap();
        assert_eq!(commit.message, "");
        assert_eq!(commit.single_line_message(), "");
    }

    #[test]
    fn test_missing_identity_is_fatal() {
        assert_eq!(
            Commit::from_raw(raw(None, Some(0), Some("x")), 7),
            Err(NormalizeError::MissingIdentity)
        );
        assert_eq!(
            Commit::from_raw(raw(Some("   "), Some(0), Some("x")), 7),
            Err(NormalizeError::MissingIdentity)
        );
    }

    #[test]
    fn test_missing_timestamp_is_fatal() {
        assert_eq!(
            Commit::from_raw(raw(Some("abc1234"), None, Some("x")), 7),
            Err(NormalizeError::MissingTimestamp {
                oid: "abc1234".to_string()
            })
        );
    }

    #[test]
    fn test_single_line_message() {
        let commit = Commit::from_raw(
            raw(Some("abc1234"), Some(0), Some("subject\n\nbody line\r\nmore")),
            7,
        )
        .unwrap();
        assert_eq!(commit.single_line_message(), "subject body line more");
    }

    #[test]
    fn test_single_line_message_drops_control_characters() {
        let commit = Commit::from_raw(
            raw(Some("abc1234"), Some(0), Some("tab\there \u{1b}[31mred\u{1b}[0m\u{7}")),
            7,
        )
        .unwrap();
        assert_eq!(commit.single_line_message(), "tab here [31mred [0m");
    }

    #[test]
    fn test_relative_time() {
        let commit = Commit::from_raw(raw(Some("abc1234"), Some(1_000), None), 7).unwrap();
        assert_eq!(commit.relative_time(1_000 + 2 * 3_600), "2 hours ago");
        assert_eq!(commit.relative_time(500), "just now");
    }

    #[test]
    fn test_normalize_log_stops_at_malformed_entry() {
        let entries = vec![
            raw(Some("aaa"), Some(1), Some("one")),
            raw(None, Some(2), Some("two")),
        ];
        assert!(normalize_log(entries, 7).is_err());
    }

    #[test]
    fn test_raw_entry_from_json() {
        let json = r#"{"oid":"abc1234ffff","author_name":"Linus","author_time":42}"#;
        let entry: RawLogEntry = serde_json::from_str(json).unwrap();
        let commit = Commit::from_raw(entry, 7).unwrap();
        assert_eq!(commit.short_id, "abc1234");
        assert_eq!(commit.message, "");
    }
}
