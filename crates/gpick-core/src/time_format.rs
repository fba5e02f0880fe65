use serde::Deserialize;
use time::format_description::{parse_owned, parse_strftime_owned, OwnedFormatItem};
use time::OffsetDateTime;

const DEFAULT_ABSOLUTE_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// How commit times are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    #[default]
    Relative,
    Absolute,
    Custom,
}

#[derive(Debug, Clone)]
pub struct TimeFormatter {
    mode: TimeMode,
    absolute_format: Option<OwnedFormatItem>,
    custom_format: Option<OwnedFormatItem>,
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::new(TimeMode::Relative, None)
    }
}

impl TimeFormatter {
    pub fn new(mode: TimeMode, custom_format: Option<&str>) -> Self {
        let absolute_format = parse_owned::<2>(DEFAULT_ABSOLUTE_FORMAT)
            .ok()
            .or_else(|| parse_strftime_owned("%Y-%m-%d %H:%M").ok());
        let custom_format = match mode {
            TimeMode::Custom => custom_format.and_then(parse_format),
            _ => None,
        };
        Self {
            mode,
            absolute_format,
            custom_format,
        }
    }

    pub fn format(&self, epoch: i64, now: i64) -> String {
        match self.mode {
            TimeMode::Relative => format_relative_age(epoch, now),
            TimeMode::Absolute => self.format_with(self.absolute_format.as_ref(), epoch, now),
            TimeMode::Custom => {
                let format = self.custom_format.as_ref().or(self.absolute_format.as_ref());
                self.format_with(format, epoch, now)
            }
        }
    }

    fn format_with(&self, format: Option<&OwnedFormatItem>, epoch: i64, now: i64) -> String {
        format
            .and_then(|format| format_absolute(epoch, format))
            .unwrap_or_else(|| format_relative_age(epoch, now))
    }
}

/// Current wall clock time as seconds since epoch
pub fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

fn parse_format(format: &str) -> Option<OwnedFormatItem> {
    let trimmed = format.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains('%') {
        parse_strftime_owned(trimmed).ok()
    } else {
        parse_owned::<2>(trimmed).ok()
    }
}

fn format_absolute(epoch: i64, format: &OwnedFormatItem) -> Option<String> {
    let date_time = OffsetDateTime::from_unix_timestamp(epoch).ok()?;
    date_time.format(format).ok()
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Human age of `epoch` as seen at `now`. Timestamps in the future read "just now".
pub fn format_relative_age(epoch: i64, now: i64) -> String {
    let age = now.saturating_sub(epoch);
    if age < 10 {
        return "just now".to_string();
    }
    if age < MINUTE {
        return plural(age, "second");
    }
    if age < HOUR {
        return plural(age / MINUTE, "minute");
    }
    if age < DAY {
        return plural(age / HOUR, "hour");
    }
    if age < WEEK {
        return plural(age / DAY, "day");
    }
    if age < MONTH {
        return plural(age / WEEK, "week");
    }
    if age < YEAR {
        return plural((age / MONTH).max(1), "month");
    }
    plural(age / YEAR, "year")
}
