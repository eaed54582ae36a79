//! Date and time utility functions
//!
//! Conversions between the wall-clock values entered in forms, the
//! timestamps stored in the document database, and the strings shown in the
//! interface.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::constants::LAST_LOGIN_NONE;

/// Format of task start/end datetimes as entered and displayed.
pub const TASK_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format of session dates.
pub const SESSION_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display format for session times, e.g. `10:00 AM`.
pub const SESSION_TIME_FORMAT: &str = "%-I:%M %p";

/// Long human date, e.g. `December 31, 2024`.
pub const LONG_DATE_FORMAT: &str = "%B %-d, %Y";

/// Task datetime as shown on detail pages, e.g. `9 Nov 2024, 10:00 AM`.
pub const DISPLAY_DATETIME_FORMAT: &str = "%-d %b %Y, %-I:%M %p";

/// Parse a task datetime in `YYYY-MM-DDTHH:MM` form
pub fn parse_task_datetime(input: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(input.trim(), TASK_DATETIME_FORMAT)
}

/// Format a task datetime back into `YYYY-MM-DDTHH:MM`
pub fn format_task_datetime(value: NaiveDateTime) -> String {
    value.format(TASK_DATETIME_FORMAT).to_string()
}

/// Format a task datetime for display
pub fn format_display_datetime(value: NaiveDateTime) -> String {
    value.format(DISPLAY_DATETIME_FORMAT).to_string()
}

/// Convert a local wall-clock datetime into a store timestamp.
///
/// Returns `None` for wall-clock times that do not exist in the local zone
/// (daylight-saving gaps). Ambiguous times resolve to the earlier instant.
pub fn local_to_timestamp(value: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&value)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Convert a store timestamp into local wall-clock time
pub fn timestamp_to_local(value: DateTime<Utc>) -> NaiveDateTime {
    value.with_timezone(&Local).naive_local()
}

/// Format a date as `Month D, YYYY`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format(LONG_DATE_FORMAT).to_string()
}

/// Text for the last-login line of the welcome banner.
pub fn format_last_login(last_login: Option<DateTime<Utc>>) -> String {
    match last_login {
        Some(ts) => format!("Last login: {}", format_long_date(ts.with_timezone(&Local).date_naive())),
        None => format!("Last login: {}", LAST_LOGIN_NONE),
    }
}

/// Validate and normalise a session date (`YYYY-MM-DD`)
pub fn normalize_session_date(input: &str) -> Option<String> {
    NaiveDate::parse_from_str(input.trim(), SESSION_DATE_FORMAT)
        .ok()
        .map(|d| d.format(SESSION_DATE_FORMAT).to_string())
}

/// Accept `HH:MM` (24h) or `H:MM AM` and normalise to `H:MM AM`
pub fn normalize_session_time(input: &str) -> Option<String> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&trimmed.to_uppercase(), "%I:%M %p"))
        .ok()
        .map(|t| t.format(SESSION_TIME_FORMAT).to_string())
}
