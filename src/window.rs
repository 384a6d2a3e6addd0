//! Date windows for filtering and aggregating transactions.

use serde::Serialize;
use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime, Time,
    format_description::well_known::Rfc3339,
    macros::{format_description, time},
};
use time_tz::{OffsetDateTimeExt, Tz};

use crate::{Error, timezone::local_instant};

/// An inclusive range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    /// The earliest instant in the window.
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// The latest instant in the window.
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

impl Window {
    /// The window from the first day of the current month in `timezone` until `now`.
    pub fn month_to_date(now: OffsetDateTime, timezone: &Tz) -> Self {
        let today = now.to_timezone(timezone).date();
        let first_of_month = today - Duration::days(i64::from(today.day()) - 1);

        Self {
            start: local_instant(PrimitiveDateTime::new(first_of_month, Time::MIDNIGHT), timezone),
            end: now,
        }
    }

    /// Build a window from optional query parameters, falling back to
    /// [Window::month_to_date] for whichever bound is missing.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if either bound cannot be parsed, or if
    /// the start comes after the end.
    pub fn from_params(
        start: Option<&str>,
        end: Option<&str>,
        now: OffsetDateTime,
        timezone: &Tz,
    ) -> Result<Self, Error> {
        let default = Self::month_to_date(now, timezone);

        let start = match start {
            Some(text) => parse_instant(text, Bound::Start, timezone)?,
            None => default.start,
        };
        let end = match end {
            Some(text) => parse_instant(text, Bound::End, timezone)?,
            None => default.end,
        };

        if start > end {
            return Err(Error::validation("startDate must not be after endDate"));
        }

        Ok(Self { start, end })
    }

    /// Whether `instant` lies inside the window.
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Which end of a range a date-only value describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// A date-only value means the first millisecond of that day.
    Start,
    /// A date-only value means the last millisecond of that day.
    End,
}

/// Parse an RFC 3339 date-time, or a `YYYY-MM-DD` date interpreted in `timezone`.
///
/// # Errors
///
/// Returns an [Error::Validation] if `text` is in neither format.
pub fn parse_instant(
    text: &str,
    bound: Bound,
    timezone: &Tz,
) -> Result<OffsetDateTime, Error> {
    let text = text.trim();

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(date_time);
    }

    let date = Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::validation(format!("Invalid date \"{text}\"")))?;
    let time = match bound {
        Bound::Start => Time::MIDNIGHT,
        Bound::End => time!(23:59:59.999),
    };

    Ok(local_instant(PrimitiveDateTime::new(date, time), timezone))
}

/// Convert an instant into the unix milliseconds stored in the database.
pub fn to_unix_millis(instant: OffsetDateTime) -> i64 {
    (instant.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Convert unix milliseconds from the database back into a UTC instant.
pub fn from_unix_millis(millis: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
}
