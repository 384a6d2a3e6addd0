//! Resolves the server's configured timezone.

use time::{OffsetDateTime, PrimitiveDateTime};
use time_tz::{OffsetResult, PrimitiveDateTimeExt, Tz};

use crate::Error;

/// Look up a canonical timezone name such as "Pacific/Auckland".
///
/// # Errors
/// Returns an [Error::InvalidTimezone] if the name is not a known timezone.
pub fn resolve_timezone(canonical_timezone: &str) -> Result<&'static Tz, Error> {
    time_tz::timezones::get_by_name(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {canonical_timezone}");
        Error::InvalidTimezone(canonical_timezone.to_owned())
    })
}

/// The instant a wall clock in `timezone` shows `local`, using the offset in
/// force on that date.
///
/// A time repeated when clocks go back resolves to its first occurrence. A
/// time skipped when clocks go forward takes the offset in force at the same
/// UTC instant.
pub fn local_instant(local: PrimitiveDateTime, timezone: &Tz) -> OffsetDateTime {
    match local.assume_timezone(timezone) {
        OffsetResult::Some(instant) => instant,
        OffsetResult::Ambiguous(first, _) => first,
        OffsetResult::None => local.assume_timezone_utc(timezone),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::Error;

    use super::{local_instant, resolve_timezone};

    #[test]
    fn utc_is_known() {
        let utc = resolve_timezone("Etc/UTC").unwrap();

        assert_eq!(
            local_instant(datetime!(2025-03-01 0:00), utc),
            datetime!(2025-03-01 0:00 UTC)
        );
    }

    #[test]
    fn resolve_reports_unknown_timezone() {
        assert_eq!(
            resolve_timezone("Middle/Earth"),
            Err(Error::InvalidTimezone("Middle/Earth".to_owned()))
        );
    }

    #[test]
    fn local_instant_uses_the_offset_of_that_date() {
        let auckland = resolve_timezone("Pacific/Auckland").unwrap();

        let winter = local_instant(datetime!(2025-07-01 0:00), auckland);
        let summer = local_instant(datetime!(2025-01-01 0:00), auckland);

        assert_eq!(winter, datetime!(2025-06-30 12:00 UTC));
        assert_eq!(summer, datetime!(2024-12-31 11:00 UTC));
    }

    #[test]
    fn local_instant_resolves_repeated_hour_to_first_occurrence() {
        // Clocks in Auckland went back from 3am NZDT to 2am NZST on 2025-04-06.
        let auckland = resolve_timezone("Pacific/Auckland").unwrap();

        let instant = local_instant(datetime!(2025-04-06 2:30), auckland);

        assert_eq!(instant, datetime!(2025-04-05 13:30 UTC));
    }
}
