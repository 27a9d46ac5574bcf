//! Resolves canonical timezone names to UTC offsets.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset for a canonical timezone name such as
/// "Pacific/Auckland", or `None` if the name is not recognized.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

#[cfg(test)]
mod tests {
    use super::get_local_offset;

    #[test]
    fn resolves_utc() {
        assert_eq!(
            get_local_offset("Etc/UTC"),
            Some(time::UtcOffset::UTC),
            "Etc/UTC should resolve to a zero offset"
        );
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert_eq!(get_local_offset("Mars/Olympus_Mons"), None);
    }
}
