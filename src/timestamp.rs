//! Timestamp formatting for the transaction store.
//!
//! Stored timestamps and window-query bounds must share one fixed
//! precision: RFC 3339 sorts fractional seconds before whole seconds
//! within the same second (`...:00.5Z` < `...:00Z`), so mixing
//! precisions would break the lexicographic ordering the SQL window
//! comparison relies on.

use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

/// Format a timestamp as an RFC 3339 UTC string with whole-second
/// precision for storage and SQL comparison.
pub(crate) fn format_utc_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .to_offset(UtcOffset::UTC)
        .replace_nanosecond(0)
        .expect("zero is a valid nanosecond")
        .format(&Rfc3339)
        .expect("RFC 3339 formatting of a valid timestamp should not fail")
}
