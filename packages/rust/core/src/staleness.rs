//! Row staleness policy.

use chrono::NaiveDate;

/// A row whose last fetch is older than this many days is due for refresh.
pub const STALE_AFTER_DAYS: i64 = 30;

/// Date format used in the `Last Fetched` column.
pub const LAST_FETCHED_FORMAT: &str = "%Y-%m-%d";

/// Decide whether a row is due for a price refresh.
///
/// An empty `last_fetched` means the row has never been priced. A value
/// that fails to parse is treated the same way: corrupt data reads as
/// stale, never as fresh.
pub fn is_eligible(last_fetched: &str, today: NaiveDate) -> bool {
    if last_fetched.is_empty() {
        return true;
    }
    match NaiveDate::parse_from_str(last_fetched, LAST_FETCHED_FORMAT) {
        Ok(date) => (today - date).num_days() > STALE_AFTER_DAYS,
        Err(_) => true,
    }
}
