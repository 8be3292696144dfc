//! Day-range helpers shared by the post and topic date filters.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domains::{DomainError, DomainResult};

/// Parses a strict `YYYY-MM-DD` date and returns the UTC range
/// `[T00:00:00Z, T23:59:59Z]`, both ends inclusive.
pub fn day_range(date: &str) -> DomainResult<(DateTime<Utc>, DateTime<Utc>)> {
    let well_formed = date.len() == 10
        && date.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !well_formed {
        return Err(DomainError::InvalidDate(date.to_string()));
    }

    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidDate(date.to_string()))?;
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = day
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| DomainError::InvalidDate(date.to_string()))?
        .and_utc();
    Ok((start, end))
}
