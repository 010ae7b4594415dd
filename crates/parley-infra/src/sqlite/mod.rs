//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod conversation;
pub mod pool;
pub mod user;

use chrono::{DateTime, SecondsFormat, Utc};
use parley_types::error::RepositoryError;

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 (nanoseconds, `Z` suffix) so text ordering in
/// SQL matches chronological ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_datetimes_sort_chronologically() {
        let a = DateTime::parse_from_rfc3339("2025-01-01T10:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);
        let b = DateTime::parse_from_rfc3339("2025-01-01T10:00:00.123456789Z")
            .unwrap()
            .with_timezone(&Utc);
        let c = DateTime::parse_from_rfc3339("2025-01-01T10:00:01Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut formatted = vec![format_datetime(&c), format_datetime(&a), format_datetime(&b)];
        formatted.sort();
        assert_eq!(
            formatted,
            vec![format_datetime(&b), format_datetime(&a), format_datetime(&c)]
        );
    }

    #[test]
    fn test_datetime_roundtrip() {
        let now = Utc::now();
        assert_eq!(parse_datetime(&format_datetime(&now)).unwrap(), now);
        assert!(parse_datetime("yesterday").is_err());
    }
}
