use chrono::{DateTime, Local, NaiveDate, Utc};

/// Parse a client-side ISO string into an instant.
///
/// Accepts full RFC 3339 (`2024-10-19T12:00:00.000Z`) and bare dates
/// (`2024-10-19`, taken as midnight UTC).
pub fn parse_iso_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    parse_date(s)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Local wall-clock rendering for listings.
pub fn local_datetime(t: &DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
