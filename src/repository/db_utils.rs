// ==========================================
// Resto Supply - shared row-mapping helpers
// ==========================================
// Dates: TEXT %Y-%m-%d; timestamps: RFC 3339 TEXT.
// Parse failures fall back to epoch/now rather than aborting a row map;
// the schema writes these columns exclusively through the helpers below.
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};

/// Format a business date for storage.
pub(crate) fn date_to_db(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Parse a stored business date.
pub(crate) fn date_from_db(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}

/// Format an audit timestamp for storage.
pub(crate) fn ts_to_db(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

/// Parse a stored audit timestamp.
pub(crate) fn ts_from_db(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| DateTime::<Utc>::from_timestamp(0, 0).unwrap())
}
