use chrono::{NaiveDate, NaiveDateTime};

/// Date-only layouts seen in complaint exports.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Date-time layouts seen in complaint exports; the time part is discarded.
const DATE_TIME_FORMATS: [&str; 4] = [
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse an occurrence date in any layout the complaint export uses.
///
/// Accepts `YYYY-MM-DD`, `MM/DD/YYYY`, and either of those followed by a
/// time of day. Surrounding whitespace is ignored. Returns `None` when the
/// value matches no known layout.
pub fn parse_occurrence_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(value, format) {
            return Some(stamp.date());
        }
    }
    None
}

/// Parse a strict `YYYY-MM-DD` date, as used for configured cutoffs.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
