//! Calendar-date helpers shared by the ingredient endpoints.

use time::{macros::format_description, Date};

/// Parses a `YYYY-MM-DD` date.
pub fn parse_iso(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: Date, to: Date) -> i64 {
    (to - from).whole_days()
}

/// Serde adapter rendering a `Date` as `YYYY-MM-DD`. Response-side only.
pub mod iso_date {
    use serde::Serializer;
    use time::{macros::format_description, Date};

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        let text = date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        s.serialize_str(&text)
    }
}
