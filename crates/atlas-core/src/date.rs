//! Calendar-day handling shared by every computation.
//!
//! The backend exchanges dates as `YYYY-MM-DD`, sometimes with a time suffix
//! (`2025-01-15T08:00:00` or `2025-01-15 08:00:00`). Every `date` field is
//! normalized once, while deserializing, through [`normalize_date`]. Values
//! that cannot be parsed become `None` and never match a calendar day.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

/// Wire format for calendar dates.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Truncates a date string at the first `T` or space and parses the rest.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let day = raw
        .trim()
        .split(['T', ' '])
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(day, DAY_FORMAT).ok()
}

/// Formats a day the way the backend expects it in paths and query strings.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// The `days` consecutive dates ending at and including `reference`, oldest first.
pub fn trailing_window(reference: NaiveDate, days: usize) -> Vec<NaiveDate> {
    (0..days as u64)
        .rev()
        .filter_map(|offset| reference.checked_sub_days(Days::new(offset)))
        .collect()
}

/// The calendar day before `day`.
pub fn previous_day(day: NaiveDate) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(1))
}

/// Serde adapter for lenient `date` fields.
///
/// Use with `#[serde(default, deserialize_with = "crate::date::lenient")]`.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(LenientDay)
}

struct LenientDay;

impl<'de> Visitor<'de> for LenientDay {
    type Value = Option<NaiveDate>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a calendar date string")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        let day = normalize_date(value);
        if day.is_none() {
            tracing::trace!(value, "ignoring malformed date");
        }
        Ok(day)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        tracing::trace!("ignoring date sent as a list");
        Ok(None)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        tracing::trace!("ignoring date sent as an object");
        Ok(None)
    }
}
