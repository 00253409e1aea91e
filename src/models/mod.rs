//! Data models
//!
//! Wire types for the backend. Field names on the wire are the backend's
//! (camelCase Spanish); Rust names are English.

pub mod envelope;
pub mod user;
pub mod normativa;
pub mod anexo;

pub use envelope::*;
pub use user::*;
pub use normativa::*;
pub use anexo::*;

/// Civil date (de)serialization for expiration dates.
///
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp and keeps the date part.
pub(crate) mod civil_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

}
