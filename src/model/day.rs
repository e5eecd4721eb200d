use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer};

/// Calendar day of a `date` column, which may hold a plain date or a timestamp
pub fn day_of(value: &str) -> Option<NaiveDate> {
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// `deserialize_with` adapter for [`day_of`]
pub fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    day_of(&raw).ok_or_else(|| de::Error::custom(format!("invalid date '{raw}'")))
}
