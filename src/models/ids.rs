use std::fmt;

use chrono::{DateTime, Local};
use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

const SECS_PER_DAY: i64 = 24 * 60 * 60;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map(Self)
            }
        }
    };
}

row_id!(
    /// Row id of a battery
    BatteryId
);
row_id!(
    /// Row id of a brand, series or battery type
    LookupId
);
row_id!(
    /// Row id of a usage record
    RecordId
);
row_id!(
    /// Row id of a resistance record
    ResistanceId
);

/// A point in time as Unix seconds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const fn new(secs: i64) -> Self {
        Self(secs)
    }

    pub fn as_secs(self) -> i64 {
        self.0
    }

    /// Get the timestamp as a local DateTime
    pub fn datetime(self) -> DateTime<Local> {
        DateTime::from_timestamp(self.0, 0)
            .map(|dt| dt.with_timezone(&Local))
            .unwrap_or_else(Local::now)
    }

    /// Whole days from `self` until `later`, floored and never negative
    pub fn days_until(self, later: Timestamp) -> i64 {
        (later.0 - self.0).max(0) / SECS_PER_DAY
    }

    /// Format as "YYYY-MM-DD"
    pub fn format_date(self) -> String {
        self.datetime().format("%Y-%m-%d").to_string()
    }

    /// Format as "YYYY-MM-DD HH:MM"
    pub fn format_datetime(self) -> String {
        self.datetime().format("%Y-%m-%d %H:%M").to_string()
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_until_floors() {
        let start = Timestamp::new(0);
        assert_eq!(start.days_until(Timestamp::new(SECS_PER_DAY - 1)), 0);
        assert_eq!(start.days_until(Timestamp::new(SECS_PER_DAY)), 1);
        assert_eq!(start.days_until(Timestamp::new(3 * SECS_PER_DAY + 5)), 3);
    }

    #[test]
    fn test_days_until_never_negative() {
        let later = Timestamp::new(10 * SECS_PER_DAY);
        assert_eq!(later.days_until(Timestamp::new(0)), 0);
    }

    #[test]
    fn test_id_display_and_conversion() {
        let id = BatteryId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{:>4}", id), "  42");
        assert_eq!(i64::from(id), 42);
        assert_eq!(BatteryId::from(42), id);
    }

    #[test]
    fn test_timestamp_serializes_as_integer() {
        let json = serde_json::to_string(&Timestamp::new(1234)).unwrap();
        assert_eq!(json, "1234");
    }
}
