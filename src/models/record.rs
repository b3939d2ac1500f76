use std::str::FromStr;

use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::int_flag;
use super::{BatteryId, RecordId, ResistanceId, Timestamp};

/// The state a usage record puts a battery in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryStatus {
    Charged,
    #[default]
    Stored,
    Discharged,
}

impl BatteryStatus {
    pub const ALL: [BatteryStatus; 3] = [
        BatteryStatus::Charged,
        BatteryStatus::Stored,
        BatteryStatus::Discharged,
    ];

    /// Stable storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            BatteryStatus::Charged => "charged",
            BatteryStatus::Stored => "stored",
            BatteryStatus::Discharged => "discharged",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown battery status '{0}' (expected charged, stored or discharged)")]
pub struct UnknownStatus(pub String);

impl FromStr for BatteryStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "charged" => Ok(BatteryStatus::Charged),
            "stored" => Ok(BatteryStatus::Stored),
            "discharged" => Ok(BatteryStatus::Discharged),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl ToSql for BatteryStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BatteryStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A charge/store/discharge event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: RecordId,
    pub battery_id: BatteryId,
    pub at: Timestamp,
    pub status: BatteryStatus,
    #[serde(with = "int_flag")]
    pub enabled: bool,
    #[serde(with = "int_flag")]
    pub deleted: bool,
}

/// Internal resistance readings, one per cell, in milliohms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceRecord {
    pub id: ResistanceId,
    pub battery_id: BatteryId,
    pub at: Timestamp,
    pub cells: Vec<f64>,
    #[serde(with = "int_flag")]
    pub deleted: bool,
}

impl ResistanceRecord {
    pub fn average(&self) -> Option<f64> {
        if self.cells.is_empty() {
            return None;
        }
        Some(self.cells.iter().sum::<f64>() / self.cells.len() as f64)
    }

    pub fn max(&self) -> Option<f64> {
        self.cells.iter().copied().reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("charged".parse(), Ok(BatteryStatus::Charged));
        assert_eq!(" Stored ".parse(), Ok(BatteryStatus::Stored));
        assert_eq!("DISCHARGED".parse(), Ok(BatteryStatus::Discharged));
        assert!("empty".parse::<BatteryStatus>().is_err());
    }

    #[test]
    fn test_status_storage_names_round_trip() {
        for status in BatteryStatus::ALL {
            assert_eq!(status.as_str().parse(), Ok(status));
        }
    }

    #[test]
    fn test_resistance_summary() {
        let record = ResistanceRecord {
            id: ResistanceId::new(1),
            battery_id: BatteryId::new(1),
            at: Timestamp::new(0),
            cells: vec![2.0, 4.0, 3.0],
            deleted: false,
        };
        assert_eq!(record.average(), Some(3.0));
        assert_eq!(record.max(), Some(4.0));

        let empty = ResistanceRecord {
            cells: vec![],
            ..record
        };
        assert_eq!(empty.average(), None);
        assert_eq!(empty.max(), None);
    }
}
