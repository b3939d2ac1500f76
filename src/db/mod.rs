mod connection;
pub mod queries;
mod schema;

pub use connection::Database;

use crate::error::Result;
use crate::models::{
    Battery, BatteryId, BatteryStatus, Lookup, LookupId, LookupKind, NewBattery, RecordId,
    ResistanceId, ResistanceRecord, Settings, Timestamp, UsageRecord,
};

/// Store operations the rest of the program relies on
pub trait DatabaseOps {
    fn create_lookup(&self, kind: LookupKind, label: &str, color: Option<&str>)
    -> Result<LookupId>;
    fn list_lookups(&self, kind: LookupKind) -> Result<Vec<Lookup>>;
    fn get_lookup(&self, kind: LookupKind, id: LookupId) -> Result<Lookup>;
    fn update_lookup(
        &self,
        kind: LookupKind,
        id: LookupId,
        label: &str,
        color: Option<&str>,
    ) -> Result<()>;
    fn set_lookup_enabled(&self, kind: LookupKind, id: LookupId, enabled: bool) -> Result<()>;
    fn delete_lookup(&self, kind: LookupKind, id: LookupId) -> Result<()>;
    fn count_batteries_using(&self, kind: LookupKind, id: LookupId) -> Result<i64>;

    fn create_battery(&self, battery: &NewBattery) -> Result<BatteryId>;
    fn list_batteries(&self) -> Result<Vec<Battery>>;
    fn get_battery(&self, id: BatteryId) -> Result<Battery>;
    fn update_battery(&self, battery: &Battery) -> Result<()>;
    fn set_battery_enabled(&self, id: BatteryId, enabled: bool) -> Result<()>;
    fn delete_battery(&self, id: BatteryId) -> Result<()>;

    fn add_usage_record(
        &self,
        battery_id: BatteryId,
        status: BatteryStatus,
        at: Timestamp,
    ) -> Result<RecordId>;
    fn list_usage_records(&self, battery_id: BatteryId) -> Result<Vec<UsageRecord>>;
    fn latest_usage_record(&self, battery_id: BatteryId) -> Result<Option<UsageRecord>>;
    fn delete_usage_record(&self, id: RecordId) -> Result<()>;

    fn add_resistance_record(
        &self,
        battery_id: BatteryId,
        at: Timestamp,
        cells: &[f64],
    ) -> Result<ResistanceId>;
    fn list_resistance_records(&self, battery_id: BatteryId) -> Result<Vec<ResistanceRecord>>;
    fn delete_resistance_record(&self, id: ResistanceId) -> Result<()>;

    fn get_settings(&self) -> Result<Settings>;
    fn save_settings(&self, settings: &Settings) -> Result<()>;
}
