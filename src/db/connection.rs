use std::path::Path;

use log::{debug, info};
use rusqlite::Connection;

use crate::config::get_db_path;
use crate::error::{CellkeeperError, Result};
use crate::validation::{validate_alert_days, validate_label};
use crate::models::{
    Battery, BatteryId, BatteryStatus, Lookup, LookupId, LookupKind, NewBattery, RecordId,
    ResistanceId, ResistanceRecord, Settings, Timestamp, UsageRecord,
};

use super::schema::init_schema;
use super::{DatabaseOps, queries};

/// Database connection wrapper
pub struct Database {
    pub conn: Connection,
}

impl Database {
    /// Open the database at the default location, creating it if necessary
    pub fn open() -> Result<Self> {
        Self::open_path(&get_db_path()?)
    }

    /// Open the database at `path`, creating it if necessary
    pub fn open_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Fail with `NotFound` unless the battery exists and is not deleted
    fn require_live_battery(&self, id: BatteryId) -> Result<Battery> {
        match queries::get_battery(&self.conn, id)? {
            Some(battery) if !battery.deleted => Ok(battery),
            _ => Err(not_found("battery", id.into())),
        }
    }
}

fn not_found(entity: &'static str, id: i64) -> CellkeeperError {
    CellkeeperError::NotFound { entity, id }
}

/// Map "no rows touched" to `NotFound`
fn expect_one(affected: usize, entity: &'static str, id: i64) -> Result<()> {
    if affected == 0 {
        Err(not_found(entity, id))
    } else {
        Ok(())
    }
}

impl DatabaseOps for Database {
    fn create_lookup(
        &self,
        kind: LookupKind,
        label: &str,
        color: Option<&str>,
    ) -> Result<LookupId> {
        let id = queries::create_lookup(&self.conn, kind, label, color)?;
        info!("Created {} {} ({})", kind.entity(), id, label);
        Ok(id)
    }

    fn list_lookups(&self, kind: LookupKind) -> Result<Vec<Lookup>> {
        queries::list_lookups(&self.conn, kind).map_err(Into::into)
    }

    fn get_lookup(&self, kind: LookupKind, id: LookupId) -> Result<Lookup> {
        queries::get_lookup(&self.conn, kind, id)?.ok_or_else(|| not_found(kind.entity(), id.into()))
    }

    fn update_lookup(
        &self,
        kind: LookupKind,
        id: LookupId,
        label: &str,
        color: Option<&str>,
    ) -> Result<()> {
        let affected = queries::update_lookup(&self.conn, kind, id, label, color)?;
        expect_one(affected, kind.entity(), id.into())
    }

    fn set_lookup_enabled(&self, kind: LookupKind, id: LookupId, enabled: bool) -> Result<()> {
        let affected = queries::set_lookup_enabled(&self.conn, kind, id, enabled)?;
        expect_one(affected, kind.entity(), id.into())
    }

    fn delete_lookup(&self, kind: LookupKind, id: LookupId) -> Result<()> {
        let affected = queries::delete_lookup(&self.conn, kind, id)?;
        expect_one(affected, kind.entity(), id.into())?;
        info!("Deleted {} {}", kind.entity(), id);
        Ok(())
    }

    fn count_batteries_using(&self, kind: LookupKind, id: LookupId) -> Result<i64> {
        queries::count_batteries_using(&self.conn, kind, id).map_err(Into::into)
    }

    fn create_battery(&self, battery: &NewBattery) -> Result<BatteryId> {
        validate_label(&battery.label).map_err(CellkeeperError::Invalid)?;
        let id = queries::create_battery(&self.conn, battery)?;
        info!("Created battery {} ({})", id, battery.label);
        Ok(id)
    }

    fn list_batteries(&self) -> Result<Vec<Battery>> {
        queries::list_batteries(&self.conn).map_err(Into::into)
    }

    fn get_battery(&self, id: BatteryId) -> Result<Battery> {
        queries::get_battery(&self.conn, id)?.ok_or_else(|| not_found("battery", id.into()))
    }

    fn update_battery(&self, battery: &Battery) -> Result<()> {
        validate_label(&battery.label).map_err(CellkeeperError::Invalid)?;
        let affected = queries::update_battery(&self.conn, battery)?;
        expect_one(affected, "battery", battery.id.into())
    }

    fn set_battery_enabled(&self, id: BatteryId, enabled: bool) -> Result<()> {
        let affected = queries::set_battery_enabled(&self.conn, id, enabled)?;
        expect_one(affected, "battery", id.into())
    }

    fn delete_battery(&self, id: BatteryId) -> Result<()> {
        let affected = queries::delete_battery(&self.conn, id)?;
        expect_one(affected, "battery", id.into())?;
        info!("Deleted battery {}", id);
        Ok(())
    }

    fn add_usage_record(
        &self,
        battery_id: BatteryId,
        status: BatteryStatus,
        at: Timestamp,
    ) -> Result<RecordId> {
        self.require_live_battery(battery_id)?;
        let id = queries::add_usage_record(&self.conn, battery_id, status, at)?;
        debug!(
            "Recorded battery {} as {} at {}",
            battery_id,
            status.as_str(),
            at.as_secs()
        );
        Ok(id)
    }

    fn list_usage_records(&self, battery_id: BatteryId) -> Result<Vec<UsageRecord>> {
        queries::list_usage_records(&self.conn, battery_id).map_err(Into::into)
    }

    fn latest_usage_record(&self, battery_id: BatteryId) -> Result<Option<UsageRecord>> {
        queries::latest_usage_record(&self.conn, battery_id).map_err(Into::into)
    }

    fn delete_usage_record(&self, id: RecordId) -> Result<()> {
        let affected = queries::delete_usage_record(&self.conn, id)?;
        expect_one(affected, "usage record", id.into())
    }

    fn add_resistance_record(
        &self,
        battery_id: BatteryId,
        at: Timestamp,
        cells: &[f64],
    ) -> Result<ResistanceId> {
        self.require_live_battery(battery_id)?;
        let id = queries::add_resistance_record(&self.conn, battery_id, at, cells)?;
        debug!("Recorded {} cell resistances for battery {}", cells.len(), battery_id);
        Ok(id)
    }

    fn list_resistance_records(&self, battery_id: BatteryId) -> Result<Vec<ResistanceRecord>> {
        queries::list_resistance_records(&self.conn, battery_id).map_err(Into::into)
    }

    fn delete_resistance_record(&self, id: ResistanceId) -> Result<()> {
        let affected = queries::delete_resistance_record(&self.conn, id)?;
        expect_one(affected, "resistance record", id.into())
    }

    fn get_settings(&self) -> Result<Settings> {
        queries::get_settings(&self.conn).map_err(Into::into)
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        validate_alert_days(settings.battery_alert_days).map_err(CellkeeperError::Invalid)?;
        queries::save_settings(&self.conn, settings)?;
        info!("Saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::sample_battery;

    #[test]
    fn test_mutating_unknown_ids_is_not_found() {
        let db = Database::open_in_memory().unwrap();

        let err = db.delete_battery(BatteryId::new(42)).unwrap_err();
        assert!(matches!(
            err,
            CellkeeperError::NotFound {
                entity: "battery",
                id: 42
            }
        ));

        assert!(matches!(
            db.delete_lookup(LookupKind::Series, LookupId::new(99)),
            Err(CellkeeperError::NotFound { .. })
        ));
        assert!(matches!(
            db.get_battery(BatteryId::new(7)),
            Err(CellkeeperError::NotFound { .. })
        ));
    }

    #[test]
    fn test_records_rejected_for_deleted_battery() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_battery(&sample_battery("Pack")).unwrap();
        db.add_usage_record(id, BatteryStatus::Charged, Timestamp::new(10))
            .unwrap();

        db.delete_battery(id).unwrap();

        assert!(matches!(
            db.add_usage_record(id, BatteryStatus::Stored, Timestamp::new(20)),
            Err(CellkeeperError::NotFound { .. })
        ));
        assert!(matches!(
            db.add_resistance_record(id, Timestamp::new(20), &[3.0]),
            Err(CellkeeperError::NotFound { .. })
        ));
        // History stays readable
        assert_eq!(db.list_usage_records(id).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.create_battery(&sample_battery("  ")),
            Err(CellkeeperError::Invalid(_))
        ));

        let settings = Settings {
            battery_alert_days: 0,
            ..Settings::default()
        };
        assert!(matches!(
            db.save_settings(&settings),
            Err(CellkeeperError::Invalid(_))
        ));
        assert_eq!(db.get_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_open_path_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cellkeeper.db");

        {
            let db = Database::open_path(&path).unwrap();
            db.create_battery(&sample_battery("Persisted")).unwrap();
        }

        let reopened = Database::open_path(&path).unwrap();
        let batteries = reopened.list_batteries().unwrap();
        assert_eq!(batteries.len(), 1);
        assert_eq!(batteries[0].label, "Persisted");
    }
}
