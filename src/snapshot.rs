//! JSON export and import of the whole database.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::MAX_CELLS;
use crate::db::{Database, queries};
use crate::error::{CellkeeperError, Result};
use crate::models::{Battery, Lookup, LookupKind, ResistanceRecord, Settings, Timestamp, UsageRecord};
use crate::validation::{validate_alert_days, validate_color, validate_label};

/// Snapshot format written by this version
pub const SNAPSHOT_VERSION: u32 = 1;

/// A full copy of the database, soft-deleted rows included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub exported_at: Timestamp,
    pub settings: Settings,
    pub brands: Vec<Lookup>,
    pub series: Vec<Lookup>,
    pub types: Vec<Lookup>,
    pub batteries: Vec<Battery>,
    pub usage_records: Vec<UsageRecord>,
    #[serde(default)]
    pub resistance_records: Vec<ResistanceRecord>,
}

/// Counts of rows written by an import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub lookups: usize,
    pub batteries: usize,
    pub usage_records: usize,
    pub resistance_records: usize,
}

impl Snapshot {
    pub fn lookups(&self, kind: LookupKind) -> &[Lookup] {
        match kind {
            LookupKind::Brand => &self.brands,
            LookupKind::Series => &self.series,
            LookupKind::Type => &self.types,
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Capture the current database contents
pub fn export(db: &Database, exported_at: Timestamp) -> Result<Snapshot> {
    let conn = &db.conn;
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        exported_at,
        settings: queries::get_settings(conn)?,
        brands: queries::list_all_lookups(conn, LookupKind::Brand)?,
        series: queries::list_all_lookups(conn, LookupKind::Series)?,
        types: queries::list_all_lookups(conn, LookupKind::Type)?,
        batteries: queries::list_all_batteries(conn)?,
        usage_records: queries::list_all_usage_records(conn)?,
        resistance_records: queries::list_all_resistance_records(conn)?,
    };
    info!(
        "Exported {} batteries and {} usage records",
        snapshot.batteries.len(),
        snapshot.usage_records.len()
    );
    Ok(snapshot)
}

/// Apply the same input rules the forms and `Database` enforce
fn validate(snapshot: &Snapshot) -> std::result::Result<(), &'static str> {
    validate_alert_days(snapshot.settings.battery_alert_days)?;
    for kind in LookupKind::ALL {
        for lookup in snapshot.lookups(kind) {
            validate_label(&lookup.label)?;
            if let Some(color) = &lookup.color {
                validate_color(color)?;
            }
        }
    }
    for battery in &snapshot.batteries {
        validate_label(&battery.label)?;
        if !(1..=MAX_CELLS).contains(&battery.cells) || battery.capacity_mah == 0 {
            return Err("Battery cells or capacity out of range");
        }
    }
    let readings_ok = snapshot
        .resistance_records
        .iter()
        .flat_map(|r| &r.cells)
        .all(|c| c.is_finite() && *c >= 0.0);
    if !readings_ok {
        return Err("Readings must be non-negative");
    }
    Ok(())
}

/// Replace all data with the snapshot contents in one transaction
pub fn import(db: &Database, snapshot: &Snapshot) -> Result<ImportSummary> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(CellkeeperError::UnsupportedSnapshot(snapshot.version));
    }
    validate(snapshot).map_err(CellkeeperError::Invalid)?;

    let tx = db.conn.unchecked_transaction()?;

    // Children first so foreign keys hold throughout
    tx.execute_batch(
        "DELETE FROM resistance_records;
         DELETE FROM usage_records;
         DELETE FROM batteries;
         DELETE FROM brands;
         DELETE FROM series;
         DELETE FROM battery_types;
         DELETE FROM settings;",
    )?;

    let mut lookups = 0;
    for kind in LookupKind::ALL {
        for lookup in snapshot.lookups(kind) {
            queries::insert_lookup(&tx, kind, lookup)?;
            lookups += 1;
        }
    }
    for battery in &snapshot.batteries {
        queries::insert_battery(&tx, battery)?;
    }
    for record in &snapshot.usage_records {
        queries::insert_usage_record(&tx, record)?;
    }
    for record in &snapshot.resistance_records {
        queries::insert_resistance_record(&tx, record)?;
    }
    queries::save_settings(&tx, &snapshot.settings)?;

    tx.commit()?;

    let summary = ImportSummary {
        lookups,
        batteries: snapshot.batteries.len(),
        usage_records: snapshot.usage_records.len(),
        resistance_records: snapshot.resistance_records.len(),
    };
    info!("Imported snapshot: {:?}", summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseOps;
    use crate::db::queries::sample_battery;
    use crate::models::{BatteryId, BatteryStatus, Language, RecordId, Theme};

    fn populated() -> Database {
        let db = Database::open_in_memory().unwrap();
        let brand = db.create_lookup(LookupKind::Brand, "Acme", None).unwrap();
        let series = db
            .create_lookup(LookupKind::Series, "Race", Some("#FF0000"))
            .unwrap();

        let mut new = sample_battery("A1");
        new.brand_id = brand;
        new.series_id = series;
        let a = db.create_battery(&new).unwrap();
        let b = db.create_battery(&sample_battery("B1")).unwrap();

        db.add_usage_record(a, BatteryStatus::Charged, Timestamp::new(100))
            .unwrap();
        let removed = db
            .add_usage_record(a, BatteryStatus::Discharged, Timestamp::new(200))
            .unwrap();
        db.delete_usage_record(removed).unwrap();
        db.add_usage_record(b, BatteryStatus::Stored, Timestamp::new(150))
            .unwrap();
        db.add_resistance_record(a, Timestamp::new(300), &[2.5, 2.75])
            .unwrap();
        db.delete_lookup(LookupKind::Brand, brand).unwrap();
        db.save_settings(&Settings {
            battery_alert_days: 10,
            language: Language::De,
            theme: Theme::Dark,
        })
        .unwrap();
        db
    }

    #[test]
    fn test_export_includes_deleted_rows() {
        let db = populated();
        let snapshot = export(&db, Timestamp::new(1)).unwrap();

        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert!(snapshot.brands.iter().any(|b| b.label == "Acme" && b.deleted));
        assert_eq!(snapshot.usage_records.len(), 3);
        assert!(snapshot.usage_records.iter().any(|r| r.deleted));
        assert_eq!(snapshot.settings.battery_alert_days, 10);
    }

    #[test]
    fn test_export_import_reproduces_data() {
        let source = populated();
        let snapshot = export(&source, Timestamp::new(1)).unwrap();

        let target = Database::open_in_memory().unwrap();
        let summary = import(&target, &snapshot).unwrap();
        assert_eq!(summary.batteries, 2);
        assert_eq!(summary.usage_records, 3);

        let again = export(&target, Timestamp::new(1)).unwrap();
        assert_eq!(again, snapshot);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let source = populated();
        let snapshot = export(&source, Timestamp::new(42)).unwrap();
        snapshot.write_to(&path).unwrap();

        let loaded = Snapshot::read_from(&path).unwrap();
        assert_eq!(loaded, snapshot);

        let target = Database::open_in_memory().unwrap();
        import(&target, &loaded).unwrap();
        let records = target.list_usage_records(BatteryId::new(1)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, RecordId::new(1));
    }

    #[test]
    fn test_flags_written_as_integers() {
        let snapshot = export(&populated(), Timestamp::new(1)).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["batteries"][0]["deleted"], 0);
        assert_eq!(json["batteries"][0]["enabled"], 1);
        assert_eq!(json["usage_records"][0]["status"], "charged");
    }

    #[test]
    fn test_unknown_version_rejected_without_changes() {
        let db = populated();
        let mut snapshot = export(&db, Timestamp::new(1)).unwrap();
        snapshot.version = 99;
        snapshot.batteries.clear();

        assert!(matches!(
            import(&db, &snapshot),
            Err(CellkeeperError::UnsupportedSnapshot(99))
        ));
        assert_eq!(db.list_batteries().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_content_rejected_without_changes() {
        let db = populated();
        let good = export(&db, Timestamp::new(1)).unwrap();

        let mut bad_color = good.clone();
        bad_color.series[0].color = Some("#aé€".to_string());
        let mut empty_label = good.clone();
        empty_label.brands[0].label = String::new();
        let mut huge_days = good.clone();
        huge_days.settings.battery_alert_days = 5_000_000_000_000_000_000;
        let mut zero_days = good.clone();
        zero_days.settings.battery_alert_days = 0;
        let mut no_cells = good.clone();
        no_cells.batteries[0].cells = 0;

        for snapshot in [bad_color, empty_label, huge_days, zero_days, no_cells] {
            assert!(matches!(
                import(&db, &snapshot),
                Err(CellkeeperError::Invalid(_))
            ));
        }
        assert_eq!(export(&db, Timestamp::new(1)).unwrap(), good);
    }

    #[test]
    fn test_failed_import_rolls_back() {
        let db = populated();
        let mut snapshot = export(&db, Timestamp::new(1)).unwrap();
        // A record pointing at a battery that is not in the snapshot
        snapshot.usage_records[0].battery_id = BatteryId::new(999);

        assert!(import(&db, &snapshot).is_err());
        assert_eq!(db.list_batteries().unwrap().len(), 2);
        assert_eq!(db.get_settings().unwrap().battery_alert_days, 10);
    }
}
