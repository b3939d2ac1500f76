use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};

use crate::models::{BatteryId, ResistanceId, ResistanceRecord, Timestamp};

fn encode_cells(cells: &[f64]) -> rusqlite::Result<String> {
    serde_json::to_string(cells).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ResistanceRecord> {
    let cells: String = row.get(3)?;
    let cells = serde_json::from_str(&cells)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(ResistanceRecord {
        id: row.get(0)?,
        battery_id: row.get(1)?,
        at: row.get(2)?,
        cells,
        deleted: row.get(4)?,
    })
}

/// Store one set of per-cell resistance readings
pub fn add_resistance_record(
    conn: &Connection,
    battery_id: BatteryId,
    at: Timestamp,
    cells: &[f64],
) -> rusqlite::Result<ResistanceId> {
    conn.execute(
        "INSERT INTO resistance_records (battery_id, at, cells) VALUES (?1, ?2, ?3)",
        params![battery_id, at, encode_cells(cells)?],
    )?;
    Ok(ResistanceId::new(conn.last_insert_rowid()))
}

/// Insert a resistance record keeping its id and flags
pub fn insert_resistance_record(
    conn: &Connection,
    record: &ResistanceRecord,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO resistance_records (id, battery_id, at, cells, deleted)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.id,
            record.battery_id,
            record.at,
            encode_cells(&record.cells)?,
            record.deleted,
        ],
    )?;
    Ok(())
}

/// Get a battery's non-deleted resistance records, newest first
pub fn list_resistance_records(
    conn: &Connection,
    battery_id: BatteryId,
) -> rusqlite::Result<Vec<ResistanceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, battery_id, at, cells, deleted
         FROM resistance_records
         WHERE battery_id = ?1 AND deleted = 0
         ORDER BY at DESC, id DESC",
    )?;
    let records = stmt.query_map(params![battery_id], record_from_row)?;
    records.collect()
}

/// Get every resistance record, deleted ones included, ordered by id
pub fn list_all_resistance_records(conn: &Connection) -> rusqlite::Result<Vec<ResistanceRecord>> {
    let mut stmt = conn
        .prepare("SELECT id, battery_id, at, cells, deleted FROM resistance_records ORDER BY id")?;
    let records = stmt.query_map([], record_from_row)?;
    records.collect()
}

/// Soft-delete a resistance record
pub fn delete_resistance_record(conn: &Connection, id: ResistanceId) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE resistance_records SET deleted = 1 WHERE id = ?1",
        params![id],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::db::queries::sample_battery;
    use crate::db::queries::create_battery;

    #[test]
    fn test_cells_round_trip_through_sqlite() {
        let db = Database::open_in_memory().unwrap();
        let battery = create_battery(&db.conn, &sample_battery("Pack")).unwrap();

        let cells = [2.5, 3.0, 2.75, 3.25];
        add_resistance_record(&db.conn, battery, Timestamp::new(500), &cells).unwrap();

        let records = list_resistance_records(&db.conn, battery).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cells, cells.to_vec());
        assert_eq!(records[0].at, Timestamp::new(500));
    }

    #[test]
    fn test_deleted_resistance_hidden() {
        let db = Database::open_in_memory().unwrap();
        let battery = create_battery(&db.conn, &sample_battery("Pack")).unwrap();

        let old = add_resistance_record(&db.conn, battery, Timestamp::new(100), &[4.0]).unwrap();
        add_resistance_record(&db.conn, battery, Timestamp::new(200), &[5.0]).unwrap();
        delete_resistance_record(&db.conn, old).unwrap();

        let records = list_resistance_records(&db.conn, battery).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cells, vec![5.0]);
        assert_eq!(list_all_resistance_records(&db.conn).unwrap().len(), 2);
    }
}
