use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::models::{BatteryId, BatteryStatus, RecordId, Timestamp, UsageRecord};

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<UsageRecord> {
    Ok(UsageRecord {
        id: row.get(0)?,
        battery_id: row.get(1)?,
        at: row.get(2)?,
        status: row.get(3)?,
        enabled: row.get(4)?,
        deleted: row.get(5)?,
    })
}

/// Append a status change for a battery
pub fn add_usage_record(
    conn: &Connection,
    battery_id: BatteryId,
    status: BatteryStatus,
    at: Timestamp,
) -> rusqlite::Result<RecordId> {
    conn.execute(
        "INSERT INTO usage_records (battery_id, at, status) VALUES (?1, ?2, ?3)",
        params![battery_id, at, status],
    )?;
    Ok(RecordId::new(conn.last_insert_rowid()))
}

/// Insert a usage record keeping its id and flags
pub fn insert_usage_record(conn: &Connection, record: &UsageRecord) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO usage_records (id, battery_id, at, status, enabled, deleted)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.id,
            record.battery_id,
            record.at,
            record.status,
            record.enabled,
            record.deleted,
        ],
    )?;
    Ok(())
}

/// Get a battery's non-deleted records, newest first
pub fn list_usage_records(
    conn: &Connection,
    battery_id: BatteryId,
) -> rusqlite::Result<Vec<UsageRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, battery_id, at, status, enabled, deleted
         FROM usage_records
         WHERE battery_id = ?1 AND deleted = 0
         ORDER BY at DESC, id DESC",
    )?;
    let records = stmt.query_map(params![battery_id], record_from_row)?;
    records.collect()
}

/// Get every usage record, deleted ones included, ordered by id
pub fn list_all_usage_records(conn: &Connection) -> rusqlite::Result<Vec<UsageRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, battery_id, at, status, enabled, deleted FROM usage_records ORDER BY id",
    )?;
    let records = stmt.query_map([], record_from_row)?;
    records.collect()
}

/// Get the most recent non-deleted record for a battery
pub fn latest_usage_record(
    conn: &Connection,
    battery_id: BatteryId,
) -> rusqlite::Result<Option<UsageRecord>> {
    conn.query_row(
        "SELECT id, battery_id, at, status, enabled, deleted
         FROM usage_records
         WHERE battery_id = ?1 AND deleted = 0
         ORDER BY at DESC, id DESC
         LIMIT 1",
        params![battery_id],
        record_from_row,
    )
    .optional()
}

/// Soft-delete a usage record
pub fn delete_usage_record(conn: &Connection, id: RecordId) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE usage_records SET deleted = 1 WHERE id = ?1",
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
    fn test_records_listed_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let battery = create_battery(&db.conn, &sample_battery("Pack")).unwrap();

        add_usage_record(&db.conn, battery, BatteryStatus::Charged, Timestamp::new(100)).unwrap();
        add_usage_record(&db.conn, battery, BatteryStatus::Discharged, Timestamp::new(300))
            .unwrap();
        add_usage_record(&db.conn, battery, BatteryStatus::Stored, Timestamp::new(200)).unwrap();

        let records = list_usage_records(&db.conn, battery).unwrap();
        let statuses: Vec<BatteryStatus> = records.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                BatteryStatus::Discharged,
                BatteryStatus::Stored,
                BatteryStatus::Charged
            ]
        );
    }

    #[test]
    fn test_latest_skips_deleted() {
        let db = Database::open_in_memory().unwrap();
        let battery = create_battery(&db.conn, &sample_battery("Pack")).unwrap();

        add_usage_record(&db.conn, battery, BatteryStatus::Charged, Timestamp::new(100)).unwrap();
        let newest =
            add_usage_record(&db.conn, battery, BatteryStatus::Discharged, Timestamp::new(200))
                .unwrap();

        delete_usage_record(&db.conn, newest).unwrap();

        let latest = latest_usage_record(&db.conn, battery).unwrap().unwrap();
        assert_eq!(latest.status, BatteryStatus::Charged);
        assert_eq!(list_usage_records(&db.conn, battery).unwrap().len(), 1);
        assert_eq!(list_all_usage_records(&db.conn).unwrap().len(), 2);
    }

    #[test]
    fn test_same_timestamp_breaks_tie_by_id() {
        let db = Database::open_in_memory().unwrap();
        let battery = create_battery(&db.conn, &sample_battery("Pack")).unwrap();

        add_usage_record(&db.conn, battery, BatteryStatus::Charged, Timestamp::new(100)).unwrap();
        add_usage_record(&db.conn, battery, BatteryStatus::Stored, Timestamp::new(100)).unwrap();

        let latest = latest_usage_record(&db.conn, battery).unwrap().unwrap();
        assert_eq!(latest.status, BatteryStatus::Stored);
    }

    #[test]
    fn test_no_records() {
        let db = Database::open_in_memory().unwrap();
        let battery = create_battery(&db.conn, &sample_battery("Pack")).unwrap();
        assert!(latest_usage_record(&db.conn, battery).unwrap().is_none());
    }
}
