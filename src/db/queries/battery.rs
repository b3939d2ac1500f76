use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::models::{Battery, BatteryId, NewBattery};

const BATTERY_COLUMNS: &str = "id, label, brand_id, series_id, type_id, cells, capacity_mah, \
                               created_at, enabled, deleted";

fn battery_from_row(row: &Row<'_>) -> rusqlite::Result<Battery> {
    Ok(Battery {
        id: row.get(0)?,
        label: row.get(1)?,
        brand_id: row.get(2)?,
        series_id: row.get(3)?,
        type_id: row.get(4)?,
        cells: row.get(5)?,
        capacity_mah: row.get(6)?,
        created_at: row.get(7)?,
        enabled: row.get(8)?,
        deleted: row.get(9)?,
    })
}

/// Register a new battery
pub fn create_battery(conn: &Connection, battery: &NewBattery) -> rusqlite::Result<BatteryId> {
    conn.execute(
        "INSERT INTO batteries (label, brand_id, series_id, type_id, cells, capacity_mah, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            battery.label,
            battery.brand_id,
            battery.series_id,
            battery.type_id,
            battery.cells,
            battery.capacity_mah,
            battery.created_at,
        ],
    )?;
    Ok(BatteryId::new(conn.last_insert_rowid()))
}

/// Insert a battery keeping its id and flags
pub fn insert_battery(conn: &Connection, battery: &Battery) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO batteries ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            BATTERY_COLUMNS
        ),
        params![
            battery.id,
            battery.label,
            battery.brand_id,
            battery.series_id,
            battery.type_id,
            battery.cells,
            battery.capacity_mah,
            battery.created_at,
            battery.enabled,
            battery.deleted,
        ],
    )?;
    Ok(())
}

/// Get all non-deleted batteries, ordered by label
pub fn list_batteries(conn: &Connection) -> rusqlite::Result<Vec<Battery>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM batteries WHERE deleted = 0 ORDER BY label COLLATE NOCASE, id",
        BATTERY_COLUMNS
    ))?;
    let batteries = stmt.query_map([], battery_from_row)?;
    batteries.collect()
}

/// Get every battery, deleted ones included, ordered by id
pub fn list_all_batteries(conn: &Connection) -> rusqlite::Result<Vec<Battery>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM batteries ORDER BY id",
        BATTERY_COLUMNS
    ))?;
    let batteries = stmt.query_map([], battery_from_row)?;
    batteries.collect()
}

/// Get a battery by ID, even if it was deleted
pub fn get_battery(conn: &Connection, id: BatteryId) -> rusqlite::Result<Option<Battery>> {
    conn.query_row(
        &format!("SELECT {} FROM batteries WHERE id = ?1", BATTERY_COLUMNS),
        params![id],
        battery_from_row,
    )
    .optional()
}

/// Update a battery's descriptive fields
pub fn update_battery(conn: &Connection, battery: &Battery) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE batteries
         SET label = ?1, brand_id = ?2, series_id = ?3, type_id = ?4, cells = ?5, capacity_mah = ?6
         WHERE id = ?7",
        params![
            battery.label,
            battery.brand_id,
            battery.series_id,
            battery.type_id,
            battery.cells,
            battery.capacity_mah,
            battery.id,
        ],
    )
}

pub fn set_battery_enabled(
    conn: &Connection,
    id: BatteryId,
    enabled: bool,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE batteries SET enabled = ?1 WHERE id = ?2",
        params![enabled, id],
    )
}

/// Soft-delete a battery
pub fn delete_battery(conn: &Connection, id: BatteryId) -> rusqlite::Result<usize> {
    conn.execute("UPDATE batteries SET deleted = 1 WHERE id = ?1", params![id])
}

#[cfg(test)]
pub(crate) fn sample_battery(label: &str) -> NewBattery {
    use crate::models::{LookupId, Timestamp};

    // Seeded "Generic" brand, "Standard" series and "LiPo" type
    NewBattery {
        label: label.to_string(),
        brand_id: LookupId::new(1),
        series_id: LookupId::new(1),
        type_id: LookupId::new(1),
        cells: 4,
        capacity_mah: 1500,
        created_at: Timestamp::new(1_000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::db::queries::{create_lookup, delete_lookup, get_lookup};
    use crate::models::LookupKind;

    #[test]
    fn test_create_and_get_battery() {
        let db = Database::open_in_memory().unwrap();
        let id = create_battery(&db.conn, &sample_battery("Pack A")).unwrap();
        assert!(i64::from(id) > 0);

        let battery = get_battery(&db.conn, id).unwrap().unwrap();
        assert_eq!(battery.label, "Pack A");
        assert_eq!(battery.cells, 4);
        assert_eq!(battery.capacity_mah, 1500);
        assert!(battery.enabled);
        assert!(!battery.deleted);
    }

    #[test]
    fn test_deleted_battery_excluded_from_list() {
        let db = Database::open_in_memory().unwrap();
        let keep = create_battery(&db.conn, &sample_battery("Keep")).unwrap();
        let gone = create_battery(&db.conn, &sample_battery("Gone")).unwrap();

        assert_eq!(delete_battery(&db.conn, gone).unwrap(), 1);

        let listed = list_batteries(&db.conn).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep);

        // Still reachable by id and in the full listing
        assert!(get_battery(&db.conn, gone).unwrap().unwrap().deleted);
        assert_eq!(list_all_batteries(&db.conn).unwrap().len(), 2);
    }

    #[test]
    fn test_deleted_brand_still_resolves_for_battery() {
        let db = Database::open_in_memory().unwrap();
        let brand = create_lookup(&db.conn, LookupKind::Brand, "Acme", None).unwrap();
        let mut new = sample_battery("Pack");
        new.brand_id = brand;
        let id = create_battery(&db.conn, &new).unwrap();

        delete_lookup(&db.conn, LookupKind::Brand, brand).unwrap();

        let battery = get_battery(&db.conn, id).unwrap().unwrap();
        let resolved = get_lookup(&db.conn, LookupKind::Brand, battery.brand_id)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.label, "Acme");
        assert!(resolved.deleted);
    }

    #[test]
    fn test_update_battery() {
        let db = Database::open_in_memory().unwrap();
        let id = create_battery(&db.conn, &sample_battery("Pack")).unwrap();
        let mut battery = get_battery(&db.conn, id).unwrap().unwrap();
        battery.label = "Renamed".to_string();
        battery.cells = 6;

        assert_eq!(update_battery(&db.conn, &battery).unwrap(), 1);
        set_battery_enabled(&db.conn, id, false).unwrap();

        let loaded = get_battery(&db.conn, id).unwrap().unwrap();
        assert_eq!(loaded.label, "Renamed");
        assert_eq!(loaded.cells, 6);
        assert!(!loaded.enabled);
    }

    #[test]
    fn test_unknown_brand_rejected() {
        let db = Database::open_in_memory().unwrap();
        let mut new = sample_battery("Orphan");
        new.brand_id = crate::models::LookupId::new(9999);
        assert!(create_battery(&db.conn, &new).is_err());
    }
}
