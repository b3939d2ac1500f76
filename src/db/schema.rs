use rusqlite::{Connection, params};

use crate::config::DEFAULT_BATTERY_TYPES;
use crate::models::Settings;

use super::queries::save_settings;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS brands (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL,
            enabled INTEGER NOT NULL DEFAULT 1,
            deleted INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS series (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL,
            color TEXT NOT NULL DEFAULT '#808080',
            enabled INTEGER NOT NULL DEFAULT 1,
            deleted INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS battery_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL,
            enabled INTEGER NOT NULL DEFAULT 1,
            deleted INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS batteries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL,
            brand_id INTEGER NOT NULL REFERENCES brands(id),
            series_id INTEGER NOT NULL REFERENCES series(id),
            type_id INTEGER NOT NULL REFERENCES battery_types(id),
            cells INTEGER NOT NULL CHECK (cells > 0),
            capacity_mah INTEGER NOT NULL CHECK (capacity_mah > 0),
            created_at INTEGER NOT NULL,
            enabled INTEGER NOT NULL DEFAULT 1,
            deleted INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_batteries_deleted ON batteries(deleted);

        CREATE TABLE IF NOT EXISTS usage_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            battery_id INTEGER NOT NULL REFERENCES batteries(id),
            at INTEGER NOT NULL,
            status TEXT NOT NULL CHECK (status IN ('charged', 'stored', 'discharged')),
            enabled INTEGER NOT NULL DEFAULT 1,
            deleted INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_usage_battery_at ON usage_records(battery_id, at);
        CREATE INDEX IF NOT EXISTS idx_usage_deleted ON usage_records(deleted);

        CREATE TABLE IF NOT EXISTS resistance_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            battery_id INTEGER NOT NULL REFERENCES batteries(id),
            at INTEGER NOT NULL,
            cells TEXT NOT NULL,
            deleted INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_resistance_battery_at ON resistance_records(battery_id, at);

        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )?;

    seed_defaults(conn)
}

/// Seed lookups and settings into an empty database
fn seed_defaults(conn: &Connection) -> rusqlite::Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM battery_types", [], |row| row.get(0))?;
    if count == 0 {
        let mut stmt = conn.prepare("INSERT INTO battery_types (label) VALUES (?1)")?;
        for label in DEFAULT_BATTERY_TYPES {
            stmt.execute([label])?;
        }
    }

    let count: i64 = conn.query_row("SELECT COUNT(*) FROM brands", [], |row| row.get(0))?;
    if count == 0 {
        conn.execute("INSERT INTO brands (label) VALUES (?1)", ["Generic"])?;
    }

    let count: i64 = conn.query_row("SELECT COUNT(*) FROM series", [], |row| row.get(0))?;
    if count == 0 {
        conn.execute(
            "INSERT INTO series (label, color) VALUES (?1, ?2)",
            params!["Standard", "#808080"],
        )?;
    }

    let count: i64 = conn.query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?;
    if count == 0 {
        save_settings(conn, &Settings::default())?;
    }

    Ok(())
}
