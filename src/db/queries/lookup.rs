use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::models::{Lookup, LookupId, LookupKind};

const DEFAULT_SERIES_COLOR: &str = "#808080";

/// Column expression for the color, which only series store
fn color_column(kind: LookupKind) -> &'static str {
    if kind.has_color() { "color" } else { "NULL" }
}

fn select_sql(kind: LookupKind, filter: &str, order: &str) -> String {
    format!(
        "SELECT id, label, {}, enabled, deleted FROM {} {} ORDER BY {}",
        color_column(kind),
        kind.table(),
        filter,
        order
    )
}

fn lookup_from_row(row: &Row<'_>) -> rusqlite::Result<Lookup> {
    Ok(Lookup {
        id: row.get(0)?,
        label: row.get(1)?,
        color: row.get(2)?,
        enabled: row.get(3)?,
        deleted: row.get(4)?,
    })
}

/// Create a new brand, series or type
pub fn create_lookup(
    conn: &Connection,
    kind: LookupKind,
    label: &str,
    color: Option<&str>,
) -> rusqlite::Result<LookupId> {
    if kind.has_color() {
        conn.execute(
            "INSERT INTO series (label, color) VALUES (?1, ?2)",
            params![label, color.unwrap_or(DEFAULT_SERIES_COLOR)],
        )?;
    } else {
        conn.execute(
            &format!("INSERT INTO {} (label) VALUES (?1)", kind.table()),
            params![label],
        )?;
    }
    Ok(LookupId::new(conn.last_insert_rowid()))
}

/// Insert a lookup keeping its id and flags
pub fn insert_lookup(conn: &Connection, kind: LookupKind, lookup: &Lookup) -> rusqlite::Result<()> {
    if kind.has_color() {
        conn.execute(
            "INSERT INTO series (id, label, color, enabled, deleted) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                lookup.id,
                lookup.label,
                lookup.color.as_deref().unwrap_or(DEFAULT_SERIES_COLOR),
                lookup.enabled,
                lookup.deleted,
            ],
        )?;
    } else {
        conn.execute(
            &format!(
                "INSERT INTO {} (id, label, enabled, deleted) VALUES (?1, ?2, ?3, ?4)",
                kind.table()
            ),
            params![lookup.id, lookup.label, lookup.enabled, lookup.deleted],
        )?;
    }
    Ok(())
}

/// Get all non-deleted lookups of a kind, ordered by label
pub fn list_lookups(conn: &Connection, kind: LookupKind) -> rusqlite::Result<Vec<Lookup>> {
    let mut stmt = conn.prepare(&select_sql(
        kind,
        "WHERE deleted = 0",
        "label COLLATE NOCASE, id",
    ))?;
    let lookups = stmt.query_map([], lookup_from_row)?;
    lookups.collect()
}

/// Get every lookup of a kind, deleted ones included, ordered by id
pub fn list_all_lookups(conn: &Connection, kind: LookupKind) -> rusqlite::Result<Vec<Lookup>> {
    let mut stmt = conn.prepare(&select_sql(kind, "", "id"))?;
    let lookups = stmt.query_map([], lookup_from_row)?;
    lookups.collect()
}

/// Get a lookup by ID, even if it was deleted
pub fn get_lookup(
    conn: &Connection,
    kind: LookupKind,
    id: LookupId,
) -> rusqlite::Result<Option<Lookup>> {
    conn.query_row(
        &format!(
            "SELECT id, label, {}, enabled, deleted FROM {} WHERE id = ?1",
            color_column(kind),
            kind.table()
        ),
        params![id],
        lookup_from_row,
    )
    .optional()
}

/// Update a lookup's label and, for series, its color
pub fn update_lookup(
    conn: &Connection,
    kind: LookupKind,
    id: LookupId,
    label: &str,
    color: Option<&str>,
) -> rusqlite::Result<usize> {
    if kind.has_color() {
        conn.execute(
            "UPDATE series SET label = ?1, color = COALESCE(?2, color) WHERE id = ?3",
            params![label, color, id],
        )
    } else {
        conn.execute(
            &format!("UPDATE {} SET label = ?1 WHERE id = ?2", kind.table()),
            params![label, id],
        )
    }
}

pub fn set_lookup_enabled(
    conn: &Connection,
    kind: LookupKind,
    id: LookupId,
    enabled: bool,
) -> rusqlite::Result<usize> {
    conn.execute(
        &format!("UPDATE {} SET enabled = ?1 WHERE id = ?2", kind.table()),
        params![enabled, id],
    )
}

/// Soft-delete a lookup
pub fn delete_lookup(conn: &Connection, kind: LookupKind, id: LookupId) -> rusqlite::Result<usize> {
    conn.execute(
        &format!("UPDATE {} SET deleted = 1 WHERE id = ?1", kind.table()),
        params![id],
    )
}

/// Count non-deleted batteries referring to a lookup
pub fn count_batteries_using(
    conn: &Connection,
    kind: LookupKind,
    id: LookupId,
) -> rusqlite::Result<i64> {
    let column = match kind {
        LookupKind::Brand => "brand_id",
        LookupKind::Series => "series_id",
        LookupKind::Type => "type_id",
    };
    conn.query_row(
        &format!("SELECT COUNT(*) FROM batteries WHERE {} = ?1 AND deleted = 0", column),
        params![id],
        |row| row.get(0),
    )
}
