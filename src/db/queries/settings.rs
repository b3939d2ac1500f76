use rusqlite::{Connection, params};

use crate::models::{Language, Settings, Theme};
use crate::validation::validate_alert_days;

/// Get user settings from database
pub fn get_settings(conn: &Connection) -> rusqlite::Result<Settings> {
    let mut settings = Settings::default();

    let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
    let rows = stmt.query_map([], |row| {
        let key: String = row.get(0)?;
        let value: String = row.get(1)?;
        Ok((key, value))
    })?;

    for row in rows {
        let (key, value) = row?;
        match key.as_str() {
            "battery_alert_days" => {
                if let Ok(days) = value.parse::<i64>()
                    && validate_alert_days(days).is_ok()
                {
                    settings.battery_alert_days = days;
                }
            }
            "language" => settings.language = Language::from_code(&value),
            "theme" => settings.theme = Theme::from_name(&value),
            _ => {}
        }
    }

    Ok(settings)
}

/// Save user settings to database
pub fn save_settings(conn: &Connection, settings: &Settings) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare("INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)")?;

    stmt.execute(params![
        "battery_alert_days",
        settings.battery_alert_days.to_string()
    ])?;
    stmt.execute(params!["language", settings.language.code()])?;
    stmt.execute(params!["theme", settings.theme.as_str()])?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ALERT_DAYS;
    use crate::db::Database;

    #[test]
    fn test_settings_save_and_load() {
        let db = Database::open_in_memory().unwrap();

        // Default settings should be seeded
        let settings = get_settings(&db.conn).unwrap();
        assert_eq!(settings.battery_alert_days, DEFAULT_ALERT_DAYS);
        assert_eq!(settings.theme, Theme::System);

        let new_settings = Settings {
            battery_alert_days: 14,
            language: Language::Fr,
            theme: Theme::Dark,
        };
        save_settings(&db.conn, &new_settings).unwrap();

        assert_eq!(get_settings(&db.conn).unwrap(), new_settings);
    }

    #[test]
    fn test_invalid_alert_days_ignored() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "UPDATE settings SET value = 'abc' WHERE key = 'battery_alert_days'",
                [],
            )
            .unwrap();

        let settings = get_settings(&db.conn).unwrap();
        assert_eq!(settings.battery_alert_days, DEFAULT_ALERT_DAYS);
    }

    #[test]
    fn test_out_of_range_alert_days_ignored() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "UPDATE settings SET value = '5000000000000000000' WHERE key = 'battery_alert_days'",
                [],
            )
            .unwrap();

        let settings = get_settings(&db.conn).unwrap();
        assert_eq!(settings.battery_alert_days, DEFAULT_ALERT_DAYS);
    }
}
