use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CellkeeperError, Result};

/// Tick rate for the event loop (250ms)
pub const TICK_RATE: Duration = Duration::from_millis(250);

/// How long a footer notification stays visible
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Days without action before a battery turns orange
pub const DEFAULT_ALERT_DAYS: i64 = 7;

/// Largest accepted alert threshold (about ten years)
pub const MAX_ALERT_DAYS: i64 = 3650;

/// Maximum number of cells in a single pack
pub const MAX_CELLS: u32 = 24;

/// Battery types seeded into an empty database
pub const DEFAULT_BATTERY_TYPES: [&str; 4] = ["LiPo", "Li-ion", "LiFePO4", "NiMH"];

fn data_dir() -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from("", "", "cellkeeper").ok_or(CellkeeperError::NoDataDirectory)?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.to_path_buf())
}

/// Get the path to the database file.
///
/// Returns the path to `cellkeeper.db` in the appropriate data directory:
/// - Linux: `~/.local/share/cellkeeper/cellkeeper.db`
/// - macOS: `~/Library/Application Support/cellkeeper/cellkeeper.db`
/// - Windows: `C:\Users\<User>\AppData\Roaming\cellkeeper\cellkeeper.db`
pub fn get_db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("cellkeeper.db"))
}

/// Get the path to the log file.
///
/// Returns the path to `cellkeeper.log` in the same data directory as the database.
pub fn get_log_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("cellkeeper.log"))
}
