//! Command line arguments and the non-interactive commands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use crate::clock::Clock;
use crate::db::{Database, DatabaseOps};
use crate::models::{BatteryId, BatteryStatus, Timestamp};
use crate::report::{BatteryReport, FleetSummary, build_report};
use crate::snapshot::{self, Snapshot};

#[derive(Debug, Parser)]
#[command(name = "cellkeeper")]
#[command(version, about = "Battery inventory and maintenance tracker", long_about = None)]
pub struct Cli {
    /// Database file to use instead of the default data directory
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run a command instead of starting the terminal interface
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the inventory report
    Report {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write a JSON snapshot of the whole database
    Export { path: PathBuf },

    /// Replace the database contents with a JSON snapshot
    Import { path: PathBuf },

    /// Append a usage record to a battery
    Log {
        /// Battery id as shown by `report`
        id: i64,
        /// charged, stored or discharged
        status: BatteryStatus,
    },
}

/// Execute a non-interactive command
pub fn run<C: Clock>(command: Command, db: &Database, clock: &C) -> color_eyre::Result<()> {
    let now = Timestamp::new(clock.now_timestamp());
    match command {
        Command::Report { json } => {
            let reports = build_report(db, clock)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                print!("{}", format_report_table(&reports));
            }
        }
        Command::Export { path } => {
            let snapshot = snapshot::export(db, now)?;
            snapshot.write_to(&path)?;
            println!(
                "Exported {} batteries to {}",
                snapshot.batteries.len(),
                path.display()
            );
        }
        Command::Import { path } => {
            let snapshot = Snapshot::read_from(&path)?;
            let summary = snapshot::import(db, &snapshot)?;
            println!(
                "Imported {} batteries, {} lookups, {} usage and {} resistance records",
                summary.batteries,
                summary.lookups,
                summary.usage_records,
                summary.resistance_records
            );
        }
        Command::Log { id, status } => {
            let id = BatteryId::new(id);
            let battery = db.get_battery(id)?;
            let previous = db
                .latest_usage_record(id)?
                .map(|r| r.status)
                .unwrap_or_default();
            db.add_usage_record(id, status, now)?;
            info!("Logged {} for battery {} from the command line", status.as_str(), id);
            println!(
                "{}: {} -> {}",
                battery.label,
                previous.as_str(),
                status.as_str()
            );
        }
    }
    Ok(())
}

/// Plain text inventory table with a summary line
pub fn format_report_table(reports: &[BatteryReport]) -> String {
    let mut out = String::new();
    if reports.is_empty() {
        out.push_str("No batteries\n");
        return out;
    }

    out.push_str(&format!(
        "{:>4}  {:<16} {:<20} {:<8} {:<12} {:<10} {:>5} {:<6} {:>6}\n",
        "ID", "LABEL", "BRAND/SERIES", "TYPE", "PACK", "STATUS", "DAYS", "ALERT", "CYCLES"
    ));
    for r in reports {
        out.push_str(&format!(
            "{:>4}  {:<16} {:<20} {:<8} {:<12} {:<10} {:>5} {:<6} {:>6}\n",
            r.battery.id,
            r.battery.label,
            format!("{} {}", r.brand, r.series),
            r.battery_type,
            r.battery.pack_label(),
            r.status.as_str(),
            r.days_since_last_action,
            r.alert.as_str(),
            r.cycles
        ));
    }

    let summary = FleetSummary::from_reports(reports);
    out.push_str(&format!(
        "\n{} batteries: {} charged, {} stored, {} discharged | {} orange, {} red\n",
        summary.batteries,
        summary.charged,
        summary.stored,
        summary.discharged,
        summary.orange,
        summary.red
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::db::queries::sample_battery;

    const DAY: i64 = 24 * 60 * 60;

    #[test]
    fn test_parse_log_command() {
        let cli = Cli::try_parse_from(["cellkeeper", "log", "3", "Discharged"]).unwrap();
        match cli.command {
            Some(Command::Log { id, status }) => {
                assert_eq!(id, 3);
                assert_eq!(status, BatteryStatus::Discharged);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        assert!(Cli::try_parse_from(["cellkeeper", "log", "3", "flat"]).is_err());
    }

    #[test]
    fn test_no_command_starts_tui() {
        let cli = Cli::try_parse_from(["cellkeeper", "--db", "x.db", "-v"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.verbose);
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
    }

    #[test]
    fn test_log_command_appends_record() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_battery(&sample_battery("Quad")).unwrap();
        let clock = FixedClock(3 * DAY);

        let cmd = Command::Log {
            id: id.into(),
            status: BatteryStatus::Charged,
        };
        run(cmd, &db, &clock).unwrap();

        let latest = db.latest_usage_record(id).unwrap().unwrap();
        assert_eq!(latest.status, BatteryStatus::Charged);
        assert_eq!(latest.at, Timestamp::new(3 * DAY));
    }

    #[test]
    fn test_log_unknown_battery_fails() {
        let db = Database::open_in_memory().unwrap();
        let cmd = Command::Log {
            id: 42,
            status: BatteryStatus::Stored,
        };
        assert!(run(cmd, &db, &FixedClock(0)).is_err());
    }

    #[test]
    fn test_export_then_import_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let source = Database::open_in_memory().unwrap();
        source.create_battery(&sample_battery("Quad")).unwrap();
        run(
            Command::Export { path: path.clone() },
            &source,
            &FixedClock(DAY),
        )
        .unwrap();

        let target = Database::open_in_memory().unwrap();
        run(Command::Import { path }, &target, &FixedClock(DAY)).unwrap();
        let batteries = target.list_batteries().unwrap();
        assert_eq!(batteries.len(), 1);
        assert_eq!(batteries[0].label, "Quad");
    }

    #[test]
    fn test_report_table() {
        let db = Database::open_in_memory().unwrap();
        db.create_battery(&sample_battery("Quad")).unwrap();
        let reports = build_report(&db, &FixedClock(DAY)).unwrap();

        let table = format_report_table(&reports);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].contains("LABEL"));
        assert!(lines[1].contains("Quad"));
        assert!(lines[1].contains("Generic Standard"));
        assert!(lines[1].contains("4S 1500mAh"));
        assert!(table.contains("1 batteries: 0 charged, 1 stored"));
        assert!(table.ends_with("0 orange, 0 red\n"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_empty_report_table() {
        assert_eq!(format_report_table(&[]), "No batteries\n");
    }
}
