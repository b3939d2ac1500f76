//! Derived battery state: current status, idle days, alert level and cycles.

use std::collections::HashMap;

use serde::Serialize;

use crate::clock::Clock;
use crate::db::DatabaseOps;
use crate::error::Result;
use crate::models::{
    Battery, BatteryStatus, Lookup, LookupId, LookupKind, ResistanceRecord, Settings, Timestamp,
    UsageRecord,
};

/// Storage-health signal for a battery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Green,
    Orange,
    Red,
}

impl AlertLevel {
    pub const ALL: [AlertLevel; 3] = [AlertLevel::Green, AlertLevel::Orange, AlertLevel::Red];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Green => "green",
            AlertLevel::Orange => "orange",
            AlertLevel::Red => "red",
        }
    }
}

/// The most recent non-deleted record, ties broken by the higher id
pub fn last_action(records: &[UsageRecord]) -> Option<&UsageRecord> {
    records
        .iter()
        .filter(|r| !r.deleted)
        .max_by_key(|r| (r.at, r.id))
}

/// Status of the latest record, or `Stored` for a battery without history
pub fn current_status(records: &[UsageRecord]) -> BatteryStatus {
    last_action(records)
        .map(|r| r.status)
        .unwrap_or(BatteryStatus::Stored)
}

/// Days since the latest record, or since creation when there is none
pub fn days_since_last_action(battery: &Battery, records: &[UsageRecord], now: Timestamp) -> i64 {
    let since = last_action(records)
        .map(|r| r.at)
        .unwrap_or(battery.created_at);
    since.days_until(now)
}

pub fn alert_level(status: BatteryStatus, days: i64, alert_days: i64) -> AlertLevel {
    let red_after = alert_days.saturating_mul(2);
    if days > red_after && status == BatteryStatus::Stored {
        AlertLevel::Red
    } else if days > alert_days && days <= red_after {
        AlertLevel::Orange
    } else {
        AlertLevel::Green
    }
}

/// Number of completed discharges
pub fn cycle_count(records: &[UsageRecord]) -> usize {
    records
        .iter()
        .filter(|r| !r.deleted && r.status == BatteryStatus::Discharged)
        .count()
}

/// Everything the inventory view shows for one battery
#[derive(Debug, Clone, Serialize)]
pub struct BatteryReport {
    pub battery: Battery,
    pub brand: String,
    pub series: String,
    pub series_color: Option<String>,
    pub battery_type: String,
    pub status: BatteryStatus,
    pub last_action: Option<Timestamp>,
    pub days_since_last_action: i64,
    pub alert: AlertLevel,
    pub cycles: usize,
    pub resistance_avg: Option<f64>,
}

/// Derive a report from already-loaded records
pub fn battery_report(
    battery: Battery,
    records: &[UsageRecord],
    resistance: &[ResistanceRecord],
    labels: &LookupLabels,
    settings: &Settings,
    now: Timestamp,
) -> BatteryReport {
    let status = current_status(records);
    let days = days_since_last_action(&battery, records, now);
    let latest_resistance = resistance
        .iter()
        .filter(|r| !r.deleted)
        .max_by_key(|r| (r.at, r.id));
    let series = labels.get(LookupKind::Series, battery.series_id);

    BatteryReport {
        brand: labels.label(LookupKind::Brand, battery.brand_id),
        series: labels.label(LookupKind::Series, battery.series_id),
        series_color: series.and_then(|s| s.color.clone()),
        battery_type: labels.label(LookupKind::Type, battery.type_id),
        status,
        last_action: last_action(records).map(|r| r.at),
        days_since_last_action: days,
        alert: alert_level(status, days, settings.battery_alert_days),
        cycles: cycle_count(records),
        resistance_avg: latest_resistance.and_then(ResistanceRecord::average),
        battery,
    }
}

/// Lookups resolved by id, deleted ones included
#[derive(Debug, Default)]
pub struct LookupLabels {
    lookups: HashMap<(LookupKind, LookupId), Lookup>,
}

impl LookupLabels {
    /// Resolve every lookup referenced by `batteries`
    pub fn load<D: DatabaseOps>(db: &D, batteries: &[Battery]) -> Result<Self> {
        let mut labels = Self::default();
        for battery in batteries {
            for (kind, id) in [
                (LookupKind::Brand, battery.brand_id),
                (LookupKind::Series, battery.series_id),
                (LookupKind::Type, battery.type_id),
            ] {
                if !labels.lookups.contains_key(&(kind, id)) {
                    let lookup = db.get_lookup(kind, id)?;
                    labels.lookups.insert((kind, id), lookup);
                }
            }
        }
        Ok(labels)
    }

    pub fn get(&self, kind: LookupKind, id: LookupId) -> Option<&Lookup> {
        self.lookups.get(&(kind, id))
    }

    pub fn label(&self, kind: LookupKind, id: LookupId) -> String {
        self.get(kind, id)
            .map(|l| l.label.clone())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// Build reports for every listed battery
pub fn build_report<D: DatabaseOps, C: Clock>(db: &D, clock: &C) -> Result<Vec<BatteryReport>> {
    let settings = db.get_settings()?;
    let batteries = db.list_batteries()?;
    let labels = LookupLabels::load(db, &batteries)?;
    let now = Timestamp::new(clock.now_timestamp());

    let mut reports = Vec::with_capacity(batteries.len());
    for battery in batteries {
        let records = db.list_usage_records(battery.id)?;
        let resistance = db.list_resistance_records(battery.id)?;
        reports.push(battery_report(
            battery,
            &records,
            &resistance,
            &labels,
            &settings,
            now,
        ));
    }
    Ok(reports)
}

/// Counts across the whole inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FleetSummary {
    pub batteries: usize,
    pub charged: usize,
    pub stored: usize,
    pub discharged: usize,
    pub green: usize,
    pub orange: usize,
    pub red: usize,
    pub total_cycles: usize,
}

impl FleetSummary {
    pub fn from_reports(reports: &[BatteryReport]) -> Self {
        let mut summary = Self {
            batteries: reports.len(),
            ..Self::default()
        };
        for report in reports {
            match report.status {
                BatteryStatus::Charged => summary.charged += 1,
                BatteryStatus::Stored => summary.stored += 1,
                BatteryStatus::Discharged => summary.discharged += 1,
            }
            match report.alert {
                AlertLevel::Green => summary.green += 1,
                AlertLevel::Orange => summary.orange += 1,
                AlertLevel::Red => summary.red += 1,
            }
            summary.total_cycles += report.cycles;
        }
        summary
    }

    pub fn status_count(&self, status: BatteryStatus) -> usize {
        match status {
            BatteryStatus::Charged => self.charged,
            BatteryStatus::Stored => self.stored,
            BatteryStatus::Discharged => self.discharged,
        }
    }

    pub fn alert_count(&self, alert: AlertLevel) -> usize {
        match alert {
            AlertLevel::Green => self.green,
            AlertLevel::Orange => self.orange,
            AlertLevel::Red => self.red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::db::Database;
    use crate::db::queries::sample_battery;
    use crate::models::{BatteryId, RecordId};

    const DAY: i64 = 24 * 60 * 60;

    fn record(id: i64, at: i64, status: BatteryStatus, deleted: bool) -> UsageRecord {
        UsageRecord {
            id: RecordId::new(id),
            battery_id: BatteryId::new(1),
            at: Timestamp::new(at),
            status,
            enabled: true,
            deleted,
        }
    }

    fn battery(created_at: i64) -> Battery {
        Battery {
            id: BatteryId::new(1),
            label: "Pack".to_string(),
            brand_id: LookupId::new(1),
            series_id: LookupId::new(1),
            type_id: LookupId::new(1),
            cells: 4,
            capacity_mah: 1500,
            created_at: Timestamp::new(created_at),
            enabled: true,
            deleted: false,
        }
    }

    #[test]
    fn test_current_status_defaults_to_stored() {
        assert_eq!(current_status(&[]), BatteryStatus::Stored);
    }

    #[test]
    fn test_current_status_uses_latest_by_date_not_insertion() {
        let records = vec![
            record(1, 300, BatteryStatus::Charged, false),
            record(2, 100, BatteryStatus::Discharged, false),
        ];
        assert_eq!(current_status(&records), BatteryStatus::Charged);
    }

    #[test]
    fn test_current_status_ignores_deleted() {
        let records = vec![
            record(1, 100, BatteryStatus::Charged, false),
            record(2, 200, BatteryStatus::Discharged, true),
        ];
        assert_eq!(current_status(&records), BatteryStatus::Charged);

        let all_deleted = vec![record(1, 100, BatteryStatus::Charged, true)];
        assert_eq!(current_status(&all_deleted), BatteryStatus::Stored);
    }

    #[test]
    fn test_days_since_falls_back_to_creation() {
        let b = battery(0);
        assert_eq!(days_since_last_action(&b, &[], Timestamp::new(5 * DAY)), 5);

        let records = vec![record(1, 3 * DAY, BatteryStatus::Stored, false)];
        assert_eq!(
            days_since_last_action(&b, &records, Timestamp::new(5 * DAY)),
            2
        );
    }

    #[test]
    fn test_alert_level_thresholds() {
        let stored = BatteryStatus::Stored;
        assert_eq!(alert_level(stored, 7, 7), AlertLevel::Green);
        assert_eq!(alert_level(stored, 8, 7), AlertLevel::Orange);
        assert_eq!(alert_level(stored, 14, 7), AlertLevel::Orange);
        assert_eq!(alert_level(stored, 15, 7), AlertLevel::Red);
    }

    #[test]
    fn test_alert_level_huge_threshold_saturates() {
        let stored = BatteryStatus::Stored;
        assert_eq!(
            alert_level(stored, 10, 5_000_000_000_000_000_000),
            AlertLevel::Green
        );
        assert_eq!(alert_level(stored, i64::MAX, i64::MAX), AlertLevel::Green);
        assert_eq!(alert_level(stored, i64::MAX, i64::MAX / 2 + 1), AlertLevel::Orange);
    }

    #[test]
    fn test_alert_red_only_when_stored() {
        assert_eq!(
            alert_level(BatteryStatus::Charged, 30, 7),
            AlertLevel::Green
        );
        assert_eq!(
            alert_level(BatteryStatus::Discharged, 30, 7),
            AlertLevel::Green
        );
        assert_eq!(
            alert_level(BatteryStatus::Charged, 10, 7),
            AlertLevel::Orange
        );
    }

    #[test]
    fn test_cycle_count() {
        let records = vec![
            record(1, 100, BatteryStatus::Charged, false),
            record(2, 200, BatteryStatus::Discharged, false),
            record(3, 300, BatteryStatus::Charged, false),
            record(4, 400, BatteryStatus::Discharged, true),
            record(5, 500, BatteryStatus::Discharged, false),
        ];
        assert_eq!(cycle_count(&records), 2);
    }

    #[test]
    fn test_build_report_from_database() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_battery(&sample_battery("Pack")).unwrap();
        db.add_usage_record(id, BatteryStatus::Charged, Timestamp::new(DAY))
            .unwrap();
        db.add_usage_record(id, BatteryStatus::Stored, Timestamp::new(2 * DAY))
            .unwrap();
        db.add_resistance_record(id, Timestamp::new(2 * DAY), &[2.0, 4.0])
            .unwrap();

        let clock = FixedClock(2 * DAY + 20 * DAY);
        let reports = build_report(&db, &clock).unwrap();
        assert_eq!(reports.len(), 1);

        let report = &reports[0];
        assert_eq!(report.brand, "Generic");
        assert_eq!(report.series, "Standard");
        assert_eq!(report.battery_type, "LiPo");
        assert_eq!(report.status, BatteryStatus::Stored);
        assert_eq!(report.days_since_last_action, 20);
        assert_eq!(report.alert, AlertLevel::Red);
        assert_eq!(report.resistance_avg, Some(3.0));
        assert_eq!(report.last_action, Some(Timestamp::new(2 * DAY)));
    }

    #[test]
    fn test_report_excludes_deleted_batteries() {
        let db = Database::open_in_memory().unwrap();
        let keep = db.create_battery(&sample_battery("Keep")).unwrap();
        let gone = db.create_battery(&sample_battery("Gone")).unwrap();
        db.delete_battery(gone).unwrap();

        let reports = build_report(&db, &FixedClock(DAY)).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].battery.id, keep);
    }

    #[test]
    fn test_fleet_summary_counts() {
        let db = Database::open_in_memory().unwrap();
        let a = db.create_battery(&sample_battery("A")).unwrap();
        let b = db.create_battery(&sample_battery("B")).unwrap();
        db.create_battery(&sample_battery("C")).unwrap();
        db.add_usage_record(a, BatteryStatus::Charged, Timestamp::new(DAY))
            .unwrap();
        db.add_usage_record(b, BatteryStatus::Discharged, Timestamp::new(DAY))
            .unwrap();

        let reports = build_report(&db, &FixedClock(2 * DAY)).unwrap();
        let summary = FleetSummary::from_reports(&reports);
        assert_eq!(summary.batteries, 3);
        assert_eq!(summary.charged, 1);
        assert_eq!(summary.discharged, 1);
        assert_eq!(summary.stored, 1);
        assert_eq!(summary.green, 3);
        assert_eq!(summary.total_cycles, 1);
    }
}
