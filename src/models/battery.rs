use serde::{Deserialize, Serialize};

use super::int_flag;
use super::{BatteryId, LookupId, Timestamp};

/// A tracked battery pack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    pub id: BatteryId,
    pub label: String,
    pub brand_id: LookupId,
    pub series_id: LookupId,
    pub type_id: LookupId,
    pub cells: u32,
    pub capacity_mah: u32,
    pub created_at: Timestamp,
    #[serde(with = "int_flag")]
    pub enabled: bool,
    #[serde(with = "int_flag")]
    pub deleted: bool,
}

impl Battery {
    /// Short description like "4S 1500mAh"
    pub fn pack_label(&self) -> String {
        format!("{}S {}mAh", self.cells, self.capacity_mah)
    }
}

/// Fields needed to register a battery
#[derive(Debug, Clone, PartialEq)]
pub struct NewBattery {
    pub label: String,
    pub brand_id: LookupId,
    pub series_id: LookupId,
    pub type_id: LookupId,
    pub cells: u32,
    pub capacity_mah: u32,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_label() {
        let battery = Battery {
            id: BatteryId::new(1),
            label: "A1".to_string(),
            brand_id: LookupId::new(1),
            series_id: LookupId::new(1),
            type_id: LookupId::new(1),
            cells: 4,
            capacity_mah: 1500,
            created_at: Timestamp::new(0),
            enabled: true,
            deleted: false,
        };
        assert_eq!(battery.pack_label(), "4S 1500mAh");
    }
}
