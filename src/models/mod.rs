mod battery;
mod ids;
mod lookup;
mod record;
mod settings;

pub use battery::{Battery, NewBattery};
pub use ids::{BatteryId, LookupId, RecordId, ResistanceId, Timestamp};
pub use lookup::{Lookup, LookupKind};
pub use record::{BatteryStatus, ResistanceRecord, UsageRecord};
pub use settings::{Language, Settings, Theme};

/// Serialize `bool` flags as the `0`/`1` integers used on disk.
pub(crate) mod int_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(deserializer)? != 0)
    }
}
