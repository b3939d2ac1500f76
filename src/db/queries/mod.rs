mod battery;
mod lookup;
mod resistance;
mod settings;
mod usage;

pub use battery::{
    create_battery, delete_battery, get_battery, insert_battery, list_all_batteries,
    list_batteries, set_battery_enabled, update_battery,
};
pub use lookup::{
    count_batteries_using, create_lookup, delete_lookup, get_lookup, insert_lookup,
    list_all_lookups, list_lookups, set_lookup_enabled, update_lookup,
};
pub use resistance::{
    add_resistance_record, delete_resistance_record, insert_resistance_record,
    list_all_resistance_records, list_resistance_records,
};
pub use settings::{get_settings, save_settings};
pub use usage::{
    add_usage_record, delete_usage_record, insert_usage_record, latest_usage_record,
    list_all_usage_records, list_usage_records,
};

#[cfg(test)]
pub(crate) use battery::sample_battery;
