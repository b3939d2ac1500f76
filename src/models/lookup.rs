use serde::{Deserialize, Serialize};

use super::LookupId;
use super::int_flag;

/// The three labeled lookup tables a battery refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LookupKind {
    #[default]
    Brand,
    Series,
    Type,
}

impl LookupKind {
    pub const ALL: [LookupKind; 3] = [LookupKind::Brand, LookupKind::Series, LookupKind::Type];

    /// Backing table name
    pub fn table(&self) -> &'static str {
        match self {
            LookupKind::Brand => "brands",
            LookupKind::Series => "series",
            LookupKind::Type => "battery_types",
        }
    }

    /// Singular entity name used in errors and logs
    pub fn entity(&self) -> &'static str {
        match self {
            LookupKind::Brand => "brand",
            LookupKind::Series => "series",
            LookupKind::Type => "battery type",
        }
    }

    pub fn has_color(&self) -> bool {
        matches!(self, LookupKind::Series)
    }

    pub fn next(&self) -> Self {
        match self {
            LookupKind::Brand => LookupKind::Series,
            LookupKind::Series => LookupKind::Type,
            LookupKind::Type => LookupKind::Brand,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LookupKind::Brand => LookupKind::Type,
            LookupKind::Series => LookupKind::Brand,
            LookupKind::Type => LookupKind::Series,
        }
    }
}

/// A brand, series or battery type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lookup {
    pub id: LookupId,
    pub label: String,
    /// Hex color like "#FF6B6B"; only series carry one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(with = "int_flag")]
    pub enabled: bool,
    #[serde(with = "int_flag")]
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(color: Option<&str>) -> Lookup {
        Lookup {
            id: LookupId::new(1),
            label: "Graphene".to_string(),
            color: color.map(str::to_string),
            enabled: true,
            deleted: false,
        }
    }

    #[test]
    fn test_flags_serialize_as_integers() {
        let json = serde_json::to_value(series(None)).unwrap();
        assert_eq!(json["enabled"], 1);
        assert_eq!(json["deleted"], 0);
        assert!(json.get("color").is_none());
    }

    #[test]
    fn test_kind_cycles() {
        for kind in LookupKind::ALL {
            assert_eq!(kind.next().prev(), kind);
        }
    }
}
