use crate::models::{BatteryStatus, Language, LookupKind};

/// Translatable UI strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Inventory,
    Detail,
    Lookups,
    Stats,
    Settings,
    History,
    Resistance,
    NoBatteries,
    NoRecords,
    Days,
    Cycles,
    ByStatus,
    ByAlert,
    Breakdown,
    Batteries,
    TotalCycles,
    NoChartData,
}

impl Text {
    pub const ALL: [Text; 17] = [
        Text::Inventory,
        Text::Detail,
        Text::Lookups,
        Text::Stats,
        Text::Settings,
        Text::History,
        Text::Resistance,
        Text::NoBatteries,
        Text::NoRecords,
        Text::Days,
        Text::Cycles,
        Text::ByStatus,
        Text::ByAlert,
        Text::Breakdown,
        Text::Batteries,
        Text::TotalCycles,
        Text::NoChartData,
    ];
}

fn english(text: Text) -> &'static str {
    match text {
        Text::Inventory => "Battery Inventory",
        Text::Detail => "Battery Details",
        Text::Lookups => "Brands, Series & Types",
        Text::Stats => "Fleet Statistics",
        Text::Settings => "Settings",
        Text::History => "Status History",
        Text::Resistance => "Internal Resistance",
        Text::NoBatteries => "No batteries yet. Press [n] to add one!",
        Text::NoRecords => "No records",
        Text::Days => "days",
        Text::Cycles => "cycles",
        Text::ByStatus => "By status",
        Text::ByAlert => "By alert",
        Text::Breakdown => "Breakdown",
        Text::Batteries => "Batteries",
        Text::TotalCycles => "Total cycles",
        Text::NoChartData => "No batteries to chart",
    }
}

fn french(text: Text) -> Option<&'static str> {
    Some(match text {
        Text::Inventory => "Inventaire des batteries",
        Text::Detail => "Détails de la batterie",
        Text::Lookups => "Marques, séries et types",
        Text::Stats => "Statistiques",
        Text::Settings => "Paramètres",
        Text::History => "Historique",
        Text::Resistance => "Résistance interne",
        Text::NoBatteries => "Aucune batterie. Appuyez sur [n] pour en ajouter une !",
        Text::NoRecords => "Aucun enregistrement",
        Text::Days => "jours",
        Text::Cycles => "cycles",
        Text::ByStatus => "Par état",
        Text::ByAlert => "Par alerte",
        Text::Breakdown => "Répartition",
        Text::Batteries => "Batteries",
        Text::TotalCycles => "Cycles au total",
        Text::NoChartData => "Aucune batterie à afficher",
    })
}

fn german(text: Text) -> Option<&'static str> {
    Some(match text {
        Text::Inventory => "Akku-Inventar",
        Text::Detail => "Akku-Details",
        Text::Lookups => "Marken, Serien & Typen",
        Text::Stats => "Statistik",
        Text::Settings => "Einstellungen",
        Text::History => "Statusverlauf",
        Text::Resistance => "Innenwiderstand",
        Text::NoBatteries => "Noch keine Akkus. Mit [n] hinzufügen!",
        Text::NoRecords => "Keine Einträge",
        Text::Days => "Tage",
        Text::Cycles => "Zyklen",
        Text::ByStatus => "Nach Status",
        Text::ByAlert => "Nach Warnstufe",
        Text::Breakdown => "Aufteilung",
        Text::Batteries => "Akkus",
        Text::TotalCycles => "Zyklen gesamt",
        Text::NoChartData => "Keine Akkus für das Diagramm",
    })
}

fn spanish(text: Text) -> Option<&'static str> {
    Some(match text {
        Text::Inventory => "Inventario de baterías",
        Text::Detail => "Detalles de la batería",
        Text::Lookups => "Marcas, series y tipos",
        Text::Stats => "Estadísticas",
        Text::Settings => "Ajustes",
        Text::History => "Historial",
        Text::Resistance => "Resistencia interna",
        Text::NoBatteries => "Aún no hay baterías. ¡Pulsa [n] para añadir una!",
        Text::NoRecords => "Sin registros",
        Text::Days => "días",
        Text::Cycles => "ciclos",
        Text::ByStatus => "Por estado",
        Text::ByAlert => "Por alerta",
        Text::Breakdown => "Desglose",
        Text::Batteries => "Baterías",
        Text::TotalCycles => "Ciclos totales",
        Text::NoChartData => "No hay baterías para mostrar",
    })
}

/// Look up a string, falling back to English for missing entries
pub fn tr(lang: Language, text: Text) -> &'static str {
    let translated = match lang {
        Language::En => None,
        Language::Fr => french(text),
        Language::De => german(text),
        Language::Es => spanish(text),
    };
    translated.unwrap_or_else(|| english(text))
}

pub fn status_label(lang: Language, status: BatteryStatus) -> &'static str {
    match (lang, status) {
        (Language::Fr, BatteryStatus::Charged) => "Chargée",
        (Language::Fr, BatteryStatus::Stored) => "Stockage",
        (Language::Fr, BatteryStatus::Discharged) => "Déchargée",
        (Language::De, BatteryStatus::Charged) => "Geladen",
        (Language::De, BatteryStatus::Stored) => "Lagerung",
        (Language::De, BatteryStatus::Discharged) => "Entladen",
        (Language::Es, BatteryStatus::Charged) => "Cargada",
        (Language::Es, BatteryStatus::Stored) => "Almacenada",
        (Language::Es, BatteryStatus::Discharged) => "Descargada",
        (Language::En, BatteryStatus::Charged) => "Charged",
        (Language::En, BatteryStatus::Stored) => "Stored",
        (Language::En, BatteryStatus::Discharged) => "Discharged",
    }
}

pub fn lookup_title(lang: Language, kind: LookupKind) -> &'static str {
    match (lang, kind) {
        (Language::Fr, LookupKind::Brand) => "Marques",
        (Language::Fr, LookupKind::Series) => "Séries",
        (Language::De, LookupKind::Brand) => "Marken",
        (Language::De, LookupKind::Series) => "Serien",
        (Language::De, LookupKind::Type) => "Typen",
        (Language::Es, LookupKind::Brand) => "Marcas",
        (Language::Es, LookupKind::Series) => "Series",
        (Language::Es, LookupKind::Type) => "Tipos",
        (_, LookupKind::Brand) => "Brands",
        (_, LookupKind::Series) => "Series",
        (_, LookupKind::Type) => "Types",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_is_identity() {
        assert_eq!(tr(Language::En, Text::Inventory), "Battery Inventory");
    }

    #[test]
    fn test_translated_entry() {
        assert_eq!(tr(Language::De, Text::Settings), "Einstellungen");
        assert_eq!(status_label(Language::Fr, BatteryStatus::Stored), "Stockage");
    }

    #[test]
    fn test_every_language_is_complete() {
        for text in Text::ALL {
            assert!(french(text).is_some(), "{:?}", text);
            assert!(german(text).is_some(), "{:?}", text);
            assert!(spanish(text).is_some(), "{:?}", text);
        }
        assert_eq!(tr(Language::Es, Text::Lookups), "Marcas, series y tipos");
        assert_eq!(tr(Language::Fr, Text::ByStatus), "Par état");
    }

    #[test]
    fn test_missing_entry_falls_back_to_english() {
        // French has no own word for the types list
        assert_eq!(lookup_title(Language::Fr, LookupKind::Type), "Types");
        assert_eq!(tr(Language::En, Text::Breakdown), "Breakdown");
    }
}
