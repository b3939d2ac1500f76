use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_ALERT_DAYS;

/// Language used for view titles and status labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
    De,
    Es,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Es => "es",
        }
    }

    /// Parse a language code, falling back to English
    pub fn from_code(code: &str) -> Self {
        match code {
            "fr" => Language::Fr,
            "de" => Language::De,
            "es" => Language::Es,
            _ => Language::En,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Language::En => Language::Fr,
            Language::Fr => Language::De,
            Language::De => Language::Es,
            Language::Es => Language::En,
        }
    }
}

/// Color theme for the terminal UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Theme::System => Theme::Light,
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
        }
    }
}

/// User settings, stored as a single key/value table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub battery_alert_days: i64,
    pub language: Language,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            battery_alert_days: DEFAULT_ALERT_DAYS,
            language: Language::En,
            theme: Theme::System,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip() {
        let mut lang = Language::En;
        for _ in 0..4 {
            assert_eq!(Language::from_code(lang.code()), lang);
            lang = lang.next();
        }
        assert_eq!(lang, Language::En);
        assert_eq!(Language::from_code("xx"), Language::En);
    }

    #[test]
    fn test_theme_names_round_trip() {
        for theme in [Theme::System, Theme::Light, Theme::Dark] {
            assert_eq!(Theme::from_name(theme.as_str()), theme);
        }
    }
}
