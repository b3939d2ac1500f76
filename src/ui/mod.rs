mod detail;
mod forms;
mod inventory;
mod lookups;
mod settings;
mod stats;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    widgets::Paragraph,
};

use crate::app::{App, NotificationLevel};
use crate::clock::Clock;
use crate::db::DatabaseOps;
use crate::models::{BatteryStatus, Theme};
use crate::report::AlertLevel;

pub use detail::render_detail;
pub use forms::{render_battery_modal, render_lookup_modal, render_resistance_modal};
pub use inventory::render_inventory;
pub use lookups::render_lookups;
pub use settings::render_settings_modal;
pub use stats::render_stats;

/// Colors used across views for a theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub title: Color,
    pub accent: Color,
    pub muted: Color,
    pub highlight_bg: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::System => Palette {
            title: Color::Blue,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            highlight_bg: Color::DarkGray,
        },
        Theme::Light => Palette {
            title: Color::Blue,
            accent: Color::Magenta,
            muted: Color::Gray,
            highlight_bg: Color::Rgb(220, 225, 235),
        },
        Theme::Dark => Palette {
            title: Color::LightBlue,
            accent: Color::LightCyan,
            muted: Color::Gray,
            highlight_bg: Color::Rgb(50, 55, 70),
        },
    }
}

pub fn alert_color(alert: AlertLevel) -> Color {
    match alert {
        AlertLevel::Green => Color::Green,
        AlertLevel::Orange => Color::Rgb(255, 165, 0),
        AlertLevel::Red => Color::Red,
    }
}

pub fn status_color(status: BatteryStatus) -> Color {
    match status {
        BatteryStatus::Charged => Color::Green,
        BatteryStatus::Stored => Color::Yellow,
        BatteryStatus::Discharged => Color::Red,
    }
}

/// Parse a "#RRGGBB" string into a terminal color, gray when malformed
pub fn hex_color(hex: Option<&str>) -> Color {
    let Some(hex) = hex.map(|h| h.trim_start_matches('#')) else {
        return Color::Gray;
    };
    if hex.len() != 6 || !hex.is_ascii() {
        return Color::Gray;
    }
    match (
        u8::from_str_radix(&hex[0..2], 16),
        u8::from_str_radix(&hex[2..4], 16),
        u8::from_str_radix(&hex[4..6], 16),
    ) {
        (Ok(r), Ok(g), Ok(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

/// A centered rectangle of at most `width` x `height` inside `area`
pub fn modal_area(area: Rect, width: u16, height: u16) -> Rect {
    let modal_width = width.min(area.width.saturating_sub(4));
    let modal_height = height.min(area.height.saturating_sub(4));
    let modal_x = area.x + (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = area.y + (area.height.saturating_sub(modal_height)) / 2;
    Rect::new(modal_x, modal_y, modal_width, modal_height)
}

/// Render the footer area with either a notification or navigation text
pub fn render_footer<D: DatabaseOps, C: Clock>(
    frame: &mut Frame,
    area: Rect,
    app: &App<D, C>,
    nav_text: &str,
) {
    if let Some(ref n) = app.notification {
        let color = match n.level {
            NotificationLevel::Info => Color::Green,
            NotificationLevel::Warning => Color::Yellow,
            NotificationLevel::Error => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(n.message.as_str())
                .centered()
                .style(Style::default().fg(color).bold()),
            area,
        );
    } else {
        let muted = palette(app.settings.theme).muted;
        frame.render_widget(Paragraph::new(nav_text).centered().fg(muted), area);
    }
}
