use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, SettingsField};
use crate::clock::Clock;
use crate::db::DatabaseOps;
use crate::i18n::{Text, tr};
use crate::ui::{modal_area, palette};

/// Render the settings modal as an overlay
pub fn render_settings_modal<D: DatabaseOps, C: Clock>(
    frame: &mut Frame,
    area: Rect,
    app: &mut App<D, C>,
) {
    let lang = app.language();
    let colors = palette(app.settings.theme);
    let state = &app.settings_state;

    let area = modal_area(area, 48, 10);

    // Clear the area behind the modal
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", tr(lang, Text::Settings)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.accent));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(2), // Alert days
        Constraint::Length(2), // Language
        Constraint::Length(2), // Theme
        Constraint::Length(2), // Controls
    ])
    .split(inner);

    // Helper to render a settings row
    let render_row = |field: SettingsField, label: &str, value: String, hint: &str| {
        let is_selected = state.field == field;
        let style = if is_selected {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{:<16}", label), style),
            Span::styled(value, style),
            Span::styled(format!(" {}", hint), Style::default().fg(colors.muted)),
        ])
    };

    let days = if state.field == SettingsField::AlertDays {
        format!("{}_", state.editing_value)
    } else {
        state.editing.battery_alert_days.to_string()
    };
    frame.render_widget(
        Paragraph::new(render_row(
            SettingsField::AlertDays,
            "Alert after:",
            days,
            tr(lang, Text::Days),
        )),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(render_row(
            SettingsField::Language,
            "Language:",
            format!("< {} >", state.editing.language.code()),
            "",
        )),
        chunks[1],
    );

    frame.render_widget(
        Paragraph::new(render_row(
            SettingsField::Theme,
            "Theme:",
            format!("< {} >", state.editing.theme.as_str()),
            "",
        )),
        chunks[2],
    );

    let controls = Line::from(vec![
        Span::styled("[Enter]", Style::default().bold()),
        Span::raw(" Save   "),
        Span::styled("[Tab/↑↓]", Style::default().bold()),
        Span::raw(" Navigate   "),
        Span::styled("[Esc]", Style::default().bold()),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(controls).centered().dark_gray(), chunks[3]);
}
