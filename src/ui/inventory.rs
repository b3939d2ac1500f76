use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::app::App;
use crate::clock::Clock;
use crate::db::DatabaseOps;
use crate::i18n::{Text, status_label, tr};
use crate::models::Language;
use crate::report::BatteryReport;
use crate::ui::{self, Palette, alert_color, hex_color, palette, status_color};

/// Render the inventory view
pub fn render_inventory<D: DatabaseOps, C: Clock>(
    frame: &mut Frame,
    area: Rect,
    app: &mut App<D, C>,
) {
    let lang = app.language();
    let colors = palette(app.settings.theme);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Title
        Constraint::Min(1),    // Battery list
        Constraint::Length(2), // Controls
        Constraint::Length(1), // Footer
    ])
    .split(area);

    // Title
    let title = Line::from(tr(lang, Text::Inventory))
        .bold()
        .fg(colors.title)
        .centered();
    frame.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    let items = build_inventory_items(&app.reports, lang, colors);

    let list = List::new(items)
        .block(Block::default().borders(Borders::NONE))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(colors.highlight_bg),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[1], &mut app.inventory_state);

    // Controls
    let controls = "[j/k] Navigate  [Enter] Details  [c/s/d] Charged/Stored/Discharged  \
                    [r] Resistance  [n] New  [e] Edit  [t] Enable/Disable  [x] Delete";
    frame.render_widget(
        Paragraph::new(controls)
            .centered()
            .fg(colors.muted)
            .block(Block::default().borders(Borders::TOP)),
        chunks[2],
    );

    ui::render_footer(
        frame,
        chunks[3],
        app,
        "[1] Inventory  [2] Lookups  [3] Stats  [o] Settings  [q] Quit",
    );
}

fn build_inventory_items(
    reports: &[BatteryReport],
    lang: Language,
    colors: Palette,
) -> Vec<ListItem<'static>> {
    if reports.is_empty() {
        return vec![ListItem::new(
            Line::from(tr(lang, Text::NoBatteries)).centered(),
        )];
    }

    reports
        .iter()
        .map(|report| {
            let battery = &report.battery;
            let mut spans = vec![
                Span::styled("● ", Style::default().fg(alert_color(report.alert))),
                Span::styled(format!("{:<14}", battery.label), Style::default().bold()),
                Span::styled(
                    "■ ",
                    Style::default().fg(hex_color(report.series_color.as_deref())),
                ),
                Span::raw(format!(
                    "{:<18}",
                    format!("{} {}", report.brand, report.series)
                )),
                Span::styled(
                    format!("{:<8}", report.battery_type),
                    Style::default().fg(colors.accent),
                ),
                Span::raw(format!("{:<12}", battery.pack_label())),
                Span::styled(
                    format!("{:<11}", status_label(lang, report.status)),
                    Style::default().fg(status_color(report.status)),
                ),
                Span::styled(
                    format!(
                        "{:>4} {}",
                        report.days_since_last_action,
                        tr(lang, Text::Days)
                    ),
                    Style::default().fg(colors.muted),
                ),
                Span::raw(format!("  {:>3} {}", report.cycles, tr(lang, Text::Cycles))),
            ];
            if let Some(avg) = report.resistance_avg {
                spans.push(Span::styled(
                    format!("  {:.1}mΩ", avg),
                    Style::default().fg(colors.muted),
                ));
            }
            if !battery.enabled {
                spans.push(Span::styled("  (disabled)", Style::default().fg(colors.muted)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect()
}
