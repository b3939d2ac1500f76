use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::app::{App, DetailPane};
use crate::clock::Clock;
use crate::db::DatabaseOps;
use crate::i18n::{Text, status_label, tr};
use crate::ui::{self, alert_color, hex_color, palette, status_color};

/// Render the battery detail view
pub fn render_detail<D: DatabaseOps, C: Clock>(frame: &mut Frame, area: Rect, app: &mut App<D, C>) {
    let lang = app.language();
    let colors = palette(app.settings.theme);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Title
        Constraint::Length(6), // Summary
        Constraint::Min(1),    // History and resistance lists
        Constraint::Length(2), // Controls
        Constraint::Length(1), // Footer
    ])
    .split(area);

    let title = Line::from(tr(lang, Text::Detail))
        .bold()
        .fg(colors.title)
        .centered();
    frame.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    let Some(report) = app.detail.report.as_ref() else {
        frame.render_widget(
            Paragraph::new("Error: Battery not found").centered().red(),
            chunks[1],
        );
        return;
    };
    let battery = &report.battery;

    let last_action = report
        .last_action
        .map(|at| at.format_datetime())
        .unwrap_or_else(|| "never".to_string());
    let summary = vec![
        Line::from(vec![
            Span::styled(battery.label.clone(), Style::default().bold()),
            Span::raw("  "),
            Span::styled(
                "■ ",
                Style::default().fg(hex_color(report.series_color.as_deref())),
            ),
            Span::raw(format!(
                "{} {} · {} · {}",
                report.brand,
                report.series,
                report.battery_type,
                battery.pack_label()
            )),
        ]),
        Line::from(vec![
            Span::styled("Status: ", Style::default().bold()),
            Span::styled(
                status_label(lang, report.status),
                Style::default().fg(status_color(report.status)),
            ),
            Span::raw("   "),
            Span::styled("Alert: ", Style::default().bold()),
            Span::styled(
                report.alert.as_str(),
                Style::default().fg(alert_color(report.alert)),
            ),
        ]),
        Line::from(vec![
            Span::styled("Last action: ", Style::default().bold()),
            Span::raw(format!(
                "{} ({} {})",
                last_action,
                report.days_since_last_action,
                tr(lang, Text::Days)
            )),
        ]),
        Line::from(vec![
            Span::styled("Added: ", Style::default().bold()),
            Span::raw(battery.created_at.format_date()),
            Span::raw("   "),
            Span::styled("Cycles: ", Style::default().bold()),
            Span::raw(report.cycles.to_string()),
        ]),
    ];
    frame.render_widget(Paragraph::new(summary), chunks[1]);

    let lists = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    let pane_block = |title: &'static str, focused: bool| {
        let border = if focused {
            Style::default().fg(colors.accent)
        } else {
            Style::default().fg(colors.muted)
        };
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border)
    };
    let highlight = Style::default()
        .add_modifier(Modifier::BOLD)
        .bg(colors.highlight_bg);

    let mut history: Vec<ListItem> = app
        .detail
        .records
        .iter()
        .map(|record| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    record.at.format_datetime(),
                    Style::default().fg(colors.muted),
                ),
                Span::raw("  "),
                Span::styled(
                    status_label(lang, record.status),
                    Style::default().fg(status_color(record.status)),
                ),
            ]))
        })
        .collect();
    if history.is_empty() {
        history.push(ListItem::new(tr(lang, Text::NoRecords)));
    }

    let mut resistance: Vec<ListItem> = app
        .detail
        .resistance
        .iter()
        .map(|record| {
            let cells = record
                .cells
                .iter()
                .map(|c| format!("{:.1}", c))
                .collect::<Vec<_>>()
                .join(" ");
            let avg = match (record.average(), record.max()) {
                (Some(avg), Some(max)) => format!("avg {:.1} max {:.1}mΩ", avg, max),
                _ => String::new(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(record.at.format_date(), Style::default().fg(colors.muted)),
                Span::raw("  "),
                Span::raw(cells),
                Span::raw("  "),
                Span::styled(avg, Style::default().fg(colors.accent)),
            ]))
        })
        .collect();
    if resistance.is_empty() {
        resistance.push(ListItem::new(tr(lang, Text::NoRecords)));
    }

    let focus = app.detail.pane;
    frame.render_stateful_widget(
        List::new(history)
            .block(pane_block(
                tr(lang, Text::History),
                focus == DetailPane::History,
            ))
            .highlight_style(highlight)
            .highlight_symbol("> "),
        lists[0],
        &mut app.detail.records_state,
    );
    frame.render_stateful_widget(
        List::new(resistance)
            .block(pane_block(
                tr(lang, Text::Resistance),
                focus == DetailPane::Resistance,
            ))
            .highlight_style(highlight)
            .highlight_symbol("> "),
        lists[1],
        &mut app.detail.resistance_state,
    );

    let controls = "[c/s/d] Record status  [r] Resistance  [Tab] Switch list  [x] Delete record  \
                    [Esc] Back";
    frame.render_widget(
        Paragraph::new(controls)
            .centered()
            .fg(colors.muted)
            .block(Block::default().borders(Borders::TOP)),
        chunks[3],
    );

    ui::render_footer(frame, chunks[4], app, "[Esc] Inventory  [q] Quit");
}
