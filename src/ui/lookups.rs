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
use crate::i18n::{Text, lookup_title, tr};
use crate::models::LookupKind;
use crate::ui::{self, hex_color, palette};

/// Render the brands / series / types view
pub fn render_lookups<D: DatabaseOps, C: Clock>(
    frame: &mut Frame,
    area: Rect,
    app: &mut App<D, C>,
) {
    let lang = app.language();
    let colors = palette(app.settings.theme);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Title
        Constraint::Length(2), // Kind tabs
        Constraint::Min(1),    // Entries
        Constraint::Length(2), // Controls
        Constraint::Length(1), // Footer
    ])
    .split(area);

    let title = Line::from(tr(lang, Text::Lookups))
        .bold()
        .fg(colors.title)
        .centered();
    frame.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    // Kind selector, same shape as the stats period selector
    let tabs: Vec<Span> = LookupKind::ALL
        .iter()
        .flat_map(|kind| {
            let selected = *kind == app.lookup_kind;
            let style = if selected {
                Style::default().bold().fg(colors.accent)
            } else {
                Style::default().fg(colors.muted)
            };
            vec![
                Span::raw(if selected { "[ " } else { "  " }),
                Span::styled(lookup_title(lang, *kind), style),
                Span::raw(if selected { " ]" } else { "  " }),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(tabs)).centered(), chunks[1]);

    let show_color = app.lookup_kind.has_color();
    let mut items: Vec<ListItem> = app
        .lookups
        .iter()
        .map(|lookup| {
            let mut spans = Vec::new();
            if show_color {
                spans.push(Span::styled(
                    "■ ",
                    Style::default().fg(hex_color(lookup.color.as_deref())),
                ));
            }
            let label_style = if lookup.enabled {
                Style::default()
            } else {
                Style::default().fg(colors.muted).add_modifier(Modifier::CROSSED_OUT)
            };
            spans.push(Span::styled(lookup.label.clone(), label_style));
            if let Some(color) = lookup.color.as_ref().filter(|_| show_color) {
                spans.push(Span::styled(
                    format!("  {}", color),
                    Style::default().fg(colors.muted),
                ));
            }
            if !lookup.enabled {
                spans.push(Span::styled("  (disabled)", Style::default().fg(colors.muted)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    if items.is_empty() {
        items.push(ListItem::new(tr(lang, Text::NoRecords)));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::NONE))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(colors.highlight_bg),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, chunks[2], &mut app.lookup_state);

    let controls = "[h/l] Switch list  [j/k] Navigate  [n] New  [r] Rename  [e] Enable/Disable  [x] Delete";
    frame.render_widget(
        Paragraph::new(controls)
            .centered()
            .fg(colors.muted)
            .block(Block::default().borders(Borders::TOP)),
        chunks[3],
    );

    ui::render_footer(
        frame,
        chunks[4],
        app,
        "[1] Inventory  [2] Lookups  [3] Stats  [o] Settings  [q] Quit",
    );
}
