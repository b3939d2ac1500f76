use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, BatteryField, LookupField};
use crate::clock::Clock;
use crate::db::DatabaseOps;
use crate::i18n::{Text, lookup_title, tr};
use crate::models::{Lookup, LookupKind};
use crate::ui::{hex_color, modal_area, palette};

/// Clear `area` and draw a titled modal frame, returning the inner area
fn modal_frame(frame: &mut Frame, area: Rect, title: &str, accent: Color) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// A bordered single-line text input with a cursor while focused
fn text_input(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(style);
    let text = if focused {
        format!("{}_", value)
    } else {
        value.to_string()
    };
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn picker_line<'a>(title: &'a str, items: &'a [Lookup], idx: usize, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default()
    };
    let mut spans = vec![Span::raw(format!("{:<10}", title))];
    match items.get(idx) {
        Some(lookup) => {
            spans.push(Span::styled("< ", Style::default().dark_gray()));
            if lookup.color.is_some() {
                spans.push(Span::styled(
                    "■ ",
                    Style::default().fg(hex_color(lookup.color.as_deref())),
                ));
            }
            spans.push(Span::styled(lookup.label.as_str(), style));
            spans.push(Span::styled(" >", Style::default().dark_gray()));
        }
        None => spans.push(Span::styled("(none)", Style::default().dark_gray())),
    }
    Line::from(spans)
}

fn controls_line(confirm: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled("[Enter]", Style::default().bold()),
        Span::raw(format!(" {}   ", confirm)),
        Span::styled("[Tab]", Style::default().bold()),
        Span::raw(" Next Field   "),
        Span::styled("[Esc]", Style::default().bold()),
        Span::raw(" Cancel"),
    ])
}

/// Render the new battery modal as an overlay
pub fn render_battery_modal<D: DatabaseOps, C: Clock>(
    frame: &mut Frame,
    area: Rect,
    app: &mut App<D, C>,
) {
    let lang = app.language();
    let colors = palette(app.settings.theme);
    let form = &app.battery_form;

    let area = modal_area(area, 56, 18);
    let title = if form.editing.is_some() {
        "Edit Battery"
    } else {
        "New Battery"
    };
    let inner = modal_frame(frame, area, title, colors.accent);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Label
        Constraint::Length(1), // Brand
        Constraint::Length(1), // Series
        Constraint::Length(1), // Type
        Constraint::Length(3), // Cells
        Constraint::Length(3), // Capacity
        Constraint::Length(1), // Spacer
        Constraint::Length(1), // Controls
    ])
    .split(inner);

    text_input(
        frame,
        chunks[0],
        "Label",
        &form.label,
        form.field == BatteryField::Label,
    );

    let pickers = [
        (BatteryField::Brand, LookupKind::Brand, form.brand_idx),
        (BatteryField::Series, LookupKind::Series, form.series_idx),
        (BatteryField::Type, LookupKind::Type, form.type_idx),
    ];
    for (chunk, (field, kind, idx)) in chunks[1..4].iter().zip(pickers) {
        let line = picker_line(
            lookup_title(lang, kind),
            app.pickers.get(kind),
            idx,
            form.field == field,
        );
        frame.render_widget(Paragraph::new(line), *chunk);
    }

    text_input(
        frame,
        chunks[4],
        "Cells (S)",
        &form.cells,
        form.field == BatteryField::Cells,
    );
    text_input(
        frame,
        chunks[5],
        "Capacity (mAh)",
        &form.capacity,
        form.field == BatteryField::Capacity,
    );

    frame.render_widget(
        Paragraph::new(controls_line(if form.editing.is_some() { "Save" } else { "Add" }))
            .centered()
            .dark_gray(),
        chunks[7],
    );
}

/// Render the new brand / series / type modal
pub fn render_lookup_modal<D: DatabaseOps, C: Clock>(
    frame: &mut Frame,
    area: Rect,
    app: &mut App<D, C>,
) {
    let lang = app.language();
    let colors = palette(app.settings.theme);
    let form = &app.lookup_form;
    let with_color = app.lookup_kind.has_color();

    let area = modal_area(area, 50, if with_color { 11 } else { 8 });
    let verb = if form.editing.is_some() { "Rename" } else { "New" };
    let title = format!("{} {}", verb, app.lookup_kind.entity());
    let inner = modal_frame(frame, area, &title, colors.accent);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Label
        Constraint::Length(if with_color { 3 } else { 0 }), // Color
        Constraint::Length(1), // Spacer
        Constraint::Length(1), // Controls
    ])
    .split(inner);

    text_input(
        frame,
        chunks[0],
        lookup_title(lang, app.lookup_kind),
        &form.label,
        form.field == LookupField::Label,
    );

    if with_color {
        let swatch = if form.color.is_empty() {
            "Color (#RRGGBB, optional)".to_string()
        } else {
            format!("Color ■ {}", form.color)
        };
        let style = Style::default().fg(hex_color(Some(form.color.as_str())));
        let focused = form.field == LookupField::Color;
        let block = Block::default()
            .title(Span::styled(swatch, style))
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            });
        let text = if focused {
            format!("{}_", form.color)
        } else {
            form.color.clone()
        };
        frame.render_widget(Paragraph::new(text).block(block), chunks[1]);
    }

    frame.render_widget(
        Paragraph::new(controls_line("Save")).centered().dark_gray(),
        chunks[3],
    );
}

/// Render the resistance entry modal for the selected battery
pub fn render_resistance_modal<D: DatabaseOps, C: Clock>(
    frame: &mut Frame,
    area: Rect,
    app: &mut App<D, C>,
) {
    let lang = app.language();
    let colors = palette(app.settings.theme);

    let area = modal_area(area, 56, 9);
    let inner = modal_frame(frame, area, tr(lang, Text::Resistance), colors.accent);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Battery
        Constraint::Length(3), // Readings
        Constraint::Length(1), // Spacer
        Constraint::Length(1), // Controls
    ])
    .split(inner);

    let heading = match app.selected_battery() {
        Some(report) => format!(
            "{}  ({} cells, mΩ)",
            report.battery.label, report.battery.cells
        ),
        None => String::new(),
    };
    frame.render_widget(Paragraph::new(heading).bold(), chunks[0]);

    text_input(
        frame,
        chunks[1],
        "One reading per cell",
        &app.resistance_input,
        true,
    );

    let controls = Line::from(vec![
        Span::styled("[Enter]", Style::default().bold()),
        Span::raw(" Save   "),
        Span::styled("[Esc]", Style::default().bold()),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(controls).centered().dark_gray(), chunks[3]);
}
