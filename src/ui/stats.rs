use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};

use crate::app::App;
use crate::clock::Clock;
use crate::db::DatabaseOps;
use crate::i18n::{Text, status_label, tr};
use crate::models::BatteryStatus;
use crate::report::{AlertLevel, FleetSummary};
use crate::ui::{self, alert_color, palette, status_color};

/// One bar of a chart: label, count and color
type Slice = (String, usize, Color);

/// Render the fleet statistics view
pub fn render_stats<D: DatabaseOps, C: Clock>(frame: &mut Frame, area: Rect, app: &mut App<D, C>) {
    let lang = app.language();
    let colors = palette(app.settings.theme);
    let summary = &app.summary;

    let chunks = Layout::vertical([
        Constraint::Length(3), // Title
        Constraint::Min(1),    // Chart area
        Constraint::Length(3), // Summary
        Constraint::Length(1), // Footer
    ])
    .split(area);

    let title = Line::from(tr(lang, Text::Stats))
        .bold()
        .fg(colors.title)
        .centered();
    frame.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    let by_status: Vec<Slice> = BatteryStatus::ALL
        .iter()
        .map(|s| {
            (
                status_label(lang, *s).to_string(),
                summary.status_count(*s),
                status_color(*s),
            )
        })
        .collect();
    let by_alert: Vec<Slice> = AlertLevel::ALL
        .iter()
        .map(|a| (a.as_str().to_string(), summary.alert_count(*a), alert_color(*a)))
        .collect();

    let rows = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    for (row, (slices, chart_title)) in rows
        .iter()
        .zip([
            (&by_status, tr(lang, Text::ByStatus)),
            (&by_alert, tr(lang, Text::ByAlert)),
        ])
    {
        let cols = Layout::horizontal([
            Constraint::Percentage(60), // Bar chart
            Constraint::Percentage(40), // Legend
        ])
        .split(*row);
        render_bar_chart(
            frame,
            cols[0],
            slices,
            chart_title,
            tr(lang, Text::NoChartData),
            summary,
        );
        render_legend(
            frame,
            cols[1],
            slices,
            tr(lang, Text::Breakdown),
            summary.batteries,
        );
    }

    let totals = format!(
        "{}: {}  |  {}: {}",
        tr(lang, Text::Batteries),
        summary.batteries,
        tr(lang, Text::TotalCycles),
        summary.total_cycles
    );
    frame.render_widget(
        Paragraph::new(totals)
            .centered()
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

fn render_bar_chart(
    frame: &mut Frame,
    area: Rect,
    slices: &[Slice],
    title: &str,
    empty: &str,
    summary: &FleetSummary,
) {
    if summary.batteries == 0 {
        frame.render_widget(
            Paragraph::new(empty.to_string()).centered().dark_gray(),
            area,
        );
        return;
    }

    let max = slices.iter().map(|(_, n, _)| *n).max().unwrap_or(1);

    let bars: Vec<Bar> = slices
        .iter()
        .map(|(label, count, color)| {
            Bar::default()
                .value(*count as u64)
                .label(Line::from(label.clone()))
                .text_value(count.to_string())
                .style(Style::default().fg(*color))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .bar_width(9)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars))
        .max(max.max(1) as u64);

    frame.render_widget(chart, area);
}

fn render_legend(frame: &mut Frame, area: Rect, slices: &[Slice], title: &str, total: usize) {
    if total == 0 {
        return;
    }

    let lines: Vec<Line> = slices
        .iter()
        .map(|(label, count, color)| {
            let pct = (*count as f64 / total as f64) * 100.0;
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(*color)),
                Span::styled(format!("{:<12}", label), Style::default().fg(*color)),
                Span::raw(format!("{:>4}  ({:.0}%)", count, pct)),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title.to_string())),
        area,
    );
}
