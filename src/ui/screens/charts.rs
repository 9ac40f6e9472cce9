use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.summaries.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Charts ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            ));
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses to chart yet. Add some with :add",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(9),    // Totals bar chart
            Constraint::Length(8), // Per-category stats
            Constraint::Length(5), // Daily trend sparklines
        ])
        .split(area);

    render_totals_chart(f, chunks[0], app);
    render_stats_table(f, chunks[1], app);
    render_trend(f, chunks[2], app);
}

fn render_totals_chart(f: &mut Frame, area: Rect, app: &App) {
    let bars: Vec<Bar> = app
        .summaries
        .iter()
        .take(12)
        .map(|s| {
            let value = s.total.to_u64().unwrap_or(0);
            Bar::default()
                .value(value)
                .label(Line::from(truncate(&s.name, 10)))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(Span::styled(
                    " Spending by Category ",
                    Style::default()
                        .fg(theme::TEXT_DIM)
                        .add_modifier(Modifier::BOLD),
                )),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_stats_table(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["Category", "Total", "Average", "Max"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .summaries
        .iter()
        .take(area.height.saturating_sub(3) as usize)
        .enumerate()
        .map(|(i, s)| {
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(truncate(&s.name, 18)),
                Cell::from(format_amount(s.total)),
                Cell::from(format_amount(s.average)),
                Cell::from(format_amount(s.max)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(14),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Category Totals ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}

/// Daily spend per category across the observed span, one sparkline per
/// top category.
fn render_trend(f: &mut Frame, area: Rect, app: &App) {
    let top: Vec<i64> = app
        .summaries
        .iter()
        .take(3)
        .map(|s| s.category_id)
        .collect();
    if top.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> =
        std::iter::repeat(Constraint::Ratio(1, top.len() as u32))
            .take(top.len())
            .collect();
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (pane, category_id) in panes.iter().zip(top) {
        let Some(series) = app.trend.iter().find(|s| s.category_id == category_id) else {
            continue;
        };

        // Whole cents so small daily totals still register.
        let data: Vec<u64> = series
            .points
            .iter()
            .map(|(_, v)| (*v * Decimal::from(100)).to_u64().unwrap_or(0))
            .collect();

        let sparkline = Sparkline::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme::OVERLAY))
                    .title(Span::styled(
                        format!(" {} ", truncate(&series.name, 16)),
                        Style::default()
                            .fg(theme::TEXT_DIM)
                            .add_modifier(Modifier::BOLD),
                    )),
            )
            .data(&data)
            .style(Style::default().fg(theme::YELLOW));

        f.render_widget(sparkline, *pane);
    }
}
