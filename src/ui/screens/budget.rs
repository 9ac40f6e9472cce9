use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::format_amount;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Length(5), // Usage gauge
            Constraint::Min(3),    // Hint / warning
        ])
        .split(area);

    render_cards(f, chunks[0], app);
    render_usage(f, chunks[1], app);
    render_notes(f, chunks[2], app);
}

fn render_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let remaining = app.budget.remaining();

    render_card(f, cards[0], "Monthly Limit", app.budget.limit, theme::ACCENT);
    render_card(
        f,
        cards[1],
        "Spent This Month",
        app.budget.spent_this_month,
        if app.budget.is_over() {
            theme::RED
        } else {
            theme::TEXT
        },
    );
    render_card(
        f,
        cards[2],
        "Spent Last 7 Days",
        app.budget.spent_last_week,
        theme::TEXT,
    );
    render_card(
        f,
        cards[3],
        "Remaining",
        remaining,
        if remaining < Decimal::ZERO {
            theme::RED
        } else {
            theme::GREEN
        },
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, amount: Decimal, color: ratatui::style::Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_usage(f: &mut Frame, area: Rect, app: &App) {
    let used = app.budget.used_percentage();
    let ratio = (used / Decimal::from(100)).to_f64().unwrap_or(0.0);

    let color = if app.budget.is_over() {
        theme::RED
    } else if ratio > 0.8 {
        theme::YELLOW
    } else {
        theme::GREEN
    };

    let bar_width = area.width.saturating_sub(14) as usize;
    let bar = progress_bar(ratio.min(1.0), bar_width);

    let body = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(bar, Style::default().fg(color)),
            Span::styled(
                format!(" {used:.0}%"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" Usage for {} ", app.today.format("%Y-%m")),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    f.render_widget(Paragraph::new(body).centered().block(block), area);
}

fn render_notes(f: &mut Frame, area: Rect, app: &App) {
    let lines = if app.budget.is_over() {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Over budget by {} this month",
                    format_amount(app.budget.remaining().abs())
                ),
                Style::default().fg(theme::RED).add_modifier(Modifier::BOLD),
            )),
        ]
    } else if app.budget.limit == Decimal::ZERO {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "No budget set for this month",
                theme::dim_style(),
            )),
            Line::from(Span::styled(
                "Set one with :budget <amount>",
                theme::dim_style(),
            )),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} left to spend", format_amount(app.budget.remaining())),
                Style::default().fg(theme::GREEN),
            )),
        ]
    };

    f.render_widget(Paragraph::new(lines).centered(), area);
}

fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
