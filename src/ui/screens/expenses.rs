use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    render_table(f, chunks[0], app);
    render_footer(f, chunks[1], app);
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let visible = app.visible();

    if visible.is_empty() {
        let msg = if app.filter.is_active() {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No expenses match the current filter",
                    theme::dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Adjust with :filter, :from, :to or :clear-dates",
                    theme::dim_style(),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled("No expenses yet", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Add one with :add <category> <name> <amount>, or :import a file",
                    theme::dim_style(),
                )),
            ]
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Expenses (0) ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            ));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Name", "Amount", "Category", "Date"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(position, &i)| {
            let expense = &app.expenses[i];
            let style = if position == app.expense_index {
                theme::selected_style()
            } else if position % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(truncate(&expense.name, 40)),
                Cell::from(format_amount(expense.amount)),
                Cell::from(truncate(&expense.category_name, 18)),
                Cell::from(expense.date.format("%Y-%m-%d").to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(18),
        Constraint::Length(12),
    ];

    let filter_note = if app.filter.is_active() {
        " [filtered]"
    } else {
        ""
    };

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Expenses ({}/{}){filter_note} ", visible.len(), app.expenses.len()),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(" Total: ", theme::dim_style()),
        Span::styled(
            format_amount(app.visible_total()),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    let mut notes: Vec<String> = Vec::new();
    if let Some(id) = app.filter.category_id {
        if let Some(cat) = crate::models::Category::find_by_id(&app.categories, id) {
            notes.push(format!("category: {}", cat.name));
        }
    }
    match (app.filter.from, app.filter.to) {
        (Some(from), Some(to)) => notes.push(format!("{from} → {to}")),
        (Some(from), None) => notes.push(format!("from {from}")),
        (None, Some(to)) => notes.push(format!("to {to}")),
        (None, None) => {}
    }
    if !notes.is_empty() {
        spans.push(Span::styled(
            format!("  ({})", notes.join(", ")),
            theme::dim_style(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
