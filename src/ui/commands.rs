use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::app::{App, InputMode, PendingAction, Screen, SortColumn};
use crate::db::Database;
use crate::exchange::{self, ImportOutcome};
use crate::models::Category;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit Outlay", cmd_quit, r);
    register_command!("quit", "Quit Outlay", cmd_quit, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("b", "Go to Budget", cmd_budget_screen, r);
    register_command!("c", "Go to Charts", cmd_charts, r);
    register_command!("charts", "Go to Charts", cmd_charts, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add expense (e.g. :add Food Morning coffee 4.50 [2024-01-15])",
        cmd_add,
        r
    );
    register_command!("a", "Add expense (e.g. :a Food Coffee 4.50)", cmd_add, r);
    register_command!(
        "edit",
        "Replace the selected expense (e.g. :edit Food Coffee 5.00)",
        cmd_edit,
        r
    );
    register_command!("delete", "Delete the selected expense", cmd_delete, r);
    register_command!("move-up", "Move the selected expense up", cmd_move_up, r);
    register_command!(
        "move-down",
        "Move the selected expense down",
        cmd_move_down,
        r
    );
    register_command!(
        "sort",
        "Sort and persist order (e.g. :sort amount; repeat to flip)",
        cmd_sort,
        r
    );
    register_command!(
        "filter",
        "Filter by category (e.g. :filter Food, :filter all)",
        cmd_filter,
        r
    );
    register_command!("f", "Filter by category", cmd_filter, r);
    register_command!("from", "Filter from date (e.g. :from 2024-01-01)", cmd_from, r);
    register_command!("to", "Filter to date (e.g. :to 2024-01-31)", cmd_to, r);
    register_command!("clear-dates", "Clear the date-range filter", cmd_clear_dates, r);
    register_command!(
        "budget",
        "Set this month's limit (e.g. :budget 1500)",
        cmd_budget,
        r
    );
    register_command!(
        "category",
        "Create category (e.g. :category Groceries)",
        cmd_category,
        r
    );
    register_command!(
        "export",
        "Export ledger to CSV (e.g. :export ~/january.csv)",
        cmd_export,
        r
    );
    register_command!(
        "import",
        "Import CSV, replacing the ledger (e.g. :import ~/january.csv)",
        cmd_import,
        r
    );
    register_command!(
        "clear-all",
        "Delete every expense and budget",
        cmd_clear_all,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Argument parsing ─────────────────────────────────────────

const EXPENSE_USAGE: &str = "Usage: <category> <name...> <amount> [YYYY-MM-DD]";

/// Parse `<category> <name...> <amount> [date]`. The category is the first
/// token and must match the catalog; the date, when present, is the last
/// token; everything between the category and the amount is the name.
fn parse_expense_args(
    args: &str,
    today: NaiveDate,
    categories: &[Category],
) -> std::result::Result<(String, Decimal, i64, NaiveDate), String> {
    let mut tokens: Vec<&str> = args.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(EXPENSE_USAGE.into());
    }

    let category_token = tokens.remove(0);
    let category_id = Category::find_by_name(categories, category_token)
        .and_then(|c| c.id)
        .ok_or_else(|| {
            format!("Unknown category: {category_token}. Create it with :category first")
        })?;

    let date = match tokens.last().and_then(|t| NaiveDate::parse_from_str(t, "%Y-%m-%d").ok()) {
        Some(d) => {
            tokens.pop();
            d
        }
        None => today,
    };

    let amount_token = tokens.pop().ok_or(EXPENSE_USAGE)?;
    let amount = Decimal::from_str(amount_token)
        .map_err(|_| format!("Invalid amount: {amount_token}"))?;
    if amount <= Decimal::ZERO {
        return Err("Amount must be positive".into());
    }

    let name = tokens.join(" ");
    if name.is_empty() {
        return Err("Expense name must not be empty".into());
    }

    Ok((name, amount, category_id, date))
}

/// Replace the whole ledger with an import file's contents: clear, insert
/// the rows in file order (they receive fresh ids and dense order indices),
/// and save a positive limit for the current month. Shared with the CLI.
pub(crate) fn commit_import(
    db: &mut Database,
    outcome: &ImportOutcome,
    today: NaiveDate,
) -> anyhow::Result<usize> {
    db.clear_all()?;
    for row in &outcome.rows {
        let category_id = db.find_or_create_category(&row.category_name)?;
        db.insert_expense(&row.name, row.amount, row.date, category_id)?;
    }
    if let Some(limit) = outcome.limit {
        if limit > Decimal::ZERO {
            db.save_budget(today.year(), today.month(), limit)?;
        }
    }
    Ok(outcome.rows.len())
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.refresh_all(db)?;
    Ok(())
}

fn cmd_budget_screen(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Budget;
    app.refresh_budget(db)?;
    Ok(())
}

fn cmd_charts(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Charts;
    app.refresh_expenses(db)?;
    app.refresh_charts();
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(EXPENSE_USAGE);
        return Ok(());
    }
    match parse_expense_args(args, app.today, &app.categories) {
        Ok((name, amount, category_id, date)) => {
            db.insert_expense(&name, amount, date, category_id)?;
            app.refresh_all(db)?;
            app.status_after_change(format!("Added: {name}"));
        }
        Err(msg) => app.set_status(msg),
    }
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(id) = app.selected_expense().and_then(|e| e.id) else {
        app.set_status("No expense selected");
        return Ok(());
    };
    if args.is_empty() {
        app.set_status(EXPENSE_USAGE);
        return Ok(());
    }
    match parse_expense_args(args, app.today, &app.categories) {
        Ok((name, amount, category_id, date)) => {
            db.update_expense(id, &name, amount, date, category_id)?;
            app.refresh_all(db)?;
            app.status_after_change(format!("Updated: {name}"));
        }
        Err(msg) => app.set_status(msg),
    }
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some((id, name)) = app.selected_expense().map(|e| (e.id, e.name.clone())) else {
        app.set_status("No expense selected");
        return Ok(());
    };
    if let Some(id) = id {
        app.confirm_message = format!("Delete '{name}'?");
        app.pending_action = Some(PendingAction::DeleteExpense { id, name });
        app.input_mode = InputMode::Confirm;
    }
    Ok(())
}

fn cmd_move_up(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    move_selected(app, db, true)
}

fn cmd_move_down(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    move_selected(app, db, false)
}

/// Swap the selected expense with its neighbor in the *visible* list, the
/// single-step reorder behind move-up/move-down.
fn move_selected(app: &mut App, db: &mut Database, up: bool) -> anyhow::Result<()> {
    let visible = app.visible();
    if visible.is_empty() {
        return Ok(());
    }
    let position = app.expense_index.min(visible.len() - 1);
    let target = if up {
        match position.checked_sub(1) {
            Some(t) => t,
            None => return Ok(()),
        }
    } else {
        if position + 1 >= visible.len() {
            return Ok(());
        }
        position + 1
    };

    let id_a = app.expenses[visible[position]].id;
    let id_b = app.expenses[visible[target]].id;
    if let (Some(a), Some(b)) = (id_a, id_b) {
        db.swap_order(a, b)?;
        app.refresh_expenses(db)?;
        // Follow the moved expense.
        app.expense_index = target;
    }
    Ok(())
}

fn cmd_sort(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(column) = SortColumn::parse(args) else {
        app.set_status("Usage: :sort <name|amount|category|date>");
        return Ok(());
    };

    // Sorting the same column twice flips the direction.
    let ascending = match app.last_sort {
        Some((c, asc)) if c == column => !asc,
        _ => true,
    };
    app.last_sort = Some((column, ascending));

    let ids: Vec<i64> = {
        let mut sorted: Vec<&crate::models::Expense> = app.expenses.iter().collect();
        sorted.sort_by(|a, b| match column {
            SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortColumn::Amount => a.amount.cmp(&b.amount),
            SortColumn::Category => a
                .category_name
                .to_lowercase()
                .cmp(&b.category_name.to_lowercase()),
            SortColumn::Date => a.date.cmp(&b.date),
        });
        if !ascending {
            sorted.reverse();
        }
        sorted.iter().filter_map(|e| e.id).collect()
    };

    // The sorted arrangement becomes the persisted manual order.
    db.reorder_expenses(&ids)?;
    app.refresh_expenses(db)?;
    app.set_status(format!(
        "Sorted by {column} ({})",
        if ascending { "ascending" } else { "descending" }
    ));
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() || args.eq_ignore_ascii_case("all") {
        app.filter.category_id = None;
        app.set_status("Showing all categories");
    } else {
        match Category::find_by_name(&app.categories, args).map(|c| (c.id, c.name.clone())) {
            Some((id, name)) => {
                app.filter.category_id = id;
                app.set_status(format!("Filtering by category: {name}"));
            }
            None => {
                app.set_status(format!("Unknown category: {args}"));
                return Ok(());
            }
        }
    }
    app.expense_index = 0;
    app.expense_scroll = 0;
    Ok(())
}

fn cmd_from(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    match NaiveDate::parse_from_str(args, "%Y-%m-%d") {
        Ok(date) => {
            app.filter.from = Some(date);
            app.expense_index = 0;
            app.expense_scroll = 0;
            app.set_status(format!("Filtering from {date}"));
        }
        Err(_) => app.set_status("Usage: :from YYYY-MM-DD"),
    }
    Ok(())
}

fn cmd_to(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    match NaiveDate::parse_from_str(args, "%Y-%m-%d") {
        Ok(date) => {
            app.filter.to = Some(date);
            app.expense_index = 0;
            app.expense_scroll = 0;
            app.set_status(format!("Filtering to {date}"));
        }
        Err(_) => app.set_status("Usage: :to YYYY-MM-DD"),
    }
    Ok(())
}

fn cmd_clear_dates(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.filter.from = None;
    app.filter.to = None;
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.set_status("Date range cleared");
    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :budget <amount> (e.g. :budget 1500)");
        return Ok(());
    }
    let Ok(limit) = Decimal::from_str(args) else {
        app.set_status(format!("Invalid amount: {args}"));
        return Ok(());
    };
    if limit < Decimal::ZERO {
        app.set_status("Budget limit must be zero or positive");
        return Ok(());
    }

    db.save_budget(app.today.year(), app.today.month(), limit)?;
    app.refresh_budget(db)?;
    let msg = format!("Budget for {} set to {limit}", app.today.format("%Y-%m"));
    app.status_after_change(msg);
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :category <name>");
        return Ok(());
    }
    if Category::find_by_name(&app.categories, args).is_some() {
        app.set_status(format!("Category already exists: {args}"));
        return Ok(());
    }
    db.insert_category(&Category::new(args.to_string()))?;
    app.refresh_categories(db)?;
    app.set_status(format!("Created category: {args}"));
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        exchange::default_export_path()
    } else {
        exchange::expand_home(args)
    };

    let expenses = db.list_expenses()?;
    let limit = db.current_limit(app.today)?;
    let count = exchange::export(std::path::Path::new(&path), &expenses, limit)?;
    app.set_status(format!("Exported {count} expenses to {path}"));
    Ok(())
}

fn cmd_import(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :import <path>");
        return Ok(());
    }
    let path = exchange::expand_home(args);
    let outcome = exchange::import(std::path::Path::new(&path))?;

    let skipped_note = if outcome.skipped > 0 {
        format!(" ({} malformed rows skipped)", outcome.skipped)
    } else {
        String::new()
    };
    app.confirm_message = format!(
        "Replace ledger with {} imported expenses{skipped_note}? Existing data is cleared",
        outcome.rows.len()
    );
    app.staged_import = Some(outcome);
    app.pending_action = Some(PendingAction::ImportReplace);
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_clear_all(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.confirm_message = "Delete ALL expenses and budgets?".into();
    app.pending_action = Some(PendingAction::ClearAll);
    app.input_mode = InputMode::Confirm;
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
