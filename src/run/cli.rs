use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::charts;
use crate::db::Database;
use crate::exchange;
use crate::models::{total_amount, Category, ExpenseFilter};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "list" | "ls" => cli_list(db),
        "add" => cli_add(&args[2..], db),
        "summary" | "s" => cli_summary(db),
        "budget" => cli_budget(&args[2..], db),
        "export" => cli_export(&args[2..], db),
        "import" => cli_import(&args[2..], db),
        "categories" => cli_categories(db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("outlay {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Outlay — local-only expense tracker");
    println!();
    println!("Usage: outlay [command]");
    println!();
    println!("Commands:");
    println!("  (none)                            Launch interactive TUI");
    println!("  list                              Print the ledger in display order");
    println!("  add <name> <amount> <category> [YYYY-MM-DD]");
    println!("                                    Add an expense (date defaults to today)");
    println!("  summary                           Print this month's budget and totals");
    println!("  budget [amount]                   Show or set this month's limit");
    println!("  export [path]                     Export ledger and limit to CSV");
    println!("  import <file.csv>                 Import a CSV, replacing the ledger");
    println!("  categories                        List categories");
    println!("  --help, -h                        Show this help");
    println!("  --version, -V                     Show version");
}

fn cli_list(db: &mut Database) -> Result<()> {
    let expenses = db.list_expenses()?;
    if expenses.is_empty() {
        println!("No expenses");
        return Ok(());
    }

    println!(
        "{:<4} {:<30} {:>12} {:<16} Date",
        "ID", "Name", "Amount", "Category"
    );
    println!("{}", "─".repeat(76));
    for e in &expenses {
        println!(
            "{:<4} {:<30} {:>12.2} {:<16} {}",
            e.id.unwrap_or(0),
            e.name,
            e.amount,
            e.category_name,
            e.date.format("%Y-%m-%d"),
        );
    }
    println!("{}", "─".repeat(76));
    println!(
        "{:<35} {:>12.2}",
        "Total",
        total_amount(&expenses, &ExpenseFilter::default())
    );
    Ok(())
}

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: outlay add <name> <amount> <category> [YYYY-MM-DD]");
    }

    let name = args[0].trim();
    if name.is_empty() {
        anyhow::bail!("Expense name must not be empty");
    }
    let amount = Decimal::from_str(&args[1])
        .map_err(|_| anyhow::anyhow!("Invalid amount: {}", args[1]))?;
    if amount <= Decimal::ZERO {
        anyhow::bail!("Amount must be positive");
    }

    let categories = db.get_categories()?;
    let category_id = Category::find_by_name(&categories, &args[2])
        .and_then(|c| c.id)
        .ok_or_else(|| {
            let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
            anyhow::anyhow!(
                "Unknown category: {}. Available: {}",
                args[2],
                names.join(", ")
            )
        })?;

    let date = match args.get(3) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("Invalid date: {raw} (expected YYYY-MM-DD)"))?,
        None => Local::now().date_naive(),
    };

    db.insert_expense(name, amount, date, category_id)?;
    println!("Added: {name} ({amount}) on {date}");

    let status = db.budget_status(Local::now().date_naive())?;
    if status.is_over() {
        println!(
            "Warning: monthly budget exceeded ({:.2} of {:.2})",
            status.spent_this_month, status.limit
        );
    }
    Ok(())
}

fn cli_summary(db: &mut Database) -> Result<()> {
    let today = Local::now().date_naive();
    let status = db.budget_status(today)?;
    let expenses = db.list_expenses()?;

    println!("Outlay — {}", today.format("%Y-%m"));
    println!("{}", "─".repeat(40));
    println!("  Limit:            {:>12.2}", status.limit);
    println!("  Spent this month: {:>12.2}", status.spent_this_month);
    println!("  Spent last 7d:    {:>12.2}", status.spent_last_week);
    println!("  Remaining:        {:>12.2}", status.remaining());
    println!("  Used:             {:>11.0}%", status.used_percentage());
    if status.is_over() {
        println!("  OVER BUDGET");
    }

    let summaries = charts::summarize_by_category(&expenses);
    if !summaries.is_empty() {
        println!();
        println!("Spending by Category:");
        for s in &summaries {
            println!(
                "  {:<20} {:>10.2}  (avg {:.2}, max {:.2})",
                s.name, s.total, s.average, s.max
            );
        }
    }

    Ok(())
}

fn cli_budget(args: &[String], db: &mut Database) -> Result<()> {
    let today = Local::now().date_naive();

    match args.first() {
        None => {
            let status = db.budget_status(today)?;
            println!(
                "Budget for {}: {:.2} (spent {:.2}, {:.0}% used)",
                today.format("%Y-%m"),
                status.limit,
                status.spent_this_month,
                status.used_percentage()
            );
        }
        Some(raw) => {
            let limit = Decimal::from_str(raw)
                .map_err(|_| anyhow::anyhow!("Invalid amount: {raw}"))?;
            if limit < Decimal::ZERO {
                anyhow::bail!("Budget limit must be zero or positive");
            }
            db.save_budget(today.year(), today.month(), limit)?;
            println!("Budget for {} set to {limit}", today.format("%Y-%m"));
        }
    }
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| exchange::expand_home(a))
        .unwrap_or_else(exchange::default_export_path);

    let expenses = db.list_expenses()?;
    let limit = db.current_limit(Local::now().date_naive())?;
    let count = exchange::export(Path::new(&path), &expenses, limit)?;
    if count == 0 {
        println!("Ledger is empty; wrote header only to {path}");
    } else {
        println!("Exported {count} expenses to {path}");
    }
    Ok(())
}

fn cli_import(args: &[String], db: &mut Database) -> Result<()> {
    let Some(file_path) = args.first() else {
        anyhow::bail!("Usage: outlay import <file.csv>");
    };
    let path = exchange::expand_home(file_path);
    if !Path::new(&path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let outcome = exchange::import(Path::new(&path))?;
    let count = crate::ui::commands::commit_import(
        db,
        &outcome,
        Local::now().date_naive(),
    )?;

    println!("Imported {count} expenses ({} malformed rows skipped)", outcome.skipped);
    if let Some(limit) = outcome.limit {
        println!("Monthly limit set to {limit}");
    }
    Ok(())
}

fn cli_categories(db: &mut Database) -> Result<()> {
    let categories = db.get_categories()?;
    println!("{:<4} Name", "ID");
    println!("{}", "─".repeat(24));
    for cat in &categories {
        println!("{:<4} {}", cat.id.unwrap_or(0), cat.name);
    }
    Ok(())
}
