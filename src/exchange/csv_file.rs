use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::Expense;

/// `Id;Name;Amount;Category;Date;Limit` - the Limit column carries the
/// current month's budget limit on the first data row only.
const HEADER: [&str; 6] = ["Id", "Name", "Amount", "Category", "Date", "Limit"];

/// One row parsed from an import file. The file's Id column is advisory:
/// the ledger reassigns identity and order index on insert. The category is
/// a bare name, resolved against the live catalog by the caller.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ImportedExpense {
    pub(crate) name: String,
    pub(crate) amount: Decimal,
    pub(crate) date: NaiveDate,
    pub(crate) category_name: String,
}

#[derive(Debug, Default)]
pub(crate) struct ImportOutcome {
    pub(crate) rows: Vec<ImportedExpense>,
    pub(crate) limit: Option<Decimal>,
    /// Rows dropped for having fewer than 6 fields or an unparseable
    /// amount/date. Surfaced in the import summary.
    pub(crate) skipped: usize,
}

/// Write the ledger and the month's limit to a semicolon-delimited file.
/// One line per expense in ledger order; amounts in invariant decimal form,
/// dates as `%Y-%m-%d`. Returns the number of expense lines written.
pub(crate) fn export(path: &Path, expenses: &[Expense], limit: Decimal) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;

    writer.write_record(HEADER)?;
    for (i, e) in expenses.iter().enumerate() {
        let limit_cell = if i == 0 {
            limit.to_string()
        } else {
            String::new()
        };
        writer.write_record([
            e.id.unwrap_or(0).to_string(),
            e.name.clone(),
            e.amount.to_string(),
            e.category_name.clone(),
            e.date.format("%Y-%m-%d").to_string(),
            limit_cell,
        ])?;
    }
    writer.flush()?;
    Ok(expenses.len())
}

/// Read a semicolon-delimited file back. The header line is skipped; rows
/// with fewer than 6 fields or an unparseable amount/date are counted and
/// dropped rather than failing the whole import. The limit is read from the
/// first data row only, when non-blank.
pub(crate) fn import(path: &Path) -> Result<ImportOutcome> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to open import file: {}", path.display()))?;

    let mut outcome = ImportOutcome::default();
    for (i, result) in reader.records().enumerate() {
        let record = result.context("Failed to read import record")?;
        if i == 0 {
            // Header line.
            continue;
        }
        if record.len() < 6 {
            outcome.skipped += 1;
            continue;
        }

        // The limit travels only in the first data row.
        if i == 1 {
            let cell = record.get(5).unwrap_or("").trim();
            if !cell.is_empty() {
                outcome.limit = Decimal::from_str(cell).ok();
            }
        }

        let name = record.get(1).unwrap_or("").to_string();
        let category_name = record.get(3).unwrap_or("").to_string();
        let amount = Decimal::from_str(record.get(2).unwrap_or("").trim());
        let date = NaiveDate::parse_from_str(record.get(4).unwrap_or("").trim(), "%Y-%m-%d");

        match (amount, date) {
            (Ok(amount), Ok(date)) => outcome.rows.push(ImportedExpense {
                name,
                amount,
                date,
                category_name,
            }),
            _ => outcome.skipped += 1,
        }
    }

    Ok(outcome)
}

/// Expand a leading `~/` against $HOME.
pub(crate) fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

pub(crate) fn default_export_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    format!("{home}/outlay-export.csv")
}

#[cfg(test)]
#[path = "csv_file_tests.rs"]
mod tests;
