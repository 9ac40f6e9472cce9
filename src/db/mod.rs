mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_default_categories()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        let current: i32 = if has_version_table {
            self.conn
                .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                    row.get(0)
                })
                .unwrap_or(0)
        } else {
            // Fresh database - apply the base schema, then roll forward.
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn
                .execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
            1
        };

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    fn seed_default_categories(&mut self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let defaults = ["Food", "Transport", "Entertainment", "Bills", "Other"];

        let tx = self.conn.transaction()?;
        for name in &defaults {
            tx.execute(
                "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
                params![name],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: Some(row.get(0)?),
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn insert_category(&self, cat: &Category) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (name) VALUES (?1)",
            params![cat.name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Resolve a bare category name against the catalog, creating the
    /// category when no existing one matches. Matching is case-insensitive.
    pub(crate) fn find_or_create_category(&self, name: &str) -> Result<i64> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM categories WHERE name = ?1 COLLATE NOCASE",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        self.conn.execute(
            "INSERT INTO categories (name) VALUES (?1)",
            params![name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // ── Expenses ──────────────────────────────────────────────

    /// All expenses joined with their category name, in display order.
    pub(crate) fn list_expenses(&self) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.id, e.name, e.amount, e.date, e.category_id, c.name, e.order_index
             FROM expenses e JOIN categories c ON e.category_id = c.id
             ORDER BY e.order_index ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let amount_str: String = row.get(2)?;
            let date_str: String = row.get(3)?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            Ok(Expense {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                amount: Decimal::from_str(&amount_str).unwrap_or_default(),
                date,
                category_id: row.get(4)?,
                category_name: row.get(5)?,
                order_index: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Insert a new expense at the end of the display order: its order index
    /// is one past the current maximum, or 0 for the first record.
    pub(crate) fn insert_expense(
        &self,
        name: &str,
        amount: Decimal,
        date: NaiveDate,
        category_id: i64,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (name, amount, date, category_id, order_index)
             VALUES (?1, ?2, ?3, ?4, (SELECT COALESCE(MAX(order_index) + 1, 0) FROM expenses))",
            params![
                name,
                amount.to_string(),
                date.format("%Y-%m-%d").to_string(),
                category_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Replace an expense's fields by id. Silently a no-op when the id does
    /// not exist; the order index is never touched here.
    pub(crate) fn update_expense(
        &self,
        id: i64,
        name: &str,
        amount: Decimal,
        date: NaiveDate,
        category_id: i64,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE expenses SET name = ?2, amount = ?3, date = ?4, category_id = ?5
             WHERE id = ?1",
            params![
                id,
                name,
                amount.to_string(),
                date.format("%Y-%m-%d").to_string(),
                category_id,
            ],
        )?;
        Ok(())
    }

    /// Remove by id; no-op if not found. Surviving order indices are not
    /// renumbered - the index is a sort key, not a dense rank.
    pub(crate) fn delete_expense(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Rewrite every record's order index to its position in the supplied
    /// id sequence (0..n-1), in one transaction.
    pub(crate) fn reorder_expenses(&mut self, ids: &[i64]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (position, id) in ids.iter().enumerate() {
            tx.execute(
                "UPDATE expenses SET order_index = ?1 WHERE id = ?2",
                params![position as i64, id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Exchange the order-index values of two records directly, touching no
    /// other record. Combined with deletes this can leave gaps; listing
    /// sorts by index regardless.
    pub(crate) fn swap_order(&mut self, id_a: i64, id_b: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        let index_a: i64 = tx.query_row(
            "SELECT order_index FROM expenses WHERE id = ?1",
            params![id_a],
            |row| row.get(0),
        )?;
        let index_b: i64 = tx.query_row(
            "SELECT order_index FROM expenses WHERE id = ?1",
            params![id_b],
            |row| row.get(0),
        )?;
        tx.execute(
            "UPDATE expenses SET order_index = ?1 WHERE id = ?2",
            params![index_b, id_a],
        )?;
        tx.execute(
            "UPDATE expenses SET order_index = ?1 WHERE id = ?2",
            params![index_a, id_b],
        )?;
        tx.commit()?;
        Ok(())
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn get_budget(&self, year: i32, month: u32) -> Result<Option<MonthlyBudget>> {
        let result = self
            .conn
            .query_row(
                "SELECT id, year, month, limit_amount FROM monthly_budgets
                 WHERE year = ?1 AND month = ?2",
                params![year, month],
                |row| {
                    let limit_str: String = row.get(3)?;
                    Ok(MonthlyBudget {
                        id: Some(row.get(0)?),
                        year: row.get(1)?,
                        month: row.get(2)?,
                        limit_amount: Decimal::from_str(&limit_str).unwrap_or_default(),
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// The limit for the month containing `today`, or zero when none is set.
    pub(crate) fn current_limit(&self, today: NaiveDate) -> Result<Decimal> {
        use chrono::Datelike;
        Ok(self
            .get_budget(today.year(), today.month())?
            .map(|b| b.limit_amount)
            .unwrap_or_default())
    }

    /// Upsert by (year, month). At most one row per month is enforced here
    /// by lookup-before-insert, not by a uniqueness constraint.
    pub(crate) fn save_budget(&self, year: i32, month: u32, limit: Decimal) -> Result<()> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM monthly_budgets WHERE year = ?1 AND month = ?2",
                params![year, month],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(id) => {
                self.conn.execute(
                    "UPDATE monthly_budgets SET limit_amount = ?1 WHERE id = ?2",
                    params![limit.to_string(), id],
                )?;
            }
            None => {
                self.conn.execute(
                    "INSERT INTO monthly_budgets (year, month, limit_amount) VALUES (?1, ?2, ?3)",
                    params![year, month, limit.to_string()],
                )?;
            }
        }
        Ok(())
    }

    /// Sum of expense amounts over an inclusive date range. ISO-8601 text
    /// dates compare correctly as strings; amounts are summed as Decimal on
    /// this side to avoid float rounding in SQL.
    pub(crate) fn spent_in_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Decimal> {
        let mut stmt = self
            .conn
            .prepare("SELECT amount FROM expenses WHERE date >= ?1 AND date <= ?2")?;
        let rows = stmt.query_map(
            params![
                from.format("%Y-%m-%d").to_string(),
                to.format("%Y-%m-%d").to_string(),
            ],
            |row| row.get::<_, String>(0),
        )?;
        let mut total = Decimal::ZERO;
        for amount_str in rows {
            total += Decimal::from_str(&amount_str?).unwrap_or_default();
        }
        Ok(total)
    }

    /// Sum of expense amounts in a calendar month.
    pub(crate) fn spent_in_month(&self, year: i32, month: u32) -> Result<Decimal> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| anyhow::anyhow!("Invalid month: {year}-{month}"))?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last = next
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| anyhow::anyhow!("Invalid month: {year}-{month}"))?;
        self.spent_in_range(first, last)
    }

    /// Current-month budget usage: limit plus the calendar-month sum and the
    /// trailing 7-day sum ending today.
    pub(crate) fn budget_status(&self, today: NaiveDate) -> Result<BudgetStatus> {
        use chrono::Datelike;
        let week_start = today - chrono::Days::new(6);
        Ok(BudgetStatus {
            limit: self.current_limit(today)?,
            spent_this_month: self.spent_in_month(today.year(), today.month())?,
            spent_last_week: self.spent_in_range(week_start, today)?,
        })
    }

    // ── Maintenance ───────────────────────────────────────────

    /// Destructive bulk reset: every expense and every budget row, in one
    /// transaction. The presentation layer confirms before calling.
    pub(crate) fn clear_all(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM expenses", [])?;
        tx.execute("DELETE FROM monthly_budgets", [])?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
