pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS expenses (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    amount       TEXT NOT NULL,
    date         TEXT NOT NULL,
    category_id  INTEGER NOT NULL REFERENCES categories(id),
    order_index  INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category_id);
CREATE INDEX IF NOT EXISTS idx_expenses_order ON expenses(order_index);

CREATE TABLE IF NOT EXISTS monthly_budgets (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    year           INTEGER NOT NULL,
    month          INTEGER NOT NULL,
    budget_amount  TEXT NOT NULL
);

"#;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // v1 shipped the budget limit column as "budget_amount"; v2 renames it.
    (
        1,
        "ALTER TABLE monthly_budgets RENAME COLUMN budget_amount TO limit_amount;",
    ),
];

pub(crate) const CURRENT_VERSION: i32 = 2;
