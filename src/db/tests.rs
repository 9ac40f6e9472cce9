#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn category_id(db: &Database, name: &str) -> i64 {
    db.get_categories()
        .unwrap()
        .iter()
        .find(|c| c.name == name)
        .and_then(|c| c.id)
        .unwrap()
}

// ── Default data ──────────────────────────────────────────────

#[test]
fn test_default_categories_seeded() {
    let db = Database::open_in_memory().unwrap();
    let cats = db.get_categories().unwrap();
    let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Food", "Transport", "Entertainment", "Bills", "Other"]
    );
}

#[test]
fn test_categories_not_reseeded_after_insert() {
    let db = Database::open_in_memory().unwrap();
    db.insert_category(&Category::new("Travel".into())).unwrap();
    let count = db.get_categories().unwrap().len();
    assert_eq!(count, 6);
}

#[test]
fn test_find_or_create_category() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");

    // Existing names resolve case-insensitively without creating anything.
    assert_eq!(db.find_or_create_category("food").unwrap(), food);
    assert_eq!(db.get_categories().unwrap().len(), 5);

    // Unknown names are created on the fly.
    let travel = db.find_or_create_category("Travel").unwrap();
    assert_eq!(db.get_categories().unwrap().len(), 6);
    assert_eq!(db.find_or_create_category("travel").unwrap(), travel);
}

// ── Expense CRUD and ordering ─────────────────────────────────

#[test]
fn test_insert_assigns_dense_order_indices() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");

    for i in 0..5 {
        db.insert_expense(&format!("e{i}"), dec!(1.00), date(2024, 1, 1), food)
            .unwrap();
    }

    let indices: Vec<i64> = db
        .list_expenses()
        .unwrap()
        .iter()
        .map(|e| e.order_index)
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_list_joins_category_and_orders_by_index() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    let transport = category_id(&db, "Transport");

    db.insert_expense("Coffee", dec!(4.50), date(2024, 1, 2), food)
        .unwrap();
    db.insert_expense("Bus", dec!(2.00), date(2024, 1, 2), transport)
        .unwrap();

    let expenses = db.list_expenses().unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].name, "Coffee");
    assert_eq!(expenses[0].category_name, "Food");
    assert_eq!(expenses[0].amount, dec!(4.50));
    assert_eq!(expenses[0].date, date(2024, 1, 2));
    assert_eq!(expenses[1].category_name, "Transport");
}

#[test]
fn test_list_empty_is_valid() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.list_expenses().unwrap().is_empty());
}

#[test]
fn test_update_replaces_fields_but_not_order() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    let bills = category_id(&db, "Bills");

    db.insert_expense("a", dec!(1.00), date(2024, 1, 1), food)
        .unwrap();
    let id = db
        .insert_expense("Rent?", dec!(500.00), date(2024, 1, 3), food)
        .unwrap();

    db.update_expense(id, "Rent", dec!(650.00), date(2024, 1, 5), bills)
        .unwrap();

    let expenses = db.list_expenses().unwrap();
    let updated = expenses.iter().find(|e| e.id == Some(id)).unwrap();
    assert_eq!(updated.name, "Rent");
    assert_eq!(updated.amount, dec!(650.00));
    assert_eq!(updated.date, date(2024, 1, 5));
    assert_eq!(updated.category_id, bills);
    assert_eq!(updated.order_index, 1);
}

#[test]
fn test_update_missing_id_is_noop() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    db.insert_expense("Coffee", dec!(4.50), date(2024, 1, 2), food)
        .unwrap();

    db.update_expense(9999, "Ghost", dec!(1.00), date(2024, 1, 1), food)
        .unwrap();

    let expenses = db.list_expenses().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].name, "Coffee");
}

#[test]
fn test_delete_does_not_renumber() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");

    let ids: Vec<i64> = (0..4)
        .map(|i| {
            db.insert_expense(&format!("e{i}"), dec!(1.00), date(2024, 1, 1), food)
                .unwrap()
        })
        .collect();

    db.delete_expense(ids[1]).unwrap();

    let indices: Vec<i64> = db
        .list_expenses()
        .unwrap()
        .iter()
        .map(|e| e.order_index)
        .collect();
    // Gap survives; listing still sorts by the sparse indices.
    assert_eq!(indices, vec![0, 2, 3]);

    // The next add continues past the maximum, not into the gap.
    db.insert_expense("e4", dec!(1.00), date(2024, 1, 1), food)
        .unwrap();
    let indices: Vec<i64> = db
        .list_expenses()
        .unwrap()
        .iter()
        .map(|e| e.order_index)
        .collect();
    assert_eq!(indices, vec![0, 2, 3, 4]);
}

#[test]
fn test_delete_missing_id_is_noop() {
    let db = Database::open_in_memory().unwrap();
    db.delete_expense(12345).unwrap();
    assert!(db.list_expenses().unwrap().is_empty());
}

#[test]
fn test_reorder_matches_supplied_sequence() {
    let mut db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");

    let a = db
        .insert_expense("a", dec!(1.00), date(2024, 1, 1), food)
        .unwrap();
    let b = db
        .insert_expense("b", dec!(2.00), date(2024, 1, 2), food)
        .unwrap();
    let c = db
        .insert_expense("c", dec!(3.00), date(2024, 1, 3), food)
        .unwrap();

    db.reorder_expenses(&[c, a, b]).unwrap();

    let listed: Vec<i64> = db
        .list_expenses()
        .unwrap()
        .iter()
        .filter_map(|e| e.id)
        .collect();
    assert_eq!(listed, vec![c, a, b]);

    let indices: Vec<i64> = db
        .list_expenses()
        .unwrap()
        .iter()
        .map(|e| e.order_index)
        .collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_swap_order_is_its_own_inverse() {
    let mut db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");

    let a = db
        .insert_expense("a", dec!(1.00), date(2024, 1, 1), food)
        .unwrap();
    let b = db
        .insert_expense("b", dec!(2.00), date(2024, 1, 2), food)
        .unwrap();
    db.insert_expense("c", dec!(3.00), date(2024, 1, 3), food)
        .unwrap();

    let before: Vec<Option<i64>> = db.list_expenses().unwrap().iter().map(|e| e.id).collect();

    db.swap_order(a, b).unwrap();
    let swapped: Vec<Option<i64>> = db.list_expenses().unwrap().iter().map(|e| e.id).collect();
    assert_eq!(swapped[0], Some(b));
    assert_eq!(swapped[1], Some(a));

    db.swap_order(a, b).unwrap();
    let restored: Vec<Option<i64>> = db.list_expenses().unwrap().iter().map(|e| e.id).collect();
    assert_eq!(restored, before);
}

#[test]
fn test_swap_order_touches_only_the_pair() {
    let mut db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");

    let ids: Vec<i64> = (0..4)
        .map(|i| {
            db.insert_expense(&format!("e{i}"), dec!(1.00), date(2024, 1, 1), food)
                .unwrap()
        })
        .collect();

    db.swap_order(ids[0], ids[3]).unwrap();

    let expenses = db.list_expenses().unwrap();
    let index_of = |id: i64| {
        expenses
            .iter()
            .find(|e| e.id == Some(id))
            .unwrap()
            .order_index
    };
    assert_eq!(index_of(ids[0]), 3);
    assert_eq!(index_of(ids[3]), 0);
    assert_eq!(index_of(ids[1]), 1);
    assert_eq!(index_of(ids[2]), 2);
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_budget_missing_reads_as_zero() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_budget(2024, 3).unwrap().is_none());
    assert_eq!(db.current_limit(date(2024, 3, 15)).unwrap(), Decimal::ZERO);
}

#[test]
fn test_save_budget_upserts_by_year_month() {
    let db = Database::open_in_memory().unwrap();

    db.save_budget(2024, 3, dec!(100.00)).unwrap();
    db.save_budget(2024, 3, dec!(250.00)).unwrap();
    db.save_budget(2024, 4, dec!(300.00)).unwrap();

    let march = db.get_budget(2024, 3).unwrap().unwrap();
    assert_eq!(march.limit_amount, dec!(250.00));
    let april = db.get_budget(2024, 4).unwrap().unwrap();
    assert_eq!(april.limit_amount, dec!(300.00));

    // Lookup-before-insert means exactly one row per month.
    let count: i64 = db
        .conn
        .query_row(
            "SELECT COUNT(*) FROM monthly_budgets WHERE year = 2024 AND month = 3",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_spent_in_month_uses_calendar_boundaries() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");

    db.insert_expense("jan-31", dec!(10.00), date(2024, 1, 31), food)
        .unwrap();
    db.insert_expense("feb-1", dec!(20.00), date(2024, 2, 1), food)
        .unwrap();
    db.insert_expense("feb-29", dec!(30.00), date(2024, 2, 29), food)
        .unwrap();
    db.insert_expense("mar-1", dec!(40.00), date(2024, 3, 1), food)
        .unwrap();

    assert_eq!(db.spent_in_month(2024, 2).unwrap(), dec!(50.00));
    assert_eq!(db.spent_in_month(2024, 12).unwrap(), Decimal::ZERO);
}

#[test]
fn test_spent_last_week_is_a_trailing_window() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    let today = date(2024, 3, 15);

    db.insert_expense("in-window-edge", dec!(1.00), date(2024, 3, 9), food)
        .unwrap();
    db.insert_expense("in-window", dec!(2.00), date(2024, 3, 12), food)
        .unwrap();
    db.insert_expense("today", dec!(4.00), today, food).unwrap();
    db.insert_expense("too-old", dec!(8.00), date(2024, 3, 8), food)
        .unwrap();
    db.insert_expense("future", dec!(16.00), date(2024, 3, 16), food)
        .unwrap();

    let status = db.budget_status(today).unwrap();
    assert_eq!(status.spent_last_week, dec!(7.00));
}

#[test]
fn test_budget_status_over_budget_example() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    let today = date(2024, 6, 20);

    db.save_budget(2024, 6, dec!(100.00)).unwrap();
    db.insert_expense("a", dec!(70.00), date(2024, 6, 5), food)
        .unwrap();
    db.insert_expense("b", dec!(50.00), date(2024, 6, 10), food)
        .unwrap();

    let status = db.budget_status(today).unwrap();
    assert_eq!(status.spent_this_month, dec!(120.00));
    assert_eq!(status.remaining(), dec!(-20.00));
    assert!(status.is_over());
}

// ── Maintenance ───────────────────────────────────────────────

#[test]
fn test_clear_all_removes_expenses_and_budgets() {
    let mut db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");

    db.insert_expense("Coffee", dec!(4.50), date(2024, 1, 2), food)
        .unwrap();
    db.save_budget(2024, 1, dec!(100.00)).unwrap();

    db.clear_all().unwrap();

    assert!(db.list_expenses().unwrap().is_empty());
    assert!(db.get_budget(2024, 1).unwrap().is_none());
    // Categories survive the reset.
    assert_eq!(db.get_categories().unwrap().len(), 5);

    // The ledger restarts at index 0.
    db.insert_expense("Fresh", dec!(1.00), date(2024, 1, 3), food)
        .unwrap();
    assert_eq!(db.list_expenses().unwrap()[0].order_index, 0);
}

// ── Migrations ────────────────────────────────────────────────

#[test]
fn test_migration_renames_budget_amount_column() {
    // Build a v1 database by hand, then let migrate() roll it forward.
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
    conn.execute_batch(schema::SCHEMA_V1).unwrap();
    conn.execute("INSERT INTO schema_version (version) VALUES (1)", [])
        .unwrap();
    conn.execute(
        "INSERT INTO monthly_budgets (year, month, budget_amount) VALUES (2024, 1, '150.00')",
        [],
    )
    .unwrap();

    let mut db = Database { conn };
    db.migrate().unwrap();
    db.seed_default_categories().unwrap();

    // Existing rows survive under the renamed column.
    let budget = db.get_budget(2024, 1).unwrap().unwrap();
    assert_eq!(budget.limit_amount, dec!(150.00));

    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}
