#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn make_expense(name: &str, amount: Decimal, category_id: i64, d: NaiveDate) -> Expense {
    Expense {
        id: None,
        name: name.into(),
        amount,
        date: d,
        category_id,
        category_name: String::new(),
        order_index: 0,
    }
}

// ── ExpenseFilter ─────────────────────────────────────────────

#[test]
fn test_empty_filter_matches_everything() {
    let filter = ExpenseFilter::default();
    assert!(!filter.is_active());
    let e = make_expense("Coffee", dec!(4.50), 1, date(2024, 1, 2));
    assert!(filter.matches(&e));
}

#[test]
fn test_category_filter() {
    let filter = ExpenseFilter {
        category_id: Some(2),
        ..ExpenseFilter::default()
    };
    assert!(filter.is_active());
    assert!(filter.matches(&make_expense("Bus", dec!(2.00), 2, date(2024, 1, 2))));
    assert!(!filter.matches(&make_expense("Coffee", dec!(4.50), 1, date(2024, 1, 2))));
}

#[test]
fn test_date_range_filter_is_inclusive() {
    let filter = ExpenseFilter {
        from: Some(date(2024, 1, 10)),
        to: Some(date(2024, 1, 20)),
        ..ExpenseFilter::default()
    };
    assert!(filter.matches(&make_expense("a", dec!(1), 1, date(2024, 1, 10))));
    assert!(filter.matches(&make_expense("b", dec!(1), 1, date(2024, 1, 20))));
    assert!(!filter.matches(&make_expense("c", dec!(1), 1, date(2024, 1, 9))));
    assert!(!filter.matches(&make_expense("d", dec!(1), 1, date(2024, 1, 21))));
}

#[test]
fn test_filter_clear() {
    let mut filter = ExpenseFilter {
        category_id: Some(1),
        from: Some(date(2024, 1, 1)),
        to: Some(date(2024, 1, 31)),
    };
    filter.clear();
    assert!(!filter.is_active());
}

#[test]
fn test_total_amount_unfiltered_and_filtered() {
    let expenses = vec![
        make_expense("Coffee", dec!(4.50), 1, date(2024, 1, 2)),
        make_expense("Bus", dec!(2.00), 2, date(2024, 1, 2)),
        make_expense("Cinema", dec!(12.00), 3, date(2024, 2, 14)),
    ];

    assert_eq!(total_amount(&expenses, &ExpenseFilter::default()), dec!(18.50));

    let food_only = ExpenseFilter {
        category_id: Some(1),
        ..ExpenseFilter::default()
    };
    assert_eq!(total_amount(&expenses, &food_only), dec!(4.50));

    let january = ExpenseFilter {
        from: Some(date(2024, 1, 1)),
        to: Some(date(2024, 1, 31)),
        ..ExpenseFilter::default()
    };
    assert_eq!(total_amount(&expenses, &january), dec!(6.50));
}

#[test]
fn test_total_amount_empty() {
    assert_eq!(total_amount(&[], &ExpenseFilter::default()), Decimal::ZERO);
}

// ── Category lookups ──────────────────────────────────────────

#[test]
fn test_find_by_name_case_insensitive() {
    let cats = vec![
        Category {
            id: Some(1),
            name: "Food".into(),
        },
        Category {
            id: Some(2),
            name: "Transport".into(),
        },
    ];
    assert_eq!(Category::find_by_name(&cats, "food").unwrap().id, Some(1));
    assert_eq!(Category::find_by_name(&cats, "TRANSPORT").unwrap().id, Some(2));
    assert!(Category::find_by_name(&cats, "Rent").is_none());
}

#[test]
fn test_find_by_id() {
    let cats = vec![Category {
        id: Some(3),
        name: "Bills".into(),
    }];
    assert_eq!(Category::find_by_id(&cats, 3).unwrap().name, "Bills");
    assert!(Category::find_by_id(&cats, 4).is_none());
}

// ── BudgetStatus ──────────────────────────────────────────────

#[test]
fn test_used_percentage_zero_limit() {
    let status = BudgetStatus {
        limit: Decimal::ZERO,
        spent_this_month: dec!(999.99),
        spent_last_week: Decimal::ZERO,
    };
    assert_eq!(status.used_percentage(), Decimal::ZERO);
}

#[test]
fn test_used_percentage() {
    let status = BudgetStatus {
        limit: dec!(100),
        spent_this_month: dec!(50),
        spent_last_week: Decimal::ZERO,
    };
    assert_eq!(status.used_percentage(), dec!(50));
}

#[test]
fn test_is_over_truth_table() {
    let over = BudgetStatus {
        limit: dec!(100),
        spent_this_month: dec!(120),
        spent_last_week: Decimal::ZERO,
    };
    assert!(over.is_over());
    assert_eq!(over.remaining(), dec!(-20));

    let under = BudgetStatus {
        limit: dec!(100),
        spent_this_month: dec!(99.99),
        spent_last_week: Decimal::ZERO,
    };
    assert!(!under.is_over());

    let exact = BudgetStatus {
        limit: dec!(100),
        spent_this_month: dec!(100),
        spent_last_week: Decimal::ZERO,
    };
    assert!(!exact.is_over());

    // A zero limit never reads as over, no matter the spend.
    let no_limit = BudgetStatus {
        limit: Decimal::ZERO,
        spent_this_month: dec!(5000),
        spent_last_week: Decimal::ZERO,
    };
    assert!(!no_limit.is_over());
}
