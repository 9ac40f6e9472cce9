use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::Expense;

/// Per-category aggregate over the whole ledger.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategorySummary {
    pub(crate) category_id: i64,
    pub(crate) name: String,
    pub(crate) total: Decimal,
    pub(crate) average: Decimal,
    pub(crate) max: Decimal,
}

/// Daily totals for one category, zero-filled over the observed span.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrendSeries {
    pub(crate) category_id: i64,
    pub(crate) name: String,
    pub(crate) points: Vec<(NaiveDate, Decimal)>,
}

/// Group expenses by category, computing sum, arithmetic mean, and maximum
/// per group. Keyed by category id - the display name rides along for
/// rendering only, so two categories sharing a label never merge. Ordered by
/// descending total.
pub(crate) fn summarize_by_category(expenses: &[Expense]) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<i64, (String, Vec<Decimal>)> = BTreeMap::new();
    for e in expenses {
        let entry = groups
            .entry(e.category_id)
            .or_insert_with(|| (e.category_name.clone(), Vec::new()));
        entry.1.push(e.amount);
    }

    let mut summaries: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(category_id, (name, amounts))| {
            let total: Decimal = amounts.iter().copied().sum();
            let count = Decimal::from(amounts.len() as u64);
            let max = amounts.iter().copied().max().unwrap_or_default();
            CategorySummary {
                category_id,
                name,
                total,
                average: total / count,
                max,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    summaries
}

/// One series per category over the full observed span, month-aligned: from
/// the first day of the earliest expense's month through the last day of the
/// latest expense's month, with zero-filled gaps for inactive days.
pub(crate) fn trend_series(expenses: &[Expense]) -> Vec<TrendSeries> {
    let Some(earliest) = expenses.iter().map(|e| e.date).min() else {
        return Vec::new();
    };
    let latest = expenses.iter().map(|e| e.date).max().unwrap_or(earliest);
    let start = month_start(earliest);
    let end = month_end(latest);

    let mut daily: BTreeMap<(i64, NaiveDate), Decimal> = BTreeMap::new();
    let mut names: BTreeMap<i64, String> = BTreeMap::new();
    for e in expenses {
        *daily.entry((e.category_id, e.date)).or_default() += e.amount;
        names
            .entry(e.category_id)
            .or_insert_with(|| e.category_name.clone());
    }

    names
        .into_iter()
        .map(|(category_id, name)| {
            let mut points = Vec::new();
            let mut day = start;
            loop {
                let value = daily
                    .get(&(category_id, day))
                    .copied()
                    .unwrap_or_default();
                points.push((day, value));
                if day >= end {
                    break;
                }
                match day.succ_opt() {
                    Some(next) => day = next,
                    None => break,
                }
            }
            TrendSeries {
                category_id,
                name,
                points,
            }
        })
        .collect()
}

fn month_start(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

fn month_end(d: NaiveDate) -> NaiveDate {
    let next_month = if d.month() == 12 {
        NaiveDate::from_ymd_opt(d.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(d.year(), d.month() + 1, 1)
    };
    next_month.and_then(|n| n.pred_opt()).unwrap_or(d)
}
