use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Expense {
    pub id: Option<i64>,
    pub name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: i64,
    /// Joined from the categories table on load; empty before the first save.
    pub category_name: String,
    /// Display rank. Dense for adds and reorders; deletes may leave gaps,
    /// listing sorts by it either way.
    pub order_index: i64,
}

/// Category and date-range restriction over the materialized expense list.
/// `category_id = None` means every category.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub category_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn is_active(&self) -> bool {
        self.category_id.is_some() || self.from.is_some() || self.to.is_some()
    }

    pub fn clear(&mut self) {
        self.category_id = None;
        self.from = None;
        self.to = None;
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(id) = self.category_id {
            if expense.category_id != id {
                return false;
            }
        }
        if let Some(from) = self.from {
            if expense.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if expense.date > to {
                return false;
            }
        }
        true
    }
}

/// Sum of amounts over the materialized list, restricted by the filter.
pub fn total_amount(expenses: &[Expense], filter: &ExpenseFilter) -> Decimal {
    expenses
        .iter()
        .filter(|e| filter.matches(e))
        .map(|e| e.amount)
        .sum()
}
