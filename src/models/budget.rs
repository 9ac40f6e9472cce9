use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct MonthlyBudget {
    pub id: Option<i64>,
    pub year: i32,
    pub month: u32,
    pub limit_amount: Decimal,
}

impl MonthlyBudget {
    pub fn new(year: i32, month: u32, limit_amount: Decimal) -> Self {
        Self {
            id: None,
            year,
            month,
            limit_amount,
        }
    }
}

/// Current-month budget usage, re-derived from the ledger on every refresh.
/// Never persisted. A zero limit and "no budget set" are the same thing.
#[derive(Debug, Clone, Default)]
pub struct BudgetStatus {
    pub limit: Decimal,
    pub spent_this_month: Decimal,
    pub spent_last_week: Decimal,
}

impl BudgetStatus {
    /// Percentage of the limit consumed; 0 when no limit is set.
    pub fn used_percentage(&self) -> Decimal {
        if self.limit == Decimal::ZERO {
            Decimal::ZERO
        } else {
            self.spent_this_month / self.limit * Decimal::from(100)
        }
    }

    pub fn remaining(&self) -> Decimal {
        self.limit - self.spent_this_month
    }

    pub fn is_over(&self) -> bool {
        self.limit > Decimal::ZERO && self.spent_this_month > self.limit
    }
}
