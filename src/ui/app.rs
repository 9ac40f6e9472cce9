use anyhow::Result;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::charts::{summarize_by_category, trend_series, CategorySummary, TrendSeries};
use crate::db::Database;
use crate::exchange::ImportOutcome;
use crate::models::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Expenses,
    Budget,
    Charts,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Expenses, Self::Budget, Self::Charts]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expenses => write!(f, "Expenses"),
            Self::Budget => write!(f, "Budget"),
            Self::Charts => write!(f, "Charts"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending destructive action awaiting a y/N confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteExpense { id: i64, name: String },
    ImportReplace,
    ClearAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortColumn {
    Name,
    Amount,
    Category,
    Date,
}

impl SortColumn {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "amount" => Some(Self::Amount),
            "category" => Some(Self::Category),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Amount => write!(f, "amount"),
            Self::Category => write!(f, "category"),
            Self::Date => write!(f, "date"),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,

    // Ledger
    pub(crate) expenses: Vec<Expense>,
    pub(crate) categories: Vec<Category>,
    pub(crate) filter: ExpenseFilter,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,
    pub(crate) last_sort: Option<(SortColumn, bool)>,

    // Budget
    pub(crate) budget: BudgetStatus,

    // Charts
    pub(crate) summaries: Vec<CategorySummary>,
    pub(crate) trend: Vec<TrendSeries>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,
    pub(crate) staged_import: Option<ImportOutcome>,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Expenses,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today: Local::now().date_naive(),

            expenses: Vec::new(),
            categories: Vec::new(),
            filter: ExpenseFilter::default(),
            expense_index: 0,
            expense_scroll: 0,
            last_sort: None,

            budget: BudgetStatus::default(),

            summaries: Vec::new(),
            trend: Vec::new(),

            pending_action: None,
            confirm_message: String::new(),
            staged_import: None,

            visible_rows: 20,
        }
    }

    /// Indices into `expenses` that pass the active filter, in ledger order.
    /// The cursor and scroll state operate on this view.
    pub(crate) fn visible(&self) -> Vec<usize> {
        self.expenses
            .iter()
            .enumerate()
            .filter(|(_, e)| self.filter.matches(e))
            .map(|(i, _)| i)
            .collect()
    }

    /// Sum of the filtered view, shown in the expenses footer.
    pub(crate) fn visible_total(&self) -> Decimal {
        total_amount(&self.expenses, &self.filter)
    }

    pub(crate) fn selected_expense(&self) -> Option<&Expense> {
        let visible = self.visible();
        visible
            .get(self.expense_index)
            .and_then(|&i| self.expenses.get(i))
    }

    pub(crate) fn refresh_expenses(&mut self, db: &Database) -> Result<()> {
        self.expenses = db.list_expenses()?;
        self.clamp_selection();
        Ok(())
    }

    pub(crate) fn refresh_categories(&mut self, db: &Database) -> Result<()> {
        self.categories = db.get_categories()?;
        Ok(())
    }

    pub(crate) fn refresh_budget(&mut self, db: &Database) -> Result<()> {
        self.budget = db.budget_status(self.today)?;
        Ok(())
    }

    /// Chart aggregates derive from the full materialized ledger, ignoring
    /// the view filter.
    pub(crate) fn refresh_charts(&mut self) {
        self.summaries = summarize_by_category(&self.expenses);
        self.trend = trend_series(&self.expenses);
    }

    /// Re-read everything after a ledger mutation so budget and charts stay
    /// consistent with persisted state.
    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_expenses(db)?;
        self.refresh_categories(db)?;
        self.refresh_budget(db)?;
        self.refresh_charts();
        Ok(())
    }

    pub(crate) fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.expense_index = 0;
            self.expense_scroll = 0;
        } else if self.expense_index >= len {
            self.expense_index = len - 1;
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Append the over-budget warning to a mutation's status message, the
    /// check that runs after every change that can move the month's total.
    pub(crate) fn status_after_change(&mut self, msg: impl Into<String>) {
        let mut msg = msg.into();
        if self.budget.is_over() {
            msg.push_str("  [!] monthly budget exceeded");
        }
        self.set_status(msg);
    }
}
