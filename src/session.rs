use std::path::Path;

use crate::error::{PocketbookError, Result};
use crate::models::{Amount, Category, CategoryTotal, Expense, ExpenseDraft, InvoiceRecord, ReserveProgress};
use crate::reports;

pub const DEFAULT_RESERVE_GOAL: f64 = 5000.0;

/// Everything the dashboard knows for the lifetime of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    draft: ExpenseDraft,
    expenses: Vec<Expense>,
    invoices: Vec<InvoiceRecord>,
    reserve_goal: f64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVE_GOAL)
    }
}

impl Session {
    pub fn new(reserve_goal: f64) -> Self {
        Self {
            draft: ExpenseDraft::default(),
            expenses: Vec::new(),
            invoices: Vec::new(),
            reserve_goal,
        }
    }

    pub fn draft(&self) -> &ExpenseDraft {
        &self.draft
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn invoices(&self) -> &[InvoiceRecord] {
        &self.invoices
    }

    pub fn reserve_goal(&self) -> f64 {
        self.reserve_goal
    }

    // -----------------------------------------------------------------------
    // Draft editing
    // -----------------------------------------------------------------------

    pub fn set_draft_category(&mut self, category: Option<Category>) {
        self.draft.category = category;
    }

    pub fn set_draft_amount(&mut self, amount: impl Into<String>) {
        self.draft.amount = amount.into();
    }

    pub fn set_draft_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub(crate) fn draft_mut(&mut self) -> &mut ExpenseDraft {
        &mut self.draft
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Commit the current draft. On `InvalidAmount` neither the draft nor the
    /// expense list is touched.
    pub fn submit_expense(&mut self) -> Result<&Expense> {
        let amount = match Amount::parse(&self.draft.amount) {
            Ok(a) => a,
            Err(e) => {
                tracing::debug!(raw = %self.draft.amount, "rejected expense amount");
                return Err(e);
            }
        };
        let expense = Expense::from_draft(&self.draft, amount);
        tracing::debug!(
            category = ?expense.category,
            amount = amount.value(),
            "expense committed"
        );
        self.expenses.push(expense);
        self.draft = ExpenseDraft::default();
        Ok(&self.expenses[self.expenses.len() - 1])
    }

    /// Consuming form of [`Session::submit_expense`].
    pub fn with_expense(mut self) -> Result<Self> {
        self.submit_expense()?;
        Ok(self)
    }

    /// Record the display name of a selected file. `None`, or a path with no
    /// file name component, is ignored.
    pub fn record_invoice(&mut self, file: Option<&Path>) {
        let Some(name) = file.and_then(Path::file_name) else {
            return;
        };
        let name = name.to_string_lossy().to_string();
        if name.is_empty() {
            return;
        }
        tracing::debug!(%name, "invoice recorded");
        self.invoices.push(InvoiceRecord { name });
    }

    /// Parse and apply a new reserve goal. Zero and negative values are kept;
    /// `reserve_progress` has a defined reading for them.
    pub fn set_goal(&mut self, raw: &str) -> Result<f64> {
        let goal = match raw.trim().parse::<f64>() {
            Ok(g) if g.is_finite() => g,
            _ => {
                tracing::debug!(%raw, "rejected reserve goal");
                return Err(PocketbookError::InvalidGoal(raw.to_string()));
            }
        };
        tracing::debug!(goal, "reserve goal changed");
        self.reserve_goal = goal;
        Ok(goal)
    }

    /// Consuming form of [`Session::set_goal`].
    pub fn with_goal(mut self, raw: &str) -> Result<Self> {
        self.set_goal(raw)?;
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        reports::aggregate_by_category(&self.expenses)
    }

    pub fn progress(&self) -> ReserveProgress {
        reports::reserve_progress(&self.expenses, self.reserve_goal)
    }
}
