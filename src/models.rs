use std::fmt;

use crate::error::{PocketbookError, Result};

/// The fixed spending buckets, in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Transport,
    Housing,
    Leisure,
    Education,
    Health,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Housing,
        Category::Leisure,
        Category::Education,
        Category::Health,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Housing => "Housing",
            Category::Leisure => "Leisure",
            Category::Education => "Education",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }

    /// Exact, case-sensitive lookup. No trimming.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated, non-zero, finite expense amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount(f64);

impl Amount {
    /// Parse raw form text. Empty, unparseable, non-finite and zero values are
    /// rejected (zero counts as "no amount entered").
    pub fn parse(raw: &str) -> Result<Amount> {
        let trimmed = raw.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| PocketbookError::InvalidAmount(raw.to_string()))?;
        if !value.is_finite() || value == 0.0 {
            return Err(PocketbookError::InvalidAmount(raw.to_string()));
        }
        Ok(Amount(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// In-progress entry form state. `amount` holds whatever the user typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseDraft {
    pub category: Option<Category>,
    pub amount: String,
    pub description: String,
}

/// A committed expense. Only `Session::submit_expense` builds these.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub category: Option<Category>,
    pub amount: Amount,
    pub description: String,
}

impl Expense {
    pub(crate) fn from_draft(draft: &ExpenseDraft, amount: Amount) -> Self {
        Self {
            category: draft.category,
            amount,
            description: draft.description.clone(),
        }
    }

    /// Amount for summing; anything non-finite contributes nothing.
    pub fn amount_or_zero(&self) -> f64 {
        let value = self.amount.value();
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRecord {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReserveProgress {
    pub total_spent: f64,
    pub progress_pct: f64,
}
