use crate::models::{Category, CategoryTotal, Expense, ReserveProgress};

// ---------------------------------------------------------------------------
// Category breakdown
// ---------------------------------------------------------------------------

/// Per-category totals in `Category::ALL` order. Categories summing to zero or
/// less are left out.
pub fn aggregate_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    Category::ALL
        .iter()
        .map(|&category| {
            let total = saturate(
                expenses
                    .iter()
                    .filter(|e| e.category == Some(category))
                    .map(Expense::amount_or_zero)
                    .sum(),
            );
            CategoryTotal { category, total }
        })
        .filter(|t| t.total > 0.0)
        .collect()
}

/// Each entry's percentage of the charted total. Totals near `f64::MAX` are
/// scaled down before summing so the shares stay finite.
pub fn category_share(totals: &[CategoryTotal]) -> Vec<(Category, f64)> {
    let n = totals.len().max(1) as f64;
    let sum: f64 = totals.iter().map(|t| t.total).sum();
    let (scale, sum) = if sum.is_finite() {
        (1.0, sum)
    } else {
        (n, totals.iter().map(|t| t.total / n).sum::<f64>())
    };
    totals
        .iter()
        .map(|t| {
            let part = t.total / scale;
            let pct = if sum > 0.0 && sum.is_finite() {
                let exact = part * 100.0 / sum;
                if exact.is_finite() {
                    exact
                } else {
                    part / sum * 100.0
                }
            } else {
                0.0
            };
            (t.category, pct)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Reserve progress
// ---------------------------------------------------------------------------

pub fn total_spent(expenses: &[Expense]) -> f64 {
    saturate(expenses.iter().map(Expense::amount_or_zero).sum())
}

/// Pin an overflowed sum to the largest finite value of the same sign.
fn saturate(total: f64) -> f64 {
    if total.is_nan() {
        0.0
    } else {
        total.clamp(f64::MIN, f64::MAX)
    }
}

/// Spending against the reserve goal. A goal that is zero, negative or
/// non-finite reads 100% once anything has been spent and 0% otherwise.
pub fn reserve_progress(expenses: &[Expense], goal: f64) -> ReserveProgress {
    let total_spent = total_spent(expenses);
    let progress_pct = if goal > 0.0 && goal.is_finite() {
        (total_spent / goal * 100.0).clamp(0.0, 100.0)
    } else if total_spent > 0.0 {
        100.0
    } else {
        0.0
    };
    ReserveProgress {
        total_spent,
        progress_pct,
    }
}
