use std::path::Path;

use crate::config::DateMode;
use crate::error::FinanceResult;
use crate::models::dates::{calendar_month, date_in_month};
use crate::models::Expense;

/// Keep only the expenses dated in `month`, using the same month semantics
/// as the budget check.
pub(crate) fn filter_month(
    expenses: Vec<Expense>,
    month: &str,
    mode: DateMode,
) -> FinanceResult<Vec<Expense>> {
    match mode {
        DateMode::Lexical => Ok(expenses
            .into_iter()
            .filter(|e| e.date.starts_with(month))
            .collect()),
        DateMode::Calendar => {
            let (year, mon) = calendar_month(month)?;
            Ok(expenses
                .into_iter()
                .filter(|e| date_in_month(&e.date, year, mon))
                .collect())
        }
    }
}

/// Write expenses as CSV with a header row. Returns the number of records.
pub(crate) fn expenses_to_csv(expenses: &[Expense], path: &Path) -> FinanceResult<usize> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["id", "title", "amount", "date", "category_id"])?;
    for e in expenses {
        wtr.write_record([
            e.id.to_string(),
            e.title.clone(),
            e.amount.to_string(),
            e.date.clone(),
            e.category_id.map(|c| c.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    tracing::info!("Exported {} expense(s) to {}", expenses.len(), path.display());
    Ok(expenses.len())
}
