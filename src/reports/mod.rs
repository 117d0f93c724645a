//! Read-only aggregates over expenses and budgets.

use rusqlite::params;
use rust_decimal::Decimal;

use crate::config::DateMode;
use crate::db::{decimal_at, Storage};
use crate::error::{FinanceError, FinanceResult};
use crate::models::dates::{calendar_month, date_in_month, like_prefix, normalize_month};
use crate::models::{BudgetAlert, CategoryTotal};
use crate::repo::budget_from_row;

pub(crate) struct Reports<'a> {
    db: &'a Storage,
    dates: DateMode,
}

impl<'a> Reports<'a> {
    pub(crate) fn new(db: &'a Storage, dates: DateMode) -> Self {
        Self { db, dates }
    }

    /// Total spent per category name, ascending by name. Only categories with
    /// at least one expense appear; uncategorized expenses are left out.
    pub(crate) fn category_report(&self) -> FinanceResult<Vec<CategoryTotal>> {
        let rows = self.db.query(
            "SELECT c.name, e.amount
             FROM categories c
             JOIN expenses e ON c.id = e.category_id
             ORDER BY c.name, e.id",
            [],
            |row| Ok((row.get::<_, String>(0)?, decimal_at(row, 1)?)),
        )?;

        let mut report: Vec<CategoryTotal> = Vec::new();
        for (name, amount) in rows {
            match report.last_mut() {
                Some(last) if last.name == name => last.total = add_amount(last.total, amount)?,
                _ => report.push(CategoryTotal {
                    name,
                    total: amount,
                }),
            }
        }
        tracing::debug!("Category report has {} row(s)", report.len());
        Ok(report)
    }

    /// Sum of every expense dated in `month`.
    ///
    /// In lexical mode this is a plain prefix match on the stored date string,
    /// so a malformed legacy date such as `2024-031` counts towards `2024-03`.
    pub(crate) fn month_total(&self, month: &str) -> FinanceResult<Decimal> {
        let amounts = match self.dates {
            DateMode::Lexical => self.db.query(
                "SELECT amount FROM expenses WHERE date LIKE ?1 ESCAPE '\\'",
                params![like_prefix(month)],
                |row| decimal_at(row, 0),
            )?,
            // Stored dates may be unpadded, so no SQL prefix filter here
            DateMode::Calendar => {
                let (year, mon) = calendar_month(month)?;
                self.db
                    .query("SELECT date, amount FROM expenses", [], |row| {
                        Ok((row.get::<_, String>(0)?, decimal_at(row, 1)?))
                    })?
                    .into_iter()
                    .filter(|(date, _)| date_in_month(date, year, mon))
                    .map(|(_, amount)| amount)
                    .collect()
            }
        };
        amounts.into_iter().try_fold(Decimal::ZERO, add_amount)
    }

    /// Compare the month's spending against its budget. When several budgets
    /// exist for the month the earliest one is used.
    pub(crate) fn budget_alert(&self, month: &str) -> FinanceResult<BudgetAlert> {
        let total_spent = self.month_total(month)?;
        let budget_month = match self.dates {
            DateMode::Lexical => month.to_string(),
            DateMode::Calendar => normalize_month(DateMode::Calendar, month)?,
        };
        let budget = self.db.query_row(
            "SELECT id, month, limit_amount FROM budgets WHERE month = ?1 ORDER BY id LIMIT 1",
            params![budget_month],
            budget_from_row,
        )?;

        let alert = BudgetAlert::evaluate(total_spent, budget.map(|b| b.limit_amount));
        tracing::debug!(
            month,
            status = %alert.status,
            "Budget check: spent {} of {:?}",
            alert.total_spent,
            alert.limit
        );
        Ok(alert)
    }
}

fn add_amount(total: Decimal, amount: Decimal) -> FinanceResult<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| FinanceError::Query(format!("total overflowed adding {amount} to {total}")))
}
