//! Create, read, update and delete for every persisted record.
//!
//! Each public operation is a single unit of work on the [`Storage`] it was
//! built with.

use rusqlite::{params, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::config::DateMode;
use crate::db::{decimal_at, Storage};
use crate::error::{FinanceError, FinanceResult};
use crate::models::dates::{normalize_date, normalize_month};
use crate::models::*;

const EXPENSE_COLUMNS: &str = "id, title, amount, date, category_id";

pub(crate) struct Repository<'a> {
    db: &'a mut Storage,
    dates: DateMode,
}

impl<'a> Repository<'a> {
    pub(crate) fn new(db: &'a mut Storage, dates: DateMode) -> Self {
        Self { db, dates }
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn add_category(&mut self, name: &str) -> FinanceResult<Category> {
        let name = require_text(name, "category name")?;
        let category = self.db.in_transaction(|tx| {
            tx.execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
            Ok(Category {
                id: tx.last_insert_rowid(),
                name,
            })
        })?;
        tracing::info!(id = category.id, "Added category '{}'", category.name);
        Ok(category)
    }

    pub(crate) fn get_category(&mut self, id: i64) -> FinanceResult<Category> {
        self.db.in_transaction(|tx| {
            tx.query_row(
                "SELECT id, name FROM categories WHERE id = ?1",
                params![id],
                category_from_row,
            )
            .optional()?
            .ok_or_else(|| FinanceError::category_not_found(id))
        })
    }

    pub(crate) fn list_categories(&mut self) -> FinanceResult<Vec<Category>> {
        self.db.in_transaction(|tx| {
            let mut stmt = tx.prepare("SELECT id, name FROM categories ORDER BY id")?;
            let rows = stmt.query_map([], category_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Delete a category that no expense refers to.
    pub(crate) fn delete_category(&mut self, id: i64) -> FinanceResult<()> {
        self.db.in_transaction(|tx| {
            if !exists(tx, "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)", id)? {
                return Err(FinanceError::category_not_found(id));
            }
            let in_use: i64 = tx.query_row(
                "SELECT COUNT(*) FROM expenses WHERE category_id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            if in_use > 0 {
                return Err(FinanceError::validation(format!(
                    "category {id} is used by {in_use} expense(s)"
                )));
            }
            tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
            Ok(())
        })?;
        tracing::info!(id, "Deleted category");
        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn add_expense(
        &mut self,
        title: &str,
        amount: Decimal,
        date: &str,
        category_id: Option<i64>,
    ) -> FinanceResult<Expense> {
        let amount = ensure_non_negative(amount, "amount")?;
        let date = normalize_date(self.dates, date)?;
        let title = title.trim().to_string();

        let expense = self.db.in_transaction(|tx| {
            if let Some(cid) = category_id {
                if !exists(tx, "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)", cid)? {
                    return Err(FinanceError::validation(format!(
                        "category {cid} does not exist"
                    )));
                }
            }
            tx.execute(
                "INSERT INTO expenses (title, amount, date, category_id) VALUES (?1, ?2, ?3, ?4)",
                params![title, amount.to_string(), date, category_id],
            )?;
            Ok(Expense {
                id: tx.last_insert_rowid(),
                title,
                amount,
                date,
                category_id,
            })
        })?;
        tracing::info!(id = expense.id, "Added expense '{}'", expense.title);
        Ok(expense)
    }

    pub(crate) fn get_expense(&mut self, id: i64) -> FinanceResult<Expense> {
        self.db.in_transaction(|tx| {
            tx.query_row(
                &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1"),
                params![id],
                expense_from_row,
            )
            .optional()?
            .ok_or_else(|| FinanceError::expense_not_found(id))
        })
    }

    /// Overwrite the title, amount and date of an existing expense.
    pub(crate) fn update_expense(
        &mut self,
        id: i64,
        title: &str,
        amount: Decimal,
        date: &str,
    ) -> FinanceResult<Expense> {
        let amount = ensure_non_negative(amount, "amount")?;
        let date = normalize_date(self.dates, date)?;
        let title = title.trim().to_string();

        let expense = self.db.in_transaction(|tx| {
            let existing = tx
                .query_row(
                    &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1"),
                    params![id],
                    expense_from_row,
                )
                .optional()?
                .ok_or_else(|| FinanceError::expense_not_found(id))?;
            tx.execute(
                "UPDATE expenses SET title = ?1, amount = ?2, date = ?3 WHERE id = ?4",
                params![title, amount.to_string(), date, id],
            )?;
            Ok(Expense {
                title,
                amount,
                date,
                ..existing
            })
        })?;
        tracing::info!(id, "Updated expense");
        Ok(expense)
    }

    pub(crate) fn delete_expense(&mut self, id: i64) -> FinanceResult<()> {
        self.db.in_transaction(|tx| {
            let deleted = tx.execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
            if deleted == 0 {
                return Err(FinanceError::expense_not_found(id));
            }
            Ok(())
        })?;
        tracing::info!(id, "Deleted expense");
        Ok(())
    }

    /// Expenses dated `date`, oldest first. Lexical mode compares the stored
    /// string exactly; calendar mode compares parsed dates, so `2024-3-05`
    /// matches `2024-03-05`.
    pub(crate) fn find_expenses_by_date(&mut self, date: &str) -> FinanceResult<Vec<Expense>> {
        match self.dates {
            DateMode::Lexical => {
                let date = date.to_string();
                self.db.in_transaction(|tx| {
                    let mut stmt = tx.prepare(&format!(
                        "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE date = ?1 ORDER BY id"
                    ))?;
                    let rows = stmt.query_map(params![date], expense_from_row)?;
                    Ok(rows.collect::<Result<Vec<_>, _>>()?)
                })
            }
            DateMode::Calendar => {
                let wanted = normalize_date(DateMode::Calendar, date)?;
                let expenses = self.list_expenses()?;
                Ok(expenses
                    .into_iter()
                    .filter(|e| {
                        normalize_date(DateMode::Calendar, &e.date).is_ok_and(|d| d == wanted)
                    })
                    .collect())
            }
        }
    }

    pub(crate) fn list_expenses(&mut self) -> FinanceResult<Vec<Expense>> {
        self.db.in_transaction(|tx| {
            let mut stmt =
                tx.prepare(&format!("SELECT {EXPENSE_COLUMNS} FROM expenses ORDER BY id"))?;
            let rows = stmt.query_map([], expense_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    // ── Subscriptions ─────────────────────────────────────────

    pub(crate) fn add_subscription(
        &mut self,
        name: &str,
        amount: Decimal,
        next_date: &str,
    ) -> FinanceResult<Subscription> {
        let name = require_text(name, "subscription name")?;
        let amount = ensure_non_negative(amount, "amount")?;
        let next_date = normalize_date(self.dates, next_date)?;

        let sub = self.db.in_transaction(|tx| {
            tx.execute(
                "INSERT INTO subscriptions (name, amount, next_date) VALUES (?1, ?2, ?3)",
                params![name, amount.to_string(), next_date],
            )?;
            Ok(Subscription {
                id: tx.last_insert_rowid(),
                name,
                amount,
                next_date,
            })
        })?;
        tracing::info!(id = sub.id, "Added subscription '{}'", sub.name);
        Ok(sub)
    }

    pub(crate) fn list_subscriptions(&mut self) -> FinanceResult<Vec<Subscription>> {
        self.db.in_transaction(|tx| {
            let mut stmt =
                tx.prepare("SELECT id, name, amount, next_date FROM subscriptions ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                Ok(Subscription {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    amount: decimal_at(row, 2)?,
                    next_date: row.get(3)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Record a monthly limit. Earlier rows for the same month are kept.
    pub(crate) fn set_budget(&mut self, month: &str, limit_amount: Decimal) -> FinanceResult<Budget> {
        let month = normalize_month(self.dates, month)?;
        let limit_amount = ensure_non_negative(limit_amount, "budget limit")?;

        let budget = self.db.in_transaction(|tx| {
            tx.execute(
                "INSERT INTO budgets (month, limit_amount) VALUES (?1, ?2)",
                params![month, limit_amount.to_string()],
            )?;
            Ok(Budget {
                id: tx.last_insert_rowid(),
                month,
                limit_amount,
            })
        })?;
        tracing::info!(id = budget.id, "Set budget for {}", budget.month);
        Ok(budget)
    }

    pub(crate) fn list_budgets(&mut self) -> FinanceResult<Vec<Budget>> {
        self.db.in_transaction(|tx| {
            let mut stmt = tx.prepare("SELECT id, month, limit_amount FROM budgets ORDER BY id")?;
            let rows = stmt.query_map([], budget_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }
}

fn exists(tx: &rusqlite::Transaction<'_>, sql: &str, id: i64) -> FinanceResult<bool> {
    Ok(tx.query_row(sql, params![id], |row| row.get(0))?)
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub(crate) fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: decimal_at(row, 2)?,
        date: row.get(3)?,
        category_id: row.get(4)?,
    })
}

pub(crate) fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        month: row.get(1)?,
        limit_amount: decimal_at(row, 2)?,
    })
}

#[cfg(test)]
mod tests;
