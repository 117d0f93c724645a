mod budget;
mod category;
pub(crate) mod dates;
mod expense;
mod report;
mod subscription;

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{FinanceError, FinanceResult};

pub(crate) use budget::Budget;
pub(crate) use category::Category;
pub(crate) use expense::Expense;
pub(crate) use report::{BudgetAlert, BudgetStatus, CategoryTotal};
pub(crate) use subscription::Subscription;

/// Parse a raw amount such as `"4.50"`, `"1,200"` or `"1e3"`.
pub(crate) fn parse_amount(raw: &str) -> FinanceResult<Decimal> {
    let cleaned = raw.trim().replace(',', "");
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| FinanceError::validation(format!("not a valid amount: '{}'", raw.trim())))
}

/// Parse a raw record id.
pub(crate) fn parse_id(raw: &str) -> FinanceResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| FinanceError::validation(format!("not a valid id: '{}'", raw.trim())))
}

/// Reject negative amounts; `field` names the value in the error.
pub(crate) fn ensure_non_negative(amount: Decimal, field: &str) -> FinanceResult<Decimal> {
    if amount < Decimal::ZERO {
        return Err(FinanceError::validation(format!(
            "{field} must not be negative: {amount}"
        )));
    }
    Ok(amount)
}

/// Trim a required text field, rejecting empty values.
pub(crate) fn require_text(value: &str, field: &str) -> FinanceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FinanceError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}
