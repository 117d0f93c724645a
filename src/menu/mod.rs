//! The numbered text menu. Reads choices and raw field values, calls one
//! repository or report operation, and prints the outcome.

pub(crate) mod util;

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::config::Settings;
use crate::db::Storage;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{parse_amount, parse_id, Category};
use crate::reports::Reports;
use crate::repo::Repository;
use util::{format_amount, truncate};

const MENU: &str = "
===== FINTRACK =====
1. Add Category
2. Add Expense
3. Update Expense
4. Delete Expense
5. Search Expense by Date
6. Category Expense Report
7. Add Subscription
8. View Subscriptions
9. Set Monthly Budget
10. Budget Alert
11. Exit
";

pub(crate) struct Menu<'a, R, W> {
    db: &'a mut Storage,
    settings: &'a Settings,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub(crate) fn new(db: &'a mut Storage, settings: &'a Settings, input: R, out: W) -> Self {
        Self {
            db,
            settings,
            input,
            out,
        }
    }

    /// Loop until the user picks Exit or input ends. Operation failures are
    /// printed and the loop continues; only output errors end it early.
    pub(crate) fn run(&mut self) -> Result<()> {
        loop {
            write!(self.out, "{MENU}\nChoose: ")?;
            self.out.flush()?;

            let Some(choice) = self.read_line()? else {
                writeln!(self.out)?;
                break;
            };

            let outcome = match choice.as_str() {
                "1" => self.add_category(),
                "2" => self.add_expense(),
                "3" => self.update_expense(),
                "4" => self.delete_expense(),
                "5" => self.search_by_date(),
                "6" => self.category_report(),
                "7" => self.add_subscription(),
                "8" => self.view_subscriptions(),
                "9" => self.set_budget(),
                "10" => self.budget_alert(),
                "11" => break,
                _ => {
                    writeln!(self.out, "Invalid choice")?;
                    continue;
                }
            };

            if let Err(err) = outcome {
                if err.is_not_found() || err.is_validation() {
                    tracing::debug!("Menu option {choice} failed: {err}");
                } else {
                    tracing::warn!("Menu option {choice} failed: {err}");
                }
                writeln!(self.out, "Error: {err}")?;
            }
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, label: &str) -> FinanceResult<String> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(FinanceError::Io("input ended before a value was entered".into()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn repo(&mut self) -> Repository<'_> {
        Repository::new(&mut *self.db, self.settings.date_mode)
    }

    fn reports(&self) -> Reports<'_> {
        Reports::new(&*self.db, self.settings.date_mode)
    }

    fn money(&self, amount: rust_decimal::Decimal) -> String {
        format_amount(amount, &self.settings.currency_symbol)
    }

    // ── Options ───────────────────────────────────────────────

    fn add_category(&mut self) -> FinanceResult<()> {
        let name = self.prompt("Category name: ")?;
        let category = self.repo().add_category(&name)?;
        writeln!(self.out, "Category added: #{} {}", category.id, category.name)?;
        Ok(())
    }

    fn add_expense(&mut self) -> FinanceResult<()> {
        let title = self.prompt("Expense title: ")?;
        let amount = parse_amount(&self.prompt("Amount: ")?)?;
        let date = self.prompt("Date (YYYY-MM-DD): ")?;
        let raw_category = self.prompt("Category ID (blank for none): ")?;
        let category_id = match raw_category.trim() {
            "" => None,
            raw => Some(parse_id(raw)?),
        };

        let expense = self.repo().add_expense(&title, amount, &date, category_id)?;
        let label = match expense.category_id {
            Some(cid) => self.repo().get_category(cid)?.name,
            None => "uncategorized".to_string(),
        };
        let amount = self.money(expense.amount);
        writeln!(
            self.out,
            "Expense added: #{} {} {amount} ({label})",
            expense.id, expense.title
        )?;
        Ok(())
    }

    fn update_expense(&mut self) -> FinanceResult<()> {
        let id = parse_id(&self.prompt("Expense ID: ")?)?;
        // Fail before asking for new values when the expense is missing
        self.repo().get_expense(id)?;

        let title = self.prompt("New title: ")?;
        let amount = parse_amount(&self.prompt("New amount: ")?)?;
        let date = self.prompt("New date: ")?;
        let expense = self.repo().update_expense(id, &title, amount, &date)?;
        writeln!(self.out, "Expense updated: #{} {}", expense.id, expense.title)?;
        Ok(())
    }

    fn delete_expense(&mut self) -> FinanceResult<()> {
        let id = parse_id(&self.prompt("Expense ID: ")?)?;
        self.repo().delete_expense(id)?;
        writeln!(self.out, "Expense deleted: #{id}")?;
        Ok(())
    }

    fn search_by_date(&mut self) -> FinanceResult<()> {
        let date = self.prompt("Enter date: ")?;
        let expenses = self.repo().find_expenses_by_date(date.trim())?;
        if expenses.is_empty() {
            writeln!(self.out, "No expenses on {}", date.trim())?;
            return Ok(());
        }
        let categories = self.repo().list_categories()?;
        for e in &expenses {
            let category = e
                .category_id
                .and_then(|cid| Category::find_by_id(&categories, cid))
                .map(|c| c.name.as_str())
                .unwrap_or("uncategorized");
            let amount = self.money(e.amount);
            writeln!(
                self.out,
                "#{:<4} {:<24} {amount:>14}  {category}",
                e.id,
                truncate(&e.title, 24)
            )?;
        }
        Ok(())
    }

    fn category_report(&mut self) -> FinanceResult<()> {
        let report = self.reports().category_report()?;
        writeln!(self.out, "\nCategory Wise Expense Report")?;
        writeln!(self.out, "{}", "─".repeat(40))?;
        if report.is_empty() {
            writeln!(self.out, "No categorized expenses")?;
        }
        for row in &report {
            let total = self.money(row.total);
            writeln!(self.out, "{:<24} {total:>14}", truncate(&row.name, 24))?;
        }
        Ok(())
    }

    fn add_subscription(&mut self) -> FinanceResult<()> {
        let name = self.prompt("Subscription name: ")?;
        let amount = parse_amount(&self.prompt("Amount: ")?)?;
        let next_date = self.prompt("Next payment date: ")?;
        let sub = self.repo().add_subscription(&name, amount, &next_date)?;
        writeln!(self.out, "Subscription added: #{} {}", sub.id, sub.name)?;
        Ok(())
    }

    fn view_subscriptions(&mut self) -> FinanceResult<()> {
        let subs = self.repo().list_subscriptions()?;
        if subs.is_empty() {
            writeln!(self.out, "No subscriptions")?;
        }
        for s in &subs {
            let amount = self.money(s.amount);
            writeln!(self.out, "{} - {amount} - {}", s.name, s.next_date)?;
        }
        Ok(())
    }

    fn set_budget(&mut self) -> FinanceResult<()> {
        let month = self.prompt("Month (YYYY-MM): ")?;
        let limit = parse_amount(&self.prompt("Budget limit: ")?)?;
        let budget = self.repo().set_budget(&month, limit)?;
        let limit = self.money(budget.limit_amount);
        writeln!(self.out, "Budget set: {} {limit}", budget.month)?;
        Ok(())
    }

    fn budget_alert(&mut self) -> FinanceResult<()> {
        let month = self.prompt("Month (YYYY-MM): ")?;
        let alert = self.reports().budget_alert(month.trim())?;
        let spent = self.money(alert.total_spent);
        let line = match alert.limit {
            Some(limit) if alert.is_exceeded() => {
                format!("Budget exceeded: spent {spent} of {}", self.money(limit))
            }
            Some(limit) => format!("Within budget: spent {spent} of {}", self.money(limit)),
            None => format!("Within budget: spent {spent} (no budget set)"),
        };
        writeln!(self.out, "{line}")?;
        Ok(())
    }
}
