use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::{Paths, Settings};
use crate::db::Storage;
use crate::menu::util::format_amount;
use crate::models::BudgetStatus;
use crate::reports::Reports;
use crate::repo::Repository;

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Launch the interactive menu (default)
    Menu,

    /// Print total spending per category
    Report,

    /// Compare a month's spending against its budget
    Alert {
        /// Month to check (YYYY-MM)
        month: String,
    },

    /// List subscriptions
    Subscriptions,

    /// List monthly budgets
    Budgets,

    /// List categories with their IDs
    Categories,

    /// Delete a category that no expense uses
    DeleteCategory {
        id: i64,
    },

    /// Show the settings and database paths, writing default settings if none exist
    Config,

    /// Export expenses to CSV
    Export {
        /// Output file (default: ~/fintrack-export[-MONTH].csv)
        path: Option<String>,
        /// Only export expenses in this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
}

pub(crate) fn as_cli(
    command: Command,
    db: &mut Storage,
    settings: &Settings,
    paths: &Paths,
) -> Result<()> {
    match command {
        Command::Menu => super::as_menu(db, settings),
        Command::Report => cli_report(db, settings),
        Command::Alert { month } => cli_alert(&month, db, settings),
        Command::Subscriptions => cli_subscriptions(db, settings),
        Command::Budgets => cli_budgets(db, settings),
        Command::Categories => cli_categories(db, settings),
        Command::DeleteCategory { id } => {
            Repository::new(db, settings.date_mode).delete_category(id)?;
            println!("Deleted category {id}");
            Ok(())
        }
        Command::Config => cli_config(settings, paths),
        Command::Export { path, month } => cli_export(path, month, db, settings),
    }
}

fn cli_config(settings: &Settings, paths: &Paths) -> Result<()> {
    if !paths.settings.exists() {
        settings
            .save(&paths.settings)
            .with_context(|| format!("Failed to write {}", paths.settings.display()))?;
        println!("Wrote default settings to {}", paths.settings.display());
    }
    println!("Settings:  {}", paths.settings.display());
    println!("Database:  {}", paths.database.display());
    println!("Date mode: {:?}", settings.date_mode);
    println!("Currency:  {}", settings.currency_symbol);
    Ok(())
}

fn cli_report(db: &Storage, settings: &Settings) -> Result<()> {
    let report = Reports::new(db, settings.date_mode).category_report()?;
    if report.is_empty() {
        println!("No categorized expenses");
        return Ok(());
    }

    println!("{:<24} {:>14}", "Category", "Total");
    println!("{}", "─".repeat(39));
    for row in &report {
        println!(
            "{:<24} {:>14}",
            row.name,
            format_amount(row.total, &settings.currency_symbol)
        );
    }
    Ok(())
}

fn cli_alert(month: &str, db: &Storage, settings: &Settings) -> Result<()> {
    let alert = Reports::new(db, settings.date_mode).budget_alert(month)?;
    let spent = format_amount(alert.total_spent, &settings.currency_symbol);
    let limit = alert
        .limit
        .map(|l| format_amount(l, &settings.currency_symbol))
        .unwrap_or_else(|| "none".into());

    match alert.status {
        BudgetStatus::Exceeded => println!("{month}: budget exceeded"),
        BudgetStatus::Within => println!("{month}: within budget"),
    }
    println!("  Spent:  {spent}");
    println!("  Limit:  {limit}");
    Ok(())
}

fn cli_subscriptions(db: &mut Storage, settings: &Settings) -> Result<()> {
    let subs = Repository::new(db, settings.date_mode).list_subscriptions()?;
    if subs.is_empty() {
        println!("No subscriptions");
        return Ok(());
    }

    println!("{:<4} {:<24} {:>14} Next payment", "ID", "Name", "Amount");
    println!("{}", "─".repeat(58));
    for s in &subs {
        println!(
            "{:<4} {:<24} {:>14} {}",
            s.id,
            s.name,
            format_amount(s.amount, &settings.currency_symbol),
            s.next_date
        );
    }
    Ok(())
}

fn cli_budgets(db: &mut Storage, settings: &Settings) -> Result<()> {
    let budgets = Repository::new(db, settings.date_mode).list_budgets()?;
    if budgets.is_empty() {
        println!("No budgets");
        return Ok(());
    }

    println!("{:<4} {:<8} {:>14}", "ID", "Month", "Limit");
    println!("{}", "─".repeat(28));
    for b in &budgets {
        println!(
            "{:<4} {:<8} {:>14}",
            b.id,
            b.month,
            format_amount(b.limit_amount, &settings.currency_symbol)
        );
    }
    Ok(())
}

fn cli_categories(db: &mut Storage, settings: &Settings) -> Result<()> {
    let categories = Repository::new(db, settings.date_mode).list_categories()?;
    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }

    println!("{:<4} Name", "ID");
    println!("{}", "─".repeat(30));
    for c in &categories {
        println!("{:<4} {c}", c.id);
    }
    Ok(())
}

fn cli_export(
    path: Option<String>,
    month: Option<String>,
    db: &mut Storage,
    settings: &Settings,
) -> Result<()> {
    let output_path = path
        .map(|a| shellexpand(&a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            match &month {
                Some(m) => format!("{home}/fintrack-export-{m}.csv"),
                None => format!("{home}/fintrack-export.csv"),
            }
        });

    let mut expenses = Repository::new(db, settings.date_mode).list_expenses()?;
    if let Some(m) = &month {
        expenses = crate::export::filter_month(expenses, m, settings.date_mode)?;
    }

    let output = PathBuf::from(&output_path);
    let count = crate::export::expenses_to_csv(&expenses, &output)
        .with_context(|| format!("Failed to export to {output_path}"))?;
    match (&month, count) {
        (Some(m), 0) => println!("No expenses for {m}"),
        (None, 0) => println!("No expenses to export"),
        _ => println!("Exported {count} expenses to {output_path}"),
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
