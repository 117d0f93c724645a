#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn count(db: &Storage, table: &str) -> i64 {
    db.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
        .unwrap()
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_add_category_then_lookup() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);

    let food = repo.add_category("Food").unwrap();
    let travel = repo.add_category("  Travel ").unwrap();
    assert_ne!(food.id, travel.id);
    assert_eq!(travel.name, "Travel");

    let fetched = repo.get_category(food.id).unwrap();
    assert_eq!(fetched, food);
    assert_eq!(repo.list_categories().unwrap(), vec![food, travel]);
}

#[test]
fn test_add_category_empty_name() {
    let mut db = Storage::open_in_memory().unwrap();
    let err = Repository::new(&mut db, DateMode::Lexical)
        .add_category("   ")
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(count(&db, "categories"), 0);
}

#[test]
fn test_get_category_not_found() {
    let mut db = Storage::open_in_memory().unwrap();
    let err = Repository::new(&mut db, DateMode::Lexical)
        .get_category(5)
        .unwrap_err();
    assert_eq!(err.to_string(), "Category not found: 5");
}

#[test]
fn test_ids_never_reused() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    let first = repo.add_category("Old").unwrap();
    repo.delete_category(first.id).unwrap();
    let second = repo.add_category("New").unwrap();
    assert!(second.id > first.id);
}

#[test]
fn test_delete_category_in_use() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    let food = repo.add_category("Food").unwrap();
    repo.add_expense("Lunch", dec!(12), "2024-03-01", Some(food.id))
        .unwrap();

    let err = repo.delete_category(food.id).unwrap_err();
    assert!(err.is_validation());
    assert!(repo.get_category(food.id).is_ok());

    assert!(repo.delete_category(999).unwrap_err().is_not_found());
}

// ── Expenses ──────────────────────────────────────────────────

#[test]
fn test_add_expense_then_find_by_date() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    let cat = repo.add_category("Food").unwrap();
    assert_eq!(cat.id, 1);

    repo.add_expense("Coffee", dec!(4.5), "2024-03-01", Some(1))
        .unwrap();
    repo.add_expense("Dinner", dec!(30), "2024-03-02", Some(1))
        .unwrap();

    let found = repo.find_expenses_by_date("2024-03-01").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Coffee");
    assert_eq!(found[0].amount, dec!(4.5));
    assert_eq!(found[0].category_id, Some(1));
}

#[test]
fn test_find_by_date_is_exact_string_match() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    repo.add_expense("A", dec!(1), "2024-01-05", None).unwrap();
    repo.add_expense("B", dec!(2), "2024-01-05", None).unwrap();

    assert!(repo.find_expenses_by_date("2024-1-05").unwrap().is_empty());
    assert!(repo.find_expenses_by_date("2024-01").unwrap().is_empty());

    let titles: Vec<String> = repo
        .find_expenses_by_date("2024-01-05")
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, vec!["A", "B"]);
}

#[test]
fn test_calendar_find_by_date_matches_unpadded_rows() {
    let mut db = Storage::open_in_memory().unwrap();
    db.connection()
        .execute(
            "INSERT INTO expenses (title, amount, date, category_id) VALUES ('Legacy', '7', '2024-3-05', NULL)",
            [],
        )
        .unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Calendar);
    repo.add_expense("New", dec!(2), "2024-03-05", None).unwrap();
    repo.add_expense("Other", dec!(3), "2024-03-06", None).unwrap();

    let titles: Vec<String> = repo
        .find_expenses_by_date("2024-3-5")
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, vec!["Legacy", "New"]);
}

#[test]
fn test_add_expense_without_category() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    let expense = repo.add_expense("Cash", dec!(0), "2024-03-01", None).unwrap();
    assert!(expense.category_id.is_none());
    assert_eq!(expense.amount, dec!(0));
}

#[test]
fn test_add_expense_unknown_category() {
    let mut db = Storage::open_in_memory().unwrap();
    let err = Repository::new(&mut db, DateMode::Lexical)
        .add_expense("Coffee", dec!(4.5), "2024-03-01", Some(42))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(count(&db, "expenses"), 0);
}

#[test]
fn test_add_expense_negative_amount() {
    let mut db = Storage::open_in_memory().unwrap();
    let err = Repository::new(&mut db, DateMode::Lexical)
        .add_expense("Refund", dec!(-1), "2024-03-01", None)
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_add_expense_malformed_date() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    for bad in ["2024-3-01", "01/03/2024", "", "2024-031"] {
        let err = repo.add_expense("Coffee", dec!(1), bad, None).unwrap_err();
        assert!(err.is_validation(), "expected validation error for {bad:?}");
    }
}

#[test]
fn test_calendar_mode_rejects_impossible_dates() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Calendar);
    assert!(repo
        .add_expense("Leap", dec!(1), "2023-02-29", None)
        .unwrap_err()
        .is_validation());
    let ok = repo.add_expense("Leap", dec!(1), "2024-02-29", None).unwrap();
    assert_eq!(ok.date, "2024-02-29");
}

#[test]
fn test_update_expense() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    let cat = repo.add_category("Food").unwrap();
    let exp = repo
        .add_expense("Coffee", dec!(4.5), "2024-03-01", Some(cat.id))
        .unwrap();

    let updated = repo
        .update_expense(exp.id, "Latte", dec!(5.25), "2024-03-02")
        .unwrap();
    assert_eq!(updated.title, "Latte");
    assert_eq!(updated.category_id, Some(cat.id));

    let fetched = repo.get_expense(exp.id).unwrap();
    assert_eq!(fetched, updated);
    assert_eq!(fetched.amount, dec!(5.25));
    assert_eq!(fetched.date, "2024-03-02");
}

#[test]
fn test_update_and_delete_missing_expense() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    let kept = repo.add_expense("Kept", dec!(1), "2024-03-01", None).unwrap();

    let err = repo
        .update_expense(99, "Ghost", dec!(1), "2024-03-01")
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Expense not found: 99");

    let err = repo.delete_expense(99).unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(repo.list_expenses().unwrap(), vec![kept]);
}

#[test]
fn test_update_expense_validates_before_lookup() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    let exp = repo.add_expense("Coffee", dec!(4.5), "2024-03-01", None).unwrap();

    assert!(repo
        .update_expense(exp.id, "Coffee", dec!(-4.5), "2024-03-01")
        .unwrap_err()
        .is_validation());
    assert_eq!(repo.get_expense(exp.id).unwrap().amount, dec!(4.5));
}

#[test]
fn test_delete_expense() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    let a = repo.add_expense("A", dec!(1), "2024-03-01", None).unwrap();
    let b = repo.add_expense("B", dec!(2), "2024-03-01", None).unwrap();

    repo.delete_expense(a.id).unwrap();
    assert!(repo.get_expense(a.id).unwrap_err().is_not_found());
    assert_eq!(repo.list_expenses().unwrap(), vec![b]);
}

// ── Subscriptions ─────────────────────────────────────────────

#[test]
fn test_subscriptions_in_id_order() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    repo.add_subscription("Netflix", dec!(649), "2024-04-01").unwrap();
    repo.add_subscription("Gym", dec!(1200.50), "2024-03-20").unwrap();

    let subs = repo.list_subscriptions().unwrap();
    let names: Vec<&str> = subs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Netflix", "Gym"]);
    assert_eq!(subs[1].amount, dec!(1200.50));
    assert_eq!(subs[1].next_date, "2024-03-20");
}

#[test]
fn test_add_subscription_validation() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    assert!(repo
        .add_subscription("", dec!(1), "2024-04-01")
        .unwrap_err()
        .is_validation());
    assert!(repo
        .add_subscription("Music", dec!(1), "next month")
        .unwrap_err()
        .is_validation());
    assert!(repo.list_subscriptions().unwrap().is_empty());
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_set_budget_allows_duplicates() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    let first = repo.set_budget("2024-03", dec!(100)).unwrap();
    let second = repo.set_budget("2024-03", dec!(200)).unwrap();
    assert_ne!(first.id, second.id);

    let budgets = repo.list_budgets().unwrap();
    assert_eq!(budgets, vec![first, second]);
}

#[test]
fn test_set_budget_validation() {
    let mut db = Storage::open_in_memory().unwrap();
    let mut repo = Repository::new(&mut db, DateMode::Lexical);
    assert!(repo.set_budget("March", dec!(100)).unwrap_err().is_validation());
    assert!(repo.set_budget("2024-03", dec!(-5)).unwrap_err().is_validation());
    assert!(repo.list_budgets().unwrap().is_empty());
}

// ── Legacy rows ───────────────────────────────────────────────

#[test]
fn test_reads_rows_written_as_real() {
    let mut db = Storage::open_in_memory().unwrap();
    db.connection()
        .execute(
            "INSERT INTO expenses (title, amount, date, category_id) VALUES ('Old', 2.5, '2023-12-31', NULL)",
            [],
        )
        .unwrap();

    let expenses = Repository::new(&mut db, DateMode::Lexical)
        .list_expenses()
        .unwrap();
    assert_eq!(expenses[0].amount, dec!(2.5));
}
