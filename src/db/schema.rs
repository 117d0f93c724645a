use rusqlite::Connection;

use crate::error::{FinanceError, FinanceResult};

pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    amount       TEXT NOT NULL,
    date         TEXT NOT NULL,
    category_id  INTEGER REFERENCES categories(id)
);

CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category_id);

CREATE TABLE IF NOT EXISTS subscriptions (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    amount     TEXT NOT NULL,
    next_date  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS budgets (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    month         TEXT NOT NULL,
    limit_amount  TEXT NOT NULL
);
"#;

/// Columns each table must carry for the queries in this crate to work.
pub(crate) const EXPECTED_COLUMNS: &[(&str, &[&str])] = &[
    ("categories", &["id", "name"]),
    ("expenses", &["id", "title", "amount", "date", "category_id"]),
    ("subscriptions", &["id", "name", "amount", "next_date"]),
    ("budgets", &["id", "month", "limit_amount"]),
];

/// Create any missing tables, then check that existing ones match.
pub(crate) fn ensure_tables(conn: &Connection) -> FinanceResult<()> {
    conn.execute_batch(SCHEMA)
        .map_err(|e| FinanceError::Schema(format!("Failed to create tables: {e}")))?;

    for (table, expected) in EXPECTED_COLUMNS {
        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = expected
            .iter()
            .copied()
            .filter(|col| !columns.iter().any(|c| c == col))
            .collect();
        if !missing.is_empty() {
            return Err(FinanceError::Schema(format!(
                "table '{table}' exists but is missing column(s): {}",
                missing.join(", ")
            )));
        }
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> FinanceResult<Vec<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .map_err(|e| FinanceError::Schema(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|e| FinanceError::Schema(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| FinanceError::Schema(e.to_string()))
}
