mod schema;

use rusqlite::types::{Type, ValueRef};
use rusqlite::{Connection, OptionalExtension, Params, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::error::{FinanceError, FinanceResult};

pub(crate) use schema::ensure_tables;

/// The single connection to the backing store, held for the lifetime of the
/// process and passed explicitly to repositories and reports.
pub(crate) struct Storage {
    conn: Connection,
}

impl Storage {
    pub(crate) fn open(path: &Path) -> FinanceResult<Self> {
        let conn = Connection::open(path).map_err(|e| {
            FinanceError::Connection(format!("Failed to open database {}: {e}", path.display()))
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| FinanceError::Connection(format!("Failed to set database pragmas: {e}")))?;
        ensure_tables(&conn)?;
        tracing::info!("Opened database {}", path.display());
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> FinanceResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| FinanceError::Connection(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| FinanceError::Connection(e.to_string()))?;
        ensure_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Raw access for tests that need to seed rows the repository would reject.
    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Log every statement run on this connection at debug level.
    pub(crate) fn set_echo_sql(&mut self, enabled: bool) {
        if enabled {
            self.conn.trace(Some(log_sql));
        } else {
            self.conn.trace(None);
        }
    }

    /// Run one unit of work. Commits when `work` succeeds and rolls back
    /// otherwise. Storage failures raised inside the unit of work are
    /// reported as [`FinanceError::Transaction`]; domain errors pass through.
    pub(crate) fn in_transaction<T, F>(&mut self, work: F) -> FinanceResult<T>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> FinanceResult<T>,
    {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| FinanceError::Transaction(format!("Failed to begin transaction: {e}")))?;

        match work(&tx) {
            Ok(value) => {
                tx.commit()
                    .map_err(|e| FinanceError::Transaction(format!("Failed to commit: {e}")))?;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!("Rolling back unit of work: {err}");
                tx.rollback()
                    .map_err(|e| FinanceError::Transaction(format!("Failed to roll back: {e}")))?;
                Err(match err {
                    FinanceError::Query(msg) => FinanceError::Transaction(msg),
                    other => other,
                })
            }
        }
    }

    /// Run a read-only parameterized query and map every row.
    pub(crate) fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> FinanceResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        if !stmt.readonly() {
            return Err(FinanceError::Query(format!(
                "refusing to run a statement that writes: {}",
                sql.trim()
            )));
        }
        let rows = stmt.query_map(params, map)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Like [`Storage::query`] but for at most one row.
    pub(crate) fn query_row<T, P, F>(&self, sql: &str, params: P, map: F) -> FinanceResult<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        if !stmt.readonly() {
            return Err(FinanceError::Query(format!(
                "refusing to run a statement that writes: {}",
                sql.trim()
            )));
        }
        Ok(stmt.query_row(params, map).optional()?)
    }

    /// Flush and close the connection.
    pub(crate) fn close(self) -> FinanceResult<()> {
        self.conn
            .execute_batch("PRAGMA optimize;")
            .map_err(|e| FinanceError::Connection(format!("Failed to optimize on close: {e}")))?;
        self.conn
            .close()
            .map_err(|(_, e)| FinanceError::Connection(format!("Failed to close database: {e}")))?;
        tracing::info!("Closed database");
        Ok(())
    }
}

fn log_sql(sql: &str) {
    tracing::debug!(target: "fintrack::sql", "{sql}");
}

/// Read an amount column. Amounts are written as TEXT but rows created by
/// other tools may hold REAL or INTEGER values.
pub(crate) fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    match row.get_ref(idx)? {
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))?;
            Decimal::from_str(text.trim())
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
        }
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::try_from(f)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Real, Box::new(e))),
        other => Err(rusqlite::Error::InvalidColumnType(
            idx,
            format!("column {idx}"),
            other.data_type(),
        )),
    }
}
