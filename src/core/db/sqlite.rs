/// SQLite Driver
///
/// Backend built on rusqlite. `ConnectionInfo::database` is the file path,
/// or `:memory:` for a private in-memory database.

use crate::core::{FacadeError, Result};
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use tracing::info;

use super::session::{ConnectionInfo, Driver, Session};
use super::value::{Row, Value};

/// Opens rusqlite sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDriver;

impl Driver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn open(&self, target: &ConnectionInfo) -> Result<Box<dyn Session>> {
        if target.database.is_empty() {
            return Err(FacadeError::Connection(
                "SQLite database path must not be empty".to_string(),
            ));
        }

        let conn = Connection::open(&target.database)
            .map_err(|e| FacadeError::Connection(format!("{}: {}", target.database, e)))?;

        conn.execute_batch(
            "
            PRAGMA encoding = 'UTF-8';
            PRAGMA foreign_keys = ON;
        ",
        )
        .map_err(|e| FacadeError::Connection(format!("{}: {}", target.database, e)))?;

        info!(database = %target.database, "opened sqlite session");
        Ok(Box::new(SqliteSession { conn }))
    }
}

/// A single rusqlite connection.
pub struct SqliteSession {
    conn: Connection,
}

impl SqliteSession {
    /// Runs `sql` and converts up to `limit` rows
    fn fetch(&mut self, sql: &str, params: &[Value], limit: Option<usize>) -> Result<Vec<Row>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| FacadeError::Query(format!("Failed to prepare statement: {}", e)))?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(|e| FacadeError::Query(format!("Query execution failed: {}", e)))?;

        let mut out = Vec::new();
        while limit.map_or(true, |limit| out.len() < limit) {
            let row = match rows
                .next()
                .map_err(|e| FacadeError::Query(format!("Result processing failed: {}", e)))?
            {
                Some(row) => row,
                None => break,
            };

            let mut converted = Row::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                let value = row
                    .get_ref(i)
                    .map_err(|e| FacadeError::Query(format!("Result processing failed: {}", e)))?;
                converted.insert(name.as_str(), value.into());
            }
            out.push(converted);
        }

        Ok(out)
    }
}

impl Session for SqliteSession {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| FacadeError::Query(format!("Failed to prepare statement: {}", e)))?;

        // Stepping through rows lets statements that return results run here too.
        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(|e| FacadeError::Query(format!("Query execution failed: {}", e)))?;
        while rows
            .next()
            .map_err(|e| FacadeError::Query(format!("Query execution failed: {}", e)))?
            .is_some()
        {}
        drop(rows);
        drop(stmt);

        Ok(u64::try_from(self.conn.last_insert_rowid()).unwrap_or(0))
    }

    fn fetch_one(&mut self, sql: &str, params: &[Value]) -> Result<Option<Row>> {
        Ok(self.fetch(sql, params, Some(1))?.into_iter().next())
    }

    fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        self.fetch(sql, params, None)
    }

    fn fetch_scalar(&mut self, sql: &str, params: &[Value]) -> Result<Option<Value>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| FacadeError::Query(format!("Failed to prepare statement: {}", e)))?;

        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(|e| FacadeError::Query(format!("Query execution failed: {}", e)))?;

        match rows
            .next()
            .map_err(|e| FacadeError::Query(format!("Result processing failed: {}", e)))?
        {
            Some(row) => {
                let value = row
                    .get_ref(0)
                    .map_err(|e| FacadeError::Query(format!("Result processing failed: {}", e)))?;
                Ok(Some(value.into()))
            }
            None => Ok(None),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::from(rusqlite::types::Null),
            Value::Int(i) => ToSqlOutput::from(*i),
            Value::UInt(u) => {
                let i = i64::try_from(*u)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                ToSqlOutput::from(i)
            }
            Value::Float(f) => ToSqlOutput::from(*f),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Bytes(b) => ToSqlOutput::from(b.as_slice()),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Int(i),
            ValueRef::Real(f) => Value::Float(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).to_string()),
            ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_memory() -> Box<dyn Session> {
        SqliteDriver
            .open(&ConnectionInfo::new("", "", "", ":memory:"))
            .unwrap()
    }

    #[test]
    fn test_execute_returns_rowid() {
        let mut session = open_memory();
        session
            .execute("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)", &[])
            .unwrap();

        let first = session.execute("INSERT INTO t (name) VALUES (?)", &[Value::from("a")]).unwrap();
        let second = session.execute("INSERT INTO t (name) VALUES (?)", &[Value::from("b")]).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn test_value_conversions() {
        let mut session = open_memory();
        let row = session
            .fetch_one(
                "SELECT ? AS n, ? AS i, ? AS f, ? AS t, ? AS b",
                &[
                    Value::Null,
                    Value::UInt(7),
                    Value::Float(1.5),
                    Value::from("héllo"),
                    Value::Bytes(vec![0x48, 0x69]),
                ],
            )
            .unwrap()
            .unwrap();

        assert_eq!(row.get("n"), Some(&Value::Null));
        assert_eq!(row.get("i"), Some(&Value::Int(7)));
        assert_eq!(row.get("f"), Some(&Value::Float(1.5)));
        assert_eq!(row.get("t"), Some(&Value::Text("héllo".to_string())));
        assert_eq!(row.get("b"), Some(&Value::Bytes(vec![0x48, 0x69])));
    }

    #[test]
    fn test_oversized_uint_is_a_query_error() {
        let mut session = open_memory();
        let result = session.fetch_scalar("SELECT ?", &[Value::UInt(u64::MAX)]);
        assert!(matches!(result, Err(FacadeError::Query(_))));
    }

    #[test]
    fn test_placeholder_mismatch_is_a_query_error() {
        let mut session = open_memory();
        let result = session.fetch_all("SELECT ?, ?", &[Value::Int(1)]);
        assert!(matches!(result, Err(FacadeError::Query(_))));
    }

    #[test]
    fn test_open_bad_path_is_a_connection_error() {
        let result = SqliteDriver.open(&ConnectionInfo::new("", "", "", "/nonexistent/path/database.db"));
        match result {
            Err(FacadeError::Connection(_)) => {}
            _ => panic!("Expected Connection error"),
        }
    }
}
