/// Query Log Module
///
/// The debug log of executed statements and the statement classifier used
/// to tag trace events.

use serde::Serialize;

use super::value::Value;

/// One statement as it was handed to the facade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl LoggedQuery {
    pub fn new(sql: &str, params: &[Value]) -> Self {
        LoggedQuery {
            sql: sql.to_string(),
            params: params.to_vec(),
        }
    }
}

/// Append-only record of executed statements, in call order.
///
/// Entries are only added while recording is enabled. Nothing removes them.
#[derive(Debug, Default)]
pub struct QueryLog {
    enabled: bool,
    entries: Vec<LoggedQuery>,
}

impl QueryLog {
    pub fn new() -> Self {
        QueryLog::default()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Appends the statement if recording is enabled
    pub fn record(&mut self, sql: &str, params: &[Value]) {
        if self.enabled {
            self.entries.push(LoggedQuery::new(sql, params));
        }
    }

    pub fn entries(&self) -> &[LoggedQuery] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Represents different SQL statement types for introspection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementType {
    /// SELECT statement
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// CREATE statement
    Create,
    /// DROP statement
    Drop,
    /// ALTER statement
    Alter,
    /// BEGIN/COMMIT/ROLLBACK and START TRANSACTION
    Transaction,
    /// Other statement types
    Other,
}

impl StatementType {
    /// Determines the statement type from its leading keyword
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start()
            .split(|c: char| c.is_whitespace() || c == '(' || c == ';')
            .next()
            .unwrap_or("")
            .to_uppercase();

        match keyword.as_str() {
            "SELECT" | "WITH" => StatementType::Select,
            "INSERT" | "REPLACE" => StatementType::Insert,
            "UPDATE" => StatementType::Update,
            "DELETE" => StatementType::Delete,
            "CREATE" => StatementType::Create,
            "DROP" => StatementType::Drop,
            "ALTER" => StatementType::Alter,
            "BEGIN" | "START" | "COMMIT" | "ROLLBACK" => StatementType::Transaction,
            _ => StatementType::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_log_records_nothing() {
        let mut log = QueryLog::new();
        log.record("SELECT 1", &[]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_toggling_keeps_entries() {
        let mut log = QueryLog::new();
        log.set_enabled(true);
        log.record("SELECT ?", &[Value::Int(1)]);
        log.set_enabled(false);
        log.record("SELECT 2", &[]);
        log.set_enabled(true);
        log.record("SELECT 3", &[]);

        let sql: Vec<&str> = log.entries().iter().map(|q| q.sql.as_str()).collect();
        assert_eq!(sql, vec!["SELECT ?", "SELECT 3"]);
        assert_eq!(log.entries()[0].params, vec![Value::Int(1)]);
    }

    #[test]
    fn test_logged_query_serializes() {
        let entry = LoggedQuery::new("SELECT * FROM t WHERE id = ?", &[Value::Int(5)]);
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"sql":"SELECT * FROM t WHERE id = ?","params":[5]}"#
        );
    }

    #[test]
    fn test_statement_type_classification() {
        assert_eq!(StatementType::from_sql("SELECT * FROM users"), StatementType::Select);
        assert_eq!(StatementType::from_sql("  select count(*) from users"), StatementType::Select);
        assert_eq!(StatementType::from_sql("INSERT INTO users VALUES (1, 'test')"), StatementType::Insert);
        assert_eq!(StatementType::from_sql("UPDATE users SET name = 'new'"), StatementType::Update);
        assert_eq!(StatementType::from_sql("DELETE FROM users WHERE id = 1"), StatementType::Delete);
        assert_eq!(StatementType::from_sql("CREATE TABLE test (id INTEGER)"), StatementType::Create);
        assert_eq!(StatementType::from_sql("DROP TABLE test"), StatementType::Drop);
        assert_eq!(StatementType::from_sql("BEGIN"), StatementType::Transaction);
        assert_eq!(StatementType::from_sql("START TRANSACTION"), StatementType::Transaction);
        assert_eq!(StatementType::from_sql("ROLLBACK"), StatementType::Transaction);
        assert_eq!(StatementType::from_sql("SET NAMES utf8mb4"), StatementType::Other);
    }
}
