/// Driver Seam
///
/// The facade never talks to a database library directly. A [`Driver`]
/// opens a [`Session`] for a [`ConnectionInfo`], and the facade runs every
/// statement through that session.

use crate::core::Result;
use std::fmt;

use super::value::{Row, Value};

/// Target of a connection: server, credentials and database name.
///
/// For the SQLite driver `database` is the file path (or `:memory:`) and
/// the remaining fields are ignored.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub host: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ConnectionInfo {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        ConnectionInfo {
            host: host.into(),
            port: None,
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

// Password stays out of logs and panics.
impl fmt::Debug for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionInfo")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// An open database session.
///
/// Every method prepares `sql`, binds `params` to its positional `?`
/// placeholders in order and executes it.
pub trait Session: Send {
    /// Executes a statement, draining any rows, and returns the
    /// driver-reported last-insert-id (0 when none was generated)
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Returns the first row of the result, if any
    fn fetch_one(&mut self, sql: &str, params: &[Value]) -> Result<Option<Row>>;

    /// Returns every row of the result in order
    fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Returns column 0 of the first row, if any row was returned
    fn fetch_scalar(&mut self, sql: &str, params: &[Value]) -> Result<Option<Value>>;
}

/// Opens sessions for one kind of database.
pub trait Driver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Establishes a session, failing with `FacadeError::Connection`
    fn open(&self, target: &ConnectionInfo) -> Result<Box<dyn Session>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let info = ConnectionInfo::new("db.local", "app", "hunter2", "shop").with_port(3307);
        let rendered = format!("{:?}", info);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("3307"));
    }
}
