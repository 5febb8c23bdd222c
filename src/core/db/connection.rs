/// Connection Management Module
///
/// The [`Database`] facade: one session, one debug flag, one query log and
/// the last insert id, behind a single mutex. Every statement method logs
/// the call (when debug is on), delegates to the session and shapes the
/// result.

use crate::core::{FacadeError, Result};
#[cfg(feature = "mysql")]
use once_cell::sync::OnceCell;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use super::query::{LoggedQuery, QueryLog, StatementType};
use super::session::{ConnectionInfo, Driver, Session};
use super::sqlite::SqliteDriver;
use super::value::{Row, Value};

/// Process-wide MySQL facade backing [`shared`]
#[cfg(feature = "mysql")]
static SHARED: OnceCell<Database> = OnceCell::new();

/// Returns the process-wide MySQL-backed facade, creating it on first use.
///
/// Every caller gets the same session, debug flag and query log.
#[cfg(feature = "mysql")]
pub fn shared() -> &'static Database {
    SHARED.get_or_init(Database::mysql)
}

/// Mutable state of a facade
struct DbState {
    /// Open session (None until the first successful connect)
    session: Option<Box<dyn Session>>,
    /// Target the session was opened with
    target: Option<ConnectionInfo>,
    log: QueryLog,
    last_insert_id: u64,
}

/// Connect/query/select/count facade over a single database session.
///
/// The session is opened once and kept for the lifetime of the facade;
/// there is no disconnect. All operations take `&self` and serialize on an
/// internal mutex, so one instance can be shared between threads.
pub struct Database {
    driver: Box<dyn Driver>,
    state: Mutex<DbState>,
}

impl Database {
    /// Creates an unconnected facade that opens sessions through `driver`
    pub fn new(driver: impl Driver + 'static) -> Self {
        Database {
            driver: Box::new(driver),
            state: Mutex::new(DbState {
                session: None,
                target: None,
                log: QueryLog::new(),
                last_insert_id: 0,
            }),
        }
    }

    /// Creates an unconnected facade for MySQL-compatible servers
    #[cfg(feature = "mysql")]
    pub fn mysql() -> Self {
        Database::new(super::mysql::MysqlDriver)
    }

    /// Creates an unconnected facade for SQLite files
    pub fn sqlite() -> Self {
        Database::new(SqliteDriver)
    }

    /// Name of the driver sessions are opened with
    pub fn driver_name(&self) -> &'static str {
        self.driver.name()
    }

    fn lock(&self) -> Result<MutexGuard<'_, DbState>> {
        self.state.lock().map_err(|_| FacadeError::Lock)
    }

    /// Opens the session if none is open yet.
    ///
    /// Once a session exists this returns the target it was opened with
    /// and ignores the arguments, even when they differ.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Connection` if the driver cannot establish the
    /// session. The facade stays unconnected in that case.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dbfacade::Database;
    ///
    /// let db = Database::sqlite();
    /// db.connect("", "", "", "shop.db")?;
    /// # Ok::<(), dbfacade::FacadeError>(())
    /// ```
    pub fn connect(
        &self,
        host: &str,
        user: &str,
        password: &str,
        database: &str,
    ) -> Result<ConnectionInfo> {
        self.connect_to(ConnectionInfo::new(host, user, password, database))
    }

    /// Same as [`Database::connect`] with a prepared target
    pub fn connect_to(&self, target: ConnectionInfo) -> Result<ConnectionInfo> {
        let mut state = self.lock()?;

        if let Some(existing) = &state.target {
            if *existing != target {
                debug!(
                    requested = ?target,
                    current = ?existing,
                    "session already open, ignoring connect arguments"
                );
            }
            return Ok(existing.clone());
        }

        let session = self.driver.open(&target)?;
        info!(driver = self.driver.name(), database = %target.database, "connected");

        state.session = Some(session);
        state.target = Some(target.clone());
        Ok(target)
    }

    /// Runs a statement against the open session, logging it first.
    ///
    /// The statement is logged even when the facade is unconnected or the
    /// statement fails.
    fn run<T>(
        state: &mut DbState,
        sql: &str,
        params: &[Value],
        op: impl FnOnce(&mut dyn Session) -> Result<T>,
    ) -> Result<T> {
        state.log.record(sql, params);

        debug!(kind = ?StatementType::from_sql(sql), params = params.len(), sql, "executing statement");

        let session = state.session.as_deref_mut().ok_or(FacadeError::NotConnected)?;
        op(session)
    }

    /// Executes a statement and returns the driver-reported last insert id.
    ///
    /// The id is also stored and available from [`Database::last_insert_id`].
    /// Statements that generate no id report whatever the driver does
    /// (usually 0).
    ///
    /// # Errors
    ///
    /// `FacadeError::NotConnected` before [`Database::connect`];
    /// `FacadeError::Query` for anything the driver rejects.
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let mut state = self.lock()?;
        let id = Database::run(&mut state, sql, params, |session| session.execute(sql, params))?;
        state.last_insert_id = id;
        Ok(id)
    }

    /// Returns the first row of the result, or `None` when no row matched
    pub fn select(&self, sql: &str, params: &[Value]) -> Result<Option<Row>> {
        let mut state = self.lock()?;
        Database::run(&mut state, sql, params, |session| session.fetch_one(sql, params))
    }

    /// Returns every row of the result in order
    pub fn multiple_select(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let mut state = self.lock()?;
        Database::run(&mut state, sql, params, |session| session.fetch_all(sql, params))
    }

    /// Returns the first column of the first row, by position.
    ///
    /// Write `sql` so the wanted scalar is the first selected column, as in
    /// `SELECT COUNT(*) FROM t`.
    ///
    /// # Errors
    ///
    /// `FacadeError::EmptyResult` if the statement returned no rows.
    pub fn count(&self, sql: &str, params: &[Value]) -> Result<Value> {
        let mut state = self.lock()?;
        Database::run(&mut state, sql, params, |session| session.fetch_scalar(sql, params))?
            .ok_or_else(|| FacadeError::EmptyResult(sql.to_string()))
    }

    /// [`Database::count`] converted to an integer
    pub fn count_as_i64(&self, sql: &str, params: &[Value]) -> Result<i64> {
        let value = self.count(sql, params)?;
        value
            .as_i64()
            .ok_or_else(|| FacadeError::Query(format!("expected a numeric scalar, got {}", value)))
    }

    /// Enables or disables recording of subsequent statements.
    ///
    /// Turning recording off keeps what was already recorded.
    pub fn set_debug(&self, enabled: bool) -> Result<()> {
        self.lock()?.log.set_enabled(enabled);
        Ok(())
    }

    pub fn is_debug(&self) -> Result<bool> {
        Ok(self.lock()?.log.is_enabled())
    }

    /// Returns the recorded statements in call order.
    ///
    /// Empty unless debug was enabled while statements ran.
    pub fn queries(&self) -> Result<Vec<LoggedQuery>> {
        Ok(self.lock()?.log.entries().to_vec())
    }

    /// Last id reported by [`Database::query`] (0 before the first one)
    pub fn last_insert_id(&self) -> Result<u64> {
        Ok(self.lock()?.last_insert_id)
    }

    pub fn is_connected(&self) -> Result<bool> {
        Ok(self.lock()?.session.is_some())
    }

    /// Target of the open session, if any
    pub fn target(&self) -> Result<Option<ConnectionInfo>> {
        Ok(self.lock()?.target.clone())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("driver", &self.driver.name())
            .field("target", &self.target().ok().flatten())
            .finish()
    }
}
