/// Database Module
///
/// The facade and the driver layer it delegates to, split by concern:
/// - **Values** (`value.rs`): bound parameters, fetched cells and rows
/// - **Driver seam** (`session.rs`): the `Driver`/`Session` traits and the connection target
/// - **Drivers** (`sqlite.rs`, `mysql.rs`): the rusqlite and mysql backends
/// - **Query log** (`query.rs`): logged statements and statement classification
/// - **Facade** (`connection.rs`): the `Database` object tying the above together
///
/// ## Error Handling
///
/// All operations return the crate-wide `FacadeError`.
pub mod connection;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod query;
pub mod session;
pub mod sqlite;
pub mod value;

pub use connection::*;
#[cfg(feature = "mysql")]
pub use self::mysql::MysqlDriver;
pub use query::*;
pub use session::*;
pub use sqlite::SqliteDriver;
pub use value::*;
