// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod cli;
pub mod config;

#[cfg(test)]
mod test_utils;

#[cfg(feature = "mysql")]
pub use crate::core::db::{shared, MysqlDriver};
pub use crate::core::db::{
    ConnectionInfo, Database, Driver, LoggedQuery, Row, Session, SqliteDriver, StatementType, Value,
};
pub use crate::core::{FacadeError, Result};
