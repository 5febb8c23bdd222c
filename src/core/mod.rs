/// Core Module for dbfacade
///
/// The facade itself, the driver seam and the error type every operation
/// returns.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use db::{Database, Row, Value};
pub use error::{FacadeError, Result};
